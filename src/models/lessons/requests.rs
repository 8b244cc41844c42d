use super::entities::LessonStatus;
use crate::models::common::{PaginationQuery, opt_from_str};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 创建课时请求
///
/// 学生预约时 `student_id` 可省略（默认自己），教师创建时 `tutor_id` 可省略
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct CreateLessonRequest {
    pub tutor_id: Option<i64>,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub title: String,
    pub start_at: DateTime<Utc>, // ISO 8601，如 "2026-01-24T12:00:00Z"
    pub end_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub price_cents: Option<i64>,
}

/// 更新/改期请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub price_cents: Option<i64>,
}

/// 取消课时请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct CancelLessonRequest {
    pub reason: Option<String>,
}

/// 课时列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct LessonListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub tutor_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub student_id: Option<i64>,
    pub status: Option<LessonStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// 日历查询参数
///
/// `from`/`to` 为本地日期（含两端），`tz_offset` 为本地相对 UTC 的分钟偏移，
/// 缺省时使用当前用户资料中的偏移
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct CalendarParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub tz_offset: Option<i32>,
    pub tutor_id: Option<i64>,
    pub student_id: Option<i64>,
    #[serde(default)]
    pub include_cancelled: bool,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct LessonListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub tutor_id: Option<i64>,
    pub student_id: Option<i64>,
    // 学生或教师任一方匹配
    pub participant_id: Option<i64>,
    pub status: Option<LessonStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// 已解析参与方与价格的新课时（用于存储层）
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub tutor_id: i64,
    pub student_id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub price_cents: i64,
}

/// 按时间窗口查询课时（用于日历、冲突检测、可预约时段）
#[derive(Debug, Clone)]
pub struct LessonRangeQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub tutor_id: Option<i64>,
    pub student_id: Option<i64>,
    pub participant_id: Option<i64>,
    pub include_cancelled: bool,
    // 改期时排除自身
    pub exclude_id: Option<i64>,
}

impl LessonRangeQuery {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            tutor_id: None,
            student_id: None,
            participant_id: None,
            include_cancelled: false,
            exclude_id: None,
        }
    }
}
