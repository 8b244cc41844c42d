use crate::models::common::{PaginationQuery, opt_from_str};
use serde::Deserialize;
use ts_rs::TS;

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/course.ts")]
pub struct CourseQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub tutor_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub active: Option<bool>,
    pub search: Option<String>,
}

// 创建课程请求
//
// 教师可省略 tutor_id（默认自己），管理员必须指定
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub tutor_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub instrument: Option<String>,
    #[serde(default)]
    pub price_cents: i64,
}

// 更新课程请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instrument: Option<String>,
    pub price_cents: Option<i64>,
    pub active: Option<bool>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub tutor_id: Option<i64>,
    pub active: Option<bool>,
    pub search: Option<String>,
}
