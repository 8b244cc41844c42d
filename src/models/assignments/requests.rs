use super::entities::AssignmentStatus;
use crate::models::common::{PaginationQuery, opt_from_str};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 布置作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    // 管理员布置时必填，教师默认自己
    pub tutor_id: Option<i64>,
    pub student_id: i64,
    pub lesson_id: Option<i64>,
    pub song_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub max_score: Option<f64>,
}

/// 更新作业请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub max_score: Option<f64>,
    pub song_id: Option<i64>,
}

/// 作业列表查询参数（HTTP 请求），对应前端的批改分栏
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<AssignmentStatus>,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub tutor_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub overdue: Option<bool>,
    pub search: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub student_id: Option<i64>,
    pub tutor_id: Option<i64>,
    pub overdue: Option<bool>,
    pub search: Option<String>,
}
