use super::entities::{ReviewAction, SubmissionStatus};
use serde::Deserialize;
use ts_rs::TS;

/// 学生提交作业
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/submission.ts")]
pub struct CreateSubmissionRequest {
    pub content: String,
    pub practice_minutes: Option<i32>,
}

/// 教师批改：评分或退回修改
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/submission.ts")]
pub struct ReviewSubmissionRequest {
    pub action: ReviewAction,
    pub score: Option<f64>,
    pub feedback: Option<String>,
}

/// 新提交（用于存储层），版本号在事务内分配
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: String,
    pub practice_minutes: Option<i32>,
    pub is_late: bool,
}

/// 批改结果（用于存储层）
#[derive(Debug, Clone)]
pub struct SubmissionReview {
    pub submission_id: i64,
    pub graded_by: i64,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub feedback: Option<String>,
}
