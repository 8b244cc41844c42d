use super::entities::Submission;
use serde::Serialize;
use ts_rs::TS;

/// 某作业的全部提交版本（新版本在前）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/submission.ts")]
pub struct SubmissionHistoryResponse {
    pub assignment_id: i64,
    pub items: Vec<Submission>,
}
