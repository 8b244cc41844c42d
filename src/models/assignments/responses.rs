use super::entities::Assignment;
use crate::models::common::PaginationInfo;
use crate::models::submissions::entities::Submission;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct AssignmentListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub overdue: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<AssignmentListItem>,
}

/// 作业详情，附带最新提交
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct AssignmentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub overdue: bool,
    pub latest_submission: Option<Submission>,
}
