use super::entities::{TransactionKind, TransactionStatus};
use crate::models::common::{PaginationQuery, opt_from_str};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 记录一笔流水
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct CreateTransactionRequest {
    pub tutor_id: Option<i64>,
    pub student_id: Option<i64>,
    pub lesson_id: Option<i64>,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub currency: Option<String>,
    pub status: Option<TransactionStatus>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// 修改流水状态
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct UpdateTransactionStatusRequest {
    pub status: TransactionStatus,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct TransactionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub tutor_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub student_id: Option<i64>,
    pub status: Option<TransactionStatus>,
    pub kind: Option<TransactionKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// 汇总查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct RevenueSummaryParams {
    pub tutor_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// 用于存储层
#[derive(Debug, Clone, Default)]
pub struct TransactionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub tutor_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<TransactionStatus>,
    pub kind: Option<TransactionKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// 已校验的新流水（用于存储层）
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub tutor_id: i64,
    pub student_id: Option<i64>,
    pub lesson_id: Option<i64>,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub currency: String,
    pub status: TransactionStatus,
    pub occurred_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_by: i64,
}
