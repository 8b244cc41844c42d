use super::entities::RevenueTransaction;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct TransactionListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<RevenueTransaction>,
}

/// 金额合计（最小货币单位）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct RevenueTotals {
    // 已支付学费
    pub gross_cents: i64,
    pub refunds_cents: i64,
    pub payouts_cents: i64,
    pub adjustments_cents: i64,
    // gross - refunds - payouts + adjustments
    pub net_cents: i64,
    // 待支付学费
    pub pending_cents: i64,
    pub transaction_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct MonthlyRevenue {
    // UTC 月份，格式 YYYY-MM
    pub month: String,
    pub totals: RevenueTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct CurrencySummary {
    pub currency: String,
    pub totals: RevenueTotals,
    pub months: Vec<MonthlyRevenue>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct RevenueSummaryResponse {
    pub tutor_id: Option<i64>,
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
    pub currencies: Vec<CurrencySummary>,
}
