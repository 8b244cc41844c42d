//! 收入汇总
//!
//! 按币种分组，再按 UTC 月份（`YYYY-MM`）细分。作废的流水不计入。

use std::collections::BTreeMap;

use crate::errors::{Result, TutorHubError};
use crate::models::revenue::{
    entities::{RevenueTransaction, TransactionKind, TransactionStatus},
    responses::{CurrencySummary, MonthlyRevenue, RevenueTotals},
};

fn out_of_range() -> TutorHubError {
    TutorHubError::validation("Revenue totals exceed the supported range, narrow the query")
}

impl RevenueTotals {
    /// 累加一笔流水，合计超出 i64 时返回错误
    ///
    /// 待支付流水只计入 `pending_cents`（按类型带符号），已支付流水按类型计入各项
    pub fn add(&mut self, tx: &RevenueTransaction) -> Result<()> {
        let (total, amount) = match tx.status {
            TransactionStatus::Void => return Ok(()),
            TransactionStatus::Pending => (&mut self.pending_cents, tx.kind.signed(tx.amount_cents)),
            TransactionStatus::Paid => match tx.kind {
                TransactionKind::LessonPayment => (&mut self.gross_cents, tx.amount_cents),
                TransactionKind::Refund => (&mut self.refunds_cents, tx.amount_cents),
                TransactionKind::Payout => (&mut self.payouts_cents, tx.amount_cents),
                TransactionKind::Adjustment => (&mut self.adjustments_cents, tx.amount_cents),
            },
        };
        *total = total.checked_add(amount).ok_or_else(out_of_range)?;

        let net = i128::from(self.gross_cents) - i128::from(self.refunds_cents)
            - i128::from(self.payouts_cents)
            + i128::from(self.adjustments_cents);
        self.net_cents = i64::try_from(net).map_err(|_| out_of_range())?;
        self.transaction_count += 1;
        Ok(())
    }
}

pub fn summarize(transactions: &[RevenueTransaction]) -> Result<Vec<CurrencySummary>> {
    let mut by_currency: BTreeMap<&str, (RevenueTotals, BTreeMap<String, RevenueTotals>)> =
        BTreeMap::new();

    for tx in transactions {
        if tx.status == TransactionStatus::Void {
            continue;
        }
        let (totals, months) = by_currency.entry(tx.currency.as_str()).or_default();
        totals.add(tx)?;
        months
            .entry(tx.occurred_at.format("%Y-%m").to_string())
            .or_default()
            .add(tx)?;
    }

    Ok(by_currency
        .into_iter()
        .map(|(currency, (totals, months))| CurrencySummary {
            currency: currency.to_string(),
            totals,
            months: months
                .into_iter()
                .map(|(month, totals)| MonthlyRevenue { month, totals })
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tx(
        kind: TransactionKind,
        status: TransactionStatus,
        amount: i64,
        currency: &str,
        month: u32,
    ) -> RevenueTransaction {
        let at = Utc.with_ymd_and_hms(2026, month, 15, 12, 0, 0).unwrap();
        RevenueTransaction {
            id: 0,
            reference: "ref".to_string(),
            tutor_id: 2,
            student_id: Some(3),
            lesson_id: None,
            kind,
            amount_cents: amount,
            currency: currency.to_string(),
            status,
            note: None,
            occurred_at: at,
            created_by: 1,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_net_and_pending() {
        use TransactionKind::*;
        use TransactionStatus::*;

        let list = vec![
            tx(LessonPayment, Paid, 10_000, "USD", 1),
            tx(LessonPayment, Paid, 5_000, "USD", 2),
            tx(Refund, Paid, 2_000, "USD", 2),
            tx(Payout, Paid, 6_000, "USD", 2),
            tx(Adjustment, Paid, -500, "USD", 2),
            tx(LessonPayment, Pending, 4_000, "USD", 2),
            tx(LessonPayment, Void, 99_999, "USD", 2),
        ];
        let summary = summarize(&list).unwrap();
        assert_eq!(summary.len(), 1);

        let usd = &summary[0];
        assert_eq!(usd.currency, "USD");
        assert_eq!(usd.totals.gross_cents, 15_000);
        assert_eq!(usd.totals.refunds_cents, 2_000);
        assert_eq!(usd.totals.payouts_cents, 6_000);
        assert_eq!(usd.totals.adjustments_cents, -500);
        assert_eq!(usd.totals.net_cents, 15_000 - 2_000 - 6_000 - 500);
        assert_eq!(usd.totals.pending_cents, 4_000);
        assert_eq!(usd.totals.transaction_count, 6);

        let months: Vec<&str> = usd.months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2026-01", "2026-02"]);
        assert_eq!(usd.months[0].totals.net_cents, 10_000);
        assert_eq!(usd.months[1].totals.net_cents, 5_000 - 2_000 - 6_000 - 500);
    }

    #[test]
    fn test_currencies_are_not_mixed() {
        let list = vec![
            tx(TransactionKind::LessonPayment, TransactionStatus::Paid, 100, "USD", 3),
            tx(TransactionKind::LessonPayment, TransactionStatus::Paid, 200, "EUR", 3),
        ];
        let summary = summarize(&list).unwrap();
        let currencies: Vec<&str> = summary.iter().map(|c| c.currency.as_str()).collect();
        assert_eq!(currencies, vec!["EUR", "USD"]);
        assert_eq!(summary[0].totals.gross_cents, 200);
        assert_eq!(summary[1].totals.gross_cents, 100);
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_totals_overflow_is_an_error() {
        let list = vec![
            tx(TransactionKind::LessonPayment, TransactionStatus::Paid, i64::MAX, "USD", 4),
            tx(TransactionKind::LessonPayment, TransactionStatus::Paid, 1, "USD", 4),
        ];
        assert!(matches!(summarize(&list), Err(TutorHubError::Validation(_))));
    }

    #[test]
    fn test_net_overflow_is_an_error() {
        let list = vec![
            tx(TransactionKind::LessonPayment, TransactionStatus::Paid, i64::MAX, "USD", 4),
            tx(TransactionKind::Adjustment, TransactionStatus::Paid, 1, "USD", 4),
        ];
        assert!(summarize(&list).is_err());
    }
}
