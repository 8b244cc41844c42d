use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 生成字符串枚举的 Display / FromStr / Deserialize
macro_rules! string_enum {
    ($name:ident, $label:literal, { $($variant:ident => $value:literal),* $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)*
                    _ => Err(format!("Invalid {}: {s}", $label)),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse::<$name>().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// 流水类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub enum TransactionKind {
    LessonPayment, // 学费收入
    Refund,        // 退款
    Payout,        // 教师结算
    Adjustment,    // 调整（可正可负）
}

string_enum!(TransactionKind, "transaction kind", {
    LessonPayment => "lesson_payment",
    Refund => "refund",
    Payout => "payout",
    Adjustment => "adjustment",
});

/// 单笔金额（含课时与课程单价）的绝对值上限，以分计
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000;

/// 单价允许为 0，但不能为负或超过上限
pub fn is_valid_price(price_cents: i64) -> bool {
    (0..=MAX_AMOUNT_CENTS).contains(&price_cents)
}

impl TransactionKind {
    /// 金额在汇总中的方向：收入为正，退款与结算为负
    pub fn signed(&self, amount_cents: i64) -> i64 {
        match self {
            TransactionKind::LessonPayment | TransactionKind::Adjustment => amount_cents,
            TransactionKind::Refund | TransactionKind::Payout => amount_cents.saturating_neg(),
        }
    }

    /// 除调整外金额必须为正，且不超过 `MAX_AMOUNT_CENTS`
    pub fn accepts_amount(&self, amount_cents: i64) -> bool {
        if amount_cents.unsigned_abs() > MAX_AMOUNT_CENTS.unsigned_abs() {
            return false;
        }
        match self {
            TransactionKind::Adjustment => amount_cents != 0,
            _ => amount_cents > 0,
        }
    }
}

/// 流水状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub enum TransactionStatus {
    Pending, // 待支付
    Paid,    // 已支付
    Void,    // 作废
}

string_enum!(TransactionStatus, "transaction status", {
    Pending => "pending",
    Paid => "paid",
    Void => "void",
});

impl TransactionStatus {
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Paid)
                | (TransactionStatus::Pending, TransactionStatus::Void)
                | (TransactionStatus::Paid, TransactionStatus::Void)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/revenue.ts")]
pub struct RevenueTransaction {
    pub id: i64,
    // 对外展示的流水号
    pub reference: String,
    pub tutor_id: i64,
    pub student_id: Option<i64>,
    pub lesson_id: Option<i64>,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub currency: String,
    pub status: TransactionStatus,
    pub note: Option<String>,
    pub occurred_at: chrono::DateTime<chrono::Utc>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sign_and_amount_rules() {
        assert_eq!(TransactionKind::LessonPayment.signed(500), 500);
        assert_eq!(TransactionKind::Refund.signed(500), -500);
        assert_eq!(TransactionKind::Adjustment.signed(-200), -200);
        assert!(!TransactionKind::Payout.accepts_amount(-1));
        assert!(TransactionKind::Adjustment.accepts_amount(-1));
        assert!(!TransactionKind::Adjustment.accepts_amount(0));
    }

    #[test]
    fn test_amount_cap() {
        assert!(TransactionKind::LessonPayment.accepts_amount(MAX_AMOUNT_CENTS));
        assert!(!TransactionKind::LessonPayment.accepts_amount(MAX_AMOUNT_CENTS + 1));
        assert!(!TransactionKind::LessonPayment.accepts_amount(i64::MAX));
        assert!(TransactionKind::Adjustment.accepts_amount(-MAX_AMOUNT_CENTS));
        assert!(!TransactionKind::Adjustment.accepts_amount(i64::MIN));
        assert!(is_valid_price(0));
        assert!(!is_valid_price(-1));
        assert!(!is_valid_price(MAX_AMOUNT_CENTS + 1));
    }

    #[test]
    fn test_status_transitions() {
        use TransactionStatus::*;
        assert!(Pending.can_transition_to(Paid));
        assert!(Paid.can_transition_to(Void));
        assert!(!Void.can_transition_to(Paid));
        assert!(!Paid.can_transition_to(Pending));
    }

    #[test]
    fn test_parse_from_strings() {
        assert_eq!(
            "lesson_payment".parse::<TransactionKind>(),
            Ok(TransactionKind::LessonPayment)
        );
        assert!(serde_json::from_str::<TransactionStatus>("\"refunded\"").is_err());
    }
}
