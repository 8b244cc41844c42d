//! 收入流水实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "revenue_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub reference: String,
    pub tutor_id: i64,
    pub student_id: Option<i64>,
    pub lesson_id: Option<i64>,
    pub kind: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub occurred_at: i64,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lessons::Entity",
        from = "Column::LessonId",
        to = "super::lessons::Column::Id"
    )]
    Lesson,
}

impl Related<super::lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lesson.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_transaction(self) -> crate::models::revenue::entities::RevenueTransaction {
        use super::ts_to_datetime;
        use crate::models::revenue::entities::{
            RevenueTransaction, TransactionKind, TransactionStatus,
        };

        RevenueTransaction {
            id: self.id,
            reference: self.reference,
            tutor_id: self.tutor_id,
            student_id: self.student_id,
            lesson_id: self.lesson_id,
            kind: self
                .kind
                .parse::<TransactionKind>()
                .unwrap_or(TransactionKind::Adjustment),
            amount_cents: self.amount_cents,
            currency: self.currency,
            status: self
                .status
                .parse::<TransactionStatus>()
                .unwrap_or(TransactionStatus::Pending),
            note: self.note,
            occurred_at: ts_to_datetime(self.occurred_at),
            created_by: self.created_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
