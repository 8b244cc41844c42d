//! 教师可用时段实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tutor_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tutor_id: i64,
    pub start_at: i64,
    pub end_at: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TutorId",
        to = "super::users::Column::Id"
    )]
    Tutor,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tutor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_slot(self) -> crate::models::slots::entities::TutorSlot {
        use super::ts_to_datetime;
        use crate::models::slots::entities::TutorSlot;

        TutorSlot {
            id: self.id,
            tutor_id: self.tutor_id,
            start_at: ts_to_datetime(self.start_at),
            end_at: ts_to_datetime(self.end_at),
            created_at: ts_to_datetime(self.created_at),
        }
    }
}
