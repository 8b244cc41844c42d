//! 课时实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tutor_id: i64,
    pub student_id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub start_at: i64,
    pub end_at: i64,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub price_cents: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub cancel_reason: Option<String>,
    pub cancelled_by: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_lesson(self) -> crate::models::lessons::entities::Lesson {
        use super::ts_to_datetime;
        use crate::models::lessons::entities::{Lesson, LessonStatus};

        Lesson {
            id: self.id,
            tutor_id: self.tutor_id,
            student_id: self.student_id,
            course_id: self.course_id,
            title: self.title,
            start_at: ts_to_datetime(self.start_at),
            end_at: ts_to_datetime(self.end_at),
            status: self
                .status
                .parse::<LessonStatus>()
                .unwrap_or(LessonStatus::Scheduled),
            notes: self.notes,
            price_cents: self.price_cents,
            cancel_reason: self.cancel_reason,
            cancelled_by: self.cancelled_by,
            cancelled_at: self.cancelled_at.map(ts_to_datetime),
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
