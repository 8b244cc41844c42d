use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::{
    Assignments, Lessons, RevenueTransactions, Submissions, TutorSlots,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

// 课时、作业、流水与时段的查询索引
fn index_specs() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .if_not_exists()
            .name("idx_lessons_tutor_start")
            .table(Lessons::Table)
            .col(Lessons::TutorId)
            .col(Lessons::StartAt)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_lessons_student_start")
            .table(Lessons::Table)
            .col(Lessons::StudentId)
            .col(Lessons::StartAt)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_assignments_student")
            .table(Assignments::Table)
            .col(Assignments::StudentId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_submissions_assignment_version")
            .table(Submissions::Table)
            .col(Submissions::AssignmentId)
            .col(Submissions::Version)
            .unique()
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_revenue_tutor_occurred")
            .table(RevenueTransactions::Table)
            .col(RevenueTransactions::TutorId)
            .col(RevenueTransactions::OccurredAt)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_tutor_slots_tutor_start")
            .table(TutorSlots::Table)
            .col(TutorSlots::TutorId)
            .col(TutorSlots::StartAt)
            .to_owned(),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for index in index_specs() {
            manager.create_index(index).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_tutor_slots_tutor_start")
                    .table(TutorSlots::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_revenue_tutor_occurred")
                    .table(RevenueTransactions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_submissions_assignment_version")
                    .table(Submissions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_assignments_student")
                    .table(Assignments::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_lessons_student_start")
                    .table(Lessons::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_lessons_tutor_start")
                    .table(Lessons::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
