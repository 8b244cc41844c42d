//! 课时存储操作

use super::SeaOrmStorage;
use super::revenue::insert_transaction;
use super::users::lock_user_row;
use crate::entity::lessons::{ActiveModel, Column, Entity as Lessons};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    lessons::{
        entities::{Lesson, LessonStatus},
        requests::{LessonListQuery, LessonRangeQuery, NewLesson, UpdateLessonRequest},
        responses::LessonListResponse,
    },
    revenue::requests::NewTransaction,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 查找同一教师在 `[start, end)` 内未取消的课时
async fn find_tutor_overlap<C: ConnectionTrait>(
    conn: &C,
    tutor_id: i64,
    start: i64,
    end: i64,
    exclude_id: Option<i64>,
) -> Result<Option<i64>> {
    let mut select = Lessons::find()
        .filter(Column::TutorId.eq(tutor_id))
        .filter(Column::Status.ne(LessonStatus::CANCELLED))
        .filter(Column::StartAt.lt(end))
        .filter(Column::EndAt.gt(start));

    if let Some(id) = exclude_id {
        select = select.filter(Column::Id.ne(id));
    }

    let found = select
        .one(conn)
        .await
        .map_err(|e| TutorHubError::database_operation(format!("查询时间冲突失败: {e}")))?;

    Ok(found.map(|m| m.id))
}

impl SeaOrmStorage {
    /// 创建课时
    ///
    /// 冲突检测与插入在同一事务中完成，检测前先锁定教师行
    pub async fn create_lesson_impl(&self, lesson: NewLesson) -> Result<Lesson> {
        let now = chrono::Utc::now().timestamp();
        let start = lesson.start_at.timestamp();
        let end = lesson.end_at.timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("开启事务失败: {e}")))?;

        lock_user_row(&txn, lesson.tutor_id).await?;
        if let Some(other) = find_tutor_overlap(&txn, lesson.tutor_id, start, end, None).await? {
            return Err(TutorHubError::scheduling(format!(
                "教师在该时间段已有课时 (#{other})"
            )));
        }

        let model = ActiveModel {
            tutor_id: Set(lesson.tutor_id),
            student_id: Set(lesson.student_id),
            course_id: Set(lesson.course_id),
            title: Set(lesson.title),
            start_at: Set(start),
            end_at: Set(end),
            status: Set(LessonStatus::Scheduled.to_string()),
            notes: Set(lesson.notes),
            price_cents: Set(lesson.price_cents),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("创建课时失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_lesson())
    }

    /// 通过 ID 获取课时
    pub async fn get_lesson_by_id_impl(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        let result = Lessons::find_by_id(lesson_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询课时失败: {e}")))?;

        Ok(result.map(|m| m.into_lesson()))
    }

    /// 分页列出课时
    pub async fn list_lessons_with_pagination_impl(
        &self,
        query: LessonListQuery,
    ) -> Result<LessonListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Lessons::find();

        if let Some(tutor_id) = query.tutor_id {
            select = select.filter(Column::TutorId.eq(tutor_id));
        }

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(user_id) = query.participant_id {
            select = select.filter(
                Condition::any()
                    .add(Column::TutorId.eq(user_id))
                    .add(Column::StudentId.eq(user_id)),
            );
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 时间范围按重叠计算
        if let Some(from) = query.from {
            select = select.filter(Column::EndAt.gt(from.timestamp()));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::StartAt.lt(to.timestamp()));
        }

        select = select.order_by_asc(Column::StartAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询课时总数失败: {e}")))?;

        let lessons = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询课时列表失败: {e}")))?;

        Ok(LessonListResponse {
            items: lessons.into_iter().map(|m| m.into_lesson()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 列出与时间窗口重叠的课时
    pub async fn list_lessons_in_range_impl(&self, query: LessonRangeQuery) -> Result<Vec<Lesson>> {
        let mut select = Lessons::find()
            .filter(Column::StartAt.lt(query.to.timestamp()))
            .filter(Column::EndAt.gt(query.from.timestamp()));

        if let Some(tutor_id) = query.tutor_id {
            select = select.filter(Column::TutorId.eq(tutor_id));
        }

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(user_id) = query.participant_id {
            select = select.filter(
                Condition::any()
                    .add(Column::TutorId.eq(user_id))
                    .add(Column::StudentId.eq(user_id)),
            );
        }

        if !query.include_cancelled {
            select = select.filter(Column::Status.ne(LessonStatus::CANCELLED));
        }

        if let Some(id) = query.exclude_id {
            select = select.filter(Column::Id.ne(id));
        }

        let lessons = select
            .order_by_asc(Column::StartAt)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询课时失败: {e}")))?;

        Ok(lessons.into_iter().map(|m| m.into_lesson()).collect())
    }

    /// 更新/改期
    ///
    /// 只有已排课的课时可以修改，改期时在事务内重新检测冲突
    pub async fn update_lesson_impl(
        &self,
        lesson_id: i64,
        update: UpdateLessonRequest,
    ) -> Result<Option<Lesson>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Lessons::find_by_id(lesson_id)
            .one(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询课时失败: {e}")))?
        else {
            return Ok(None);
        };

        if existing.status != LessonStatus::SCHEDULED {
            return Err(TutorHubError::conflict("只有已排课的课时可以修改"));
        }

        let start = update
            .start_at
            .map(|t| t.timestamp())
            .unwrap_or(existing.start_at);
        let end = update.end_at.map(|t| t.timestamp()).unwrap_or(existing.end_at);

        if start >= end {
            return Err(TutorHubError::validation("开始时间必须早于结束时间"));
        }

        let rescheduled = start != existing.start_at || end != existing.end_at;
        if rescheduled {
            lock_user_row(&txn, existing.tutor_id).await?;
        }
        if rescheduled
            && let Some(other) =
                find_tutor_overlap(&txn, existing.tutor_id, start, end, Some(lesson_id)).await?
        {
            return Err(TutorHubError::scheduling(format!(
                "教师在该时间段已有课时 (#{other})"
            )));
        }

        let mut model: ActiveModel = existing.into();
        model.start_at = Set(start);
        model.end_at = Set(end);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }
        if let Some(price) = update.price_cents {
            model.price_cents = Set(price);
        }

        let result = model
            .update(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新课时失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(result.into_lesson()))
    }

    /// 取消课时
    ///
    /// 条件更新：只有状态仍为 scheduled 时才会生效
    pub async fn cancel_lesson_impl(
        &self,
        lesson_id: i64,
        cancelled_by: i64,
        reason: Option<String>,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Lessons::update_many()
            .col_expr(Column::Status, Expr::value(LessonStatus::CANCELLED))
            .col_expr(Column::CancelReason, Expr::value(reason))
            .col_expr(Column::CancelledBy, Expr::value(cancelled_by))
            .col_expr(Column::CancelledAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(lesson_id))
            .filter(Column::Status.eq(LessonStatus::SCHEDULED))
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("取消课时失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 完成课时，并在同一事务中记录学费流水
    pub async fn complete_lesson_impl(
        &self,
        lesson_id: i64,
        payment: Option<NewTransaction>,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("开启事务失败: {e}")))?;

        let result = Lessons::update_many()
            .col_expr(Column::Status, Expr::value(LessonStatus::COMPLETED))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(lesson_id))
            .filter(Column::Status.eq(LessonStatus::SCHEDULED))
            .exec(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("完成课时失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        if let Some(payment) = payment {
            insert_transaction(&txn, payment).await?;
        }

        txn.commit()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    /// 删除课时
    pub async fn delete_lesson_impl(&self, lesson_id: i64) -> Result<bool> {
        let result = Lessons::delete_by_id(lesson_id)
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("删除课时失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
