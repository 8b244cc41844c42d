//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    assignments::entities::AssignmentStatus,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{NewSubmission, SubmissionReview},
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

async fn find_latest<C: ConnectionTrait>(conn: &C, assignment_id: i64) -> Result<Option<Model>> {
    Submissions::find()
        .filter(Column::AssignmentId.eq(assignment_id))
        .order_by_desc(Column::Version)
        .one(conn)
        .await
        .map_err(|e| TutorHubError::database_operation(format!("查询最新提交失败: {e}")))
}

/// 同步作业状态
async fn set_assignment_status<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    status: AssignmentStatus,
    now: i64,
) -> Result<()> {
    Assignments::update_many()
        .col_expr(AssignmentColumn::Status, Expr::value(status.to_string()))
        .col_expr(AssignmentColumn::UpdatedAt, Expr::value(now))
        .filter(AssignmentColumn::Id.eq(assignment_id))
        .exec(conn)
        .await
        .map_err(|e| TutorHubError::database_operation(format!("更新作业状态失败: {e}")))?;
    Ok(())
}

impl SeaOrmStorage {
    /// 新建提交
    ///
    /// 版本号取当前最大版本加一；最新提交待批改或已评分时拒绝
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("开启事务失败: {e}")))?;

        let latest = find_latest(&txn, req.assignment_id).await?;
        let latest_status = latest
            .as_ref()
            .and_then(|m| m.status.parse::<SubmissionStatus>().ok());

        if latest.is_some() && !SubmissionStatus::allows_new_submission(latest_status) {
            return Err(TutorHubError::conflict("当前提交尚未退回修改，不能再次提交"));
        }

        let version = latest.map(|m| m.version + 1).unwrap_or(1);

        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            version: Set(version),
            content: Set(req.content),
            practice_minutes: Set(req.practice_minutes),
            status: Set(SubmissionStatus::Submitted.to_string()),
            is_late: Set(req.is_late),
            submitted_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("创建提交失败: {e}")))?;

        set_assignment_status(&txn, req.assignment_id, AssignmentStatus::Submitted, now).await?;

        txn.commit()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取作业的最新提交
    pub async fn get_latest_submission_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Submission>> {
        Ok(find_latest(&self.db, assignment_id)
            .await?
            .map(|m| m.into_submission()))
    }

    /// 提交历史，按版本升序
    pub async fn list_submission_history_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        let items = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Version)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询提交历史失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 批改提交
    ///
    /// 只能批改最新且待批改的版本
    pub async fn review_submission_impl(
        &self,
        review: SubmissionReview,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(submission) = Submissions::find_by_id(review.submission_id)
            .one(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let is_latest = find_latest(&txn, submission.assignment_id)
            .await?
            .is_some_and(|m| m.id == submission.id);
        if !is_latest {
            return Err(TutorHubError::conflict("只能批改最新版本的提交"));
        }

        let result = Submissions::update_many()
            .col_expr(Column::Status, Expr::value(review.status.to_string()))
            .col_expr(Column::Score, Expr::value(review.score))
            .col_expr(Column::Feedback, Expr::value(review.feedback))
            .col_expr(Column::GradedBy, Expr::value(review.graded_by))
            .col_expr(Column::GradedAt, Expr::value(now))
            .filter(Column::Id.eq(submission.id))
            .filter(Column::Status.eq(SubmissionStatus::SUBMITTED))
            .exec(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("批改提交失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(TutorHubError::conflict("该提交已被批改"));
        }

        set_assignment_status(
            &txn,
            submission.assignment_id,
            AssignmentStatus::from_latest(Some(review.status)),
            now,
        )
        .await?;

        let updated = Submissions::find_by_id(submission.id)
            .one(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.map(|m| m.into_submission()))
    }
}
