//! 收入流水存储操作

use super::SeaOrmStorage;
use crate::entity::revenue_transactions::{
    ActiveModel, Column, Entity as RevenueTransactions, Model,
};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    revenue::{
        entities::{RevenueTransaction, TransactionStatus},
        requests::{NewTransaction, TransactionListQuery},
        responses::TransactionListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

/// 写入一笔流水，可在外部事务中调用
pub(super) async fn insert_transaction<C: ConnectionTrait>(
    conn: &C,
    tx: NewTransaction,
) -> Result<Model> {
    let now = chrono::Utc::now().timestamp();

    let model = ActiveModel {
        reference: Set(uuid::Uuid::new_v4().to_string()),
        tutor_id: Set(tx.tutor_id),
        student_id: Set(tx.student_id),
        lesson_id: Set(tx.lesson_id),
        kind: Set(tx.kind.to_string()),
        amount_cents: Set(tx.amount_cents),
        currency: Set(tx.currency),
        status: Set(tx.status.to_string()),
        note: Set(tx.note),
        occurred_at: Set(tx.occurred_at.timestamp()),
        created_by: Set(tx.created_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model
        .insert(conn)
        .await
        .map_err(|e| TutorHubError::database_operation(format!("记录流水失败: {e}")))
}

fn filtered(query: &TransactionListQuery) -> Select<RevenueTransactions> {
    let mut select = RevenueTransactions::find();

    if let Some(tutor_id) = query.tutor_id {
        select = select.filter(Column::TutorId.eq(tutor_id));
    }
    if let Some(student_id) = query.student_id {
        select = select.filter(Column::StudentId.eq(student_id));
    }
    if let Some(status) = query.status {
        select = select.filter(Column::Status.eq(status.to_string()));
    }
    if let Some(kind) = query.kind {
        select = select.filter(Column::Kind.eq(kind.to_string()));
    }
    // 左闭右开
    if let Some(from) = query.from {
        select = select.filter(Column::OccurredAt.gte(from.timestamp()));
    }
    if let Some(to) = query.to {
        select = select.filter(Column::OccurredAt.lt(to.timestamp()));
    }

    select
}

impl SeaOrmStorage {
    /// 记录流水
    pub async fn create_transaction_impl(&self, tx: NewTransaction) -> Result<RevenueTransaction> {
        Ok(insert_transaction(&self.db, tx).await?.into_transaction())
    }

    /// 通过 ID 获取流水
    pub async fn get_transaction_by_id_impl(
        &self,
        transaction_id: i64,
    ) -> Result<Option<RevenueTransaction>> {
        let result = RevenueTransactions::find_by_id(transaction_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询流水失败: {e}")))?;

        Ok(result.map(|m| m.into_transaction()))
    }

    /// 分页列出流水，按发生时间倒序
    pub async fn list_transactions_with_pagination_impl(
        &self,
        query: TransactionListQuery,
    ) -> Result<TransactionListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let paginator = filtered(&query)
            .order_by_desc(Column::OccurredAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询流水总数失败: {e}")))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询流水列表失败: {e}")))?;

        Ok(TransactionListResponse {
            items: items.into_iter().map(|m| m.into_transaction()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 列出全部匹配的流水
    pub async fn list_transactions_impl(
        &self,
        query: TransactionListQuery,
    ) -> Result<Vec<RevenueTransaction>> {
        let items = filtered(&query)
            .order_by_asc(Column::OccurredAt)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询流水列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_transaction()).collect())
    }

    /// 修改流水状态
    ///
    /// 以当前状态为条件更新，并发修改时只有一方成功
    pub async fn update_transaction_status_impl(
        &self,
        transaction_id: i64,
        from: TransactionStatus,
        to: TransactionStatus,
        note: Option<String>,
    ) -> Result<bool> {
        let mut update = RevenueTransactions::update_many()
            .col_expr(Column::Status, Expr::value(to.to_string()))
            .col_expr(
                Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            );

        if let Some(note) = note {
            update = update.col_expr(Column::Note, Expr::value(note));
        }

        let result = update
            .filter(Column::Id.eq(transaction_id))
            .filter(Column::Status.eq(from.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新流水状态失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
