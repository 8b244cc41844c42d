mod common;

use common::{at, storage, user};
use rust_tutorhub::models::revenue::{
    entities::{TransactionKind, TransactionStatus},
    requests::{NewTransaction, TransactionListQuery},
};
use rust_tutorhub::models::users::entities::UserRole;
use rust_tutorhub::services::revenue::summary::summarize;
use rust_tutorhub::storage::Storage;

fn tx(tutor_id: i64, kind: TransactionKind, amount: i64, day: u32) -> NewTransaction {
    NewTransaction {
        tutor_id,
        student_id: None,
        lesson_id: None,
        kind,
        amount_cents: amount,
        currency: "USD".to_string(),
        status: TransactionStatus::Paid,
        occurred_at: at(day, 12),
        note: None,
        created_by: tutor_id,
    }
}

#[tokio::test]
async fn test_status_update_is_conditional() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;

    let mut pending = tx(tutor, TransactionKind::LessonPayment, 5000, 2);
    pending.status = TransactionStatus::Pending;
    let created = storage.create_transaction(pending).await.unwrap();
    assert!(!created.reference.is_empty());

    assert!(
        storage
            .update_transaction_status(
                created.id,
                TransactionStatus::Pending,
                TransactionStatus::Paid,
                Some("cash".to_string()),
            )
            .await
            .unwrap()
    );
    // 状态已变化，基于旧状态的更新失败
    assert!(
        !storage
            .update_transaction_status(
                created.id,
                TransactionStatus::Pending,
                TransactionStatus::Void,
                None,
            )
            .await
            .unwrap()
    );

    let stored = storage
        .get_transaction_by_id(created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, TransactionStatus::Paid);
    assert_eq!(stored.note.as_deref(), Some("cash"));
}

#[tokio::test]
async fn test_list_filters_and_summary() {
    let storage = storage().await;
    let ana = user(&storage, "tutor_ana", UserRole::Tutor).await;
    let dee = user(&storage, "tutor_dee", UserRole::Tutor).await;

    storage
        .create_transaction(tx(ana, TransactionKind::LessonPayment, 6000, 2))
        .await
        .unwrap();
    storage
        .create_transaction(tx(ana, TransactionKind::Refund, 1000, 3))
        .await
        .unwrap();
    storage
        .create_transaction(tx(ana, TransactionKind::Payout, 2000, 15))
        .await
        .unwrap();
    storage
        .create_transaction(tx(dee, TransactionKind::LessonPayment, 9999, 2))
        .await
        .unwrap();

    let page = storage
        .list_transactions_with_pagination(TransactionListQuery {
            page: Some(1),
            size: Some(2),
            tutor_id: Some(ana),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total, 3);

    let refunds = storage
        .list_transactions(TransactionListQuery {
            tutor_id: Some(ana),
            kind: Some(TransactionKind::Refund),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(refunds.len(), 1);

    let early_march = storage
        .list_transactions(TransactionListQuery {
            tutor_id: Some(ana),
            from: Some(at(1, 0)),
            to: Some(at(10, 0)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(early_march.len(), 2);

    let all = storage
        .list_transactions(TransactionListQuery {
            tutor_id: Some(ana),
            ..Default::default()
        })
        .await
        .unwrap();
    let summary = summarize(&all).unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].totals.gross_cents, 6000);
    assert_eq!(summary[0].totals.net_cents, 3000);
}
