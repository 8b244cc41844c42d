mod common;

use common::{at, storage, user};
use rust_tutorhub::errors::TutorHubError;
use rust_tutorhub::models::lessons::{
    entities::LessonStatus,
    requests::{LessonRangeQuery, NewLesson, UpdateLessonRequest},
};
use rust_tutorhub::models::revenue::{
    entities::{TransactionKind, TransactionStatus},
    requests::{NewTransaction, TransactionListQuery},
};
use rust_tutorhub::models::slots::{entities::TimeRange, requests::SlotEdit};
use rust_tutorhub::models::users::entities::UserRole;
use rust_tutorhub::services::lessons::create::within_availability;
use rust_tutorhub::storage::Storage;

fn new_lesson(tutor_id: i64, student_id: i64, day: u32, from: u32, to: u32) -> NewLesson {
    NewLesson {
        tutor_id,
        student_id,
        course_id: None,
        title: "Fingerstyle basics".to_string(),
        start_at: at(day, from),
        end_at: at(day, to),
        notes: None,
        price_cents: 0,
    }
}

#[tokio::test]
async fn test_overlapping_lesson_is_rejected() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;
    let student = user(&storage, "student_bo", UserRole::Student).await;
    let other = user(&storage, "student_cy", UserRole::Student).await;

    storage
        .create_lesson(new_lesson(tutor, student, 2, 10, 12))
        .await
        .unwrap();

    let err = storage
        .create_lesson(new_lesson(tutor, other, 2, 11, 13))
        .await
        .unwrap_err();
    assert!(matches!(err, TutorHubError::Scheduling(_)));

    // 端点相接不算冲突
    storage
        .create_lesson(new_lesson(tutor, other, 2, 12, 13))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancelled_lesson_frees_the_time() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;
    let student = user(&storage, "student_bo", UserRole::Student).await;

    let lesson = storage
        .create_lesson(new_lesson(tutor, student, 3, 9, 10))
        .await
        .unwrap();

    assert!(
        storage
            .cancel_lesson(lesson.id, student, Some("sick".to_string()))
            .await
            .unwrap()
    );
    // 重复取消不会生效
    assert!(!storage.cancel_lesson(lesson.id, student, None).await.unwrap());

    let cancelled = storage.get_lesson_by_id(lesson.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, LessonStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(student));
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("sick"));

    storage
        .create_lesson(new_lesson(tutor, student, 3, 9, 10))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reschedule_checks_other_lessons_only() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;
    let student = user(&storage, "student_bo", UserRole::Student).await;

    let first = storage
        .create_lesson(new_lesson(tutor, student, 4, 9, 10))
        .await
        .unwrap();
    storage
        .create_lesson(new_lesson(tutor, student, 4, 11, 12))
        .await
        .unwrap();

    // 与自身原时间重叠可以
    let moved = storage
        .update_lesson(
            first.id,
            UpdateLessonRequest {
                start_at: Some(at(4, 9)),
                end_at: Some(at(4, 11)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.end_at, at(4, 11));

    let err = storage
        .update_lesson(
            first.id,
            UpdateLessonRequest {
                end_at: Some(at(4, 12)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TutorHubError::Scheduling(_)));
}

#[tokio::test]
async fn test_complete_records_payment_once() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;
    let student = user(&storage, "student_bo", UserRole::Student).await;

    let mut lesson = new_lesson(tutor, student, 5, 14, 15);
    lesson.price_cents = 4500;
    let lesson = storage.create_lesson(lesson).await.unwrap();

    let payment = NewTransaction {
        tutor_id: tutor,
        student_id: Some(student),
        lesson_id: Some(lesson.id),
        kind: TransactionKind::LessonPayment,
        amount_cents: lesson.price_cents,
        currency: "USD".to_string(),
        status: TransactionStatus::Pending,
        occurred_at: lesson.end_at,
        note: None,
        created_by: tutor,
    };

    assert!(
        storage
            .complete_lesson(lesson.id, Some(payment.clone()))
            .await
            .unwrap()
    );
    assert!(!storage.complete_lesson(lesson.id, Some(payment)).await.unwrap());

    let transactions = storage
        .list_transactions(TransactionListQuery {
            tutor_id: Some(tutor),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].lesson_id, Some(lesson.id));
    assert_eq!(transactions[0].status, TransactionStatus::Pending);

    // 已完成的课时不能再取消
    assert!(!storage.cancel_lesson(lesson.id, tutor, None).await.unwrap());
}

#[tokio::test]
async fn test_range_query_filters_participant_and_cancelled() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;
    let bo = user(&storage, "student_bo", UserRole::Student).await;
    let cy = user(&storage, "student_cy", UserRole::Student).await;

    storage
        .create_lesson(new_lesson(tutor, bo, 6, 9, 10))
        .await
        .unwrap();
    let cancelled = storage
        .create_lesson(new_lesson(tutor, bo, 6, 10, 11))
        .await
        .unwrap();
    storage.cancel_lesson(cancelled.id, tutor, None).await.unwrap();
    storage
        .create_lesson(new_lesson(tutor, cy, 6, 12, 13))
        .await
        .unwrap();
    // 窗口外
    storage
        .create_lesson(new_lesson(tutor, bo, 8, 9, 10))
        .await
        .unwrap();

    let mut query = LessonRangeQuery::new(at(6, 0), at(7, 0));
    query.participant_id = Some(bo);
    let lessons = storage.list_lessons_in_range(query.clone()).await.unwrap();
    assert_eq!(lessons.len(), 1);

    query.include_cancelled = true;
    let lessons = storage.list_lessons_in_range(query).await.unwrap();
    assert_eq!(lessons.len(), 2);
    assert!(lessons[0].start_at < lessons[1].start_at);

    let mut by_tutor = LessonRangeQuery::new(at(6, 0), at(7, 0));
    by_tutor.tutor_id = Some(tutor);
    assert_eq!(storage.list_lessons_in_range(by_tutor).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_booking_must_fit_inside_availability() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;
    let other = user(&storage, "tutor_eli", UserRole::Tutor).await;

    // 09:00-12:00 可用
    storage
        .apply_slot_edit(
            tutor,
            SlotEdit {
                clear: Vec::new(),
                add_hours: vec![at(2, 9), at(2, 10), at(2, 11)],
            },
        )
        .await
        .unwrap();

    let inside = TimeRange::new(at(2, 10), at(2, 11));
    assert!(within_availability(&storage, tutor, inside).await.unwrap());

    let whole = TimeRange::new(at(2, 9), at(2, 12));
    assert!(within_availability(&storage, tutor, whole).await.unwrap());

    let straddling = TimeRange::new(
        at(2, 11) + chrono::TimeDelta::minutes(30),
        at(2, 12) + chrono::TimeDelta::minutes(30),
    );
    assert!(!within_availability(&storage, tutor, straddling).await.unwrap());

    // 其他教师的时段不算
    assert!(!within_availability(&storage, other, inside).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_bookings_do_not_double_book() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;
    let student = user(&storage, "student_bo", UserRole::Student).await;
    let other = user(&storage, "student_cy", UserRole::Student).await;

    let (first, second) = tokio::join!(
        storage.create_lesson(new_lesson(tutor, student, 9, 10, 12)),
        storage.create_lesson(new_lesson(tutor, other, 9, 11, 13)),
    );
    assert_eq!(
        [first.is_ok(), second.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count(),
        1
    );

    let mut query = LessonRangeQuery::new(at(9, 0), at(10, 0));
    query.tutor_id = Some(tutor);
    assert_eq!(storage.list_lessons_in_range(query).await.unwrap().len(), 1);
}
