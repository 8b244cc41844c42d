mod common;

use common::{storage, user};
use rust_tutorhub::errors::TutorHubError;
use rust_tutorhub::models::assignments::{
    entities::AssignmentStatus, requests::CreateAssignmentRequest,
};
use rust_tutorhub::models::submissions::{
    entities::SubmissionStatus,
    requests::{NewSubmission, SubmissionReview},
};
use rust_tutorhub::models::users::entities::UserRole;
use rust_tutorhub::storage::{SeaOrmStorage, Storage};

fn submission(assignment_id: i64, student_id: i64, content: &str) -> NewSubmission {
    NewSubmission {
        assignment_id,
        student_id,
        content: content.to_string(),
        practice_minutes: Some(30),
        is_late: false,
    }
}

async fn setup(storage: &SeaOrmStorage) -> (i64, i64, i64) {
    let tutor = user(storage, "tutor_ana", UserRole::Tutor).await;
    let student = user(storage, "student_bo", UserRole::Student).await;
    let assignment = storage
        .create_assignment(
            tutor,
            CreateAssignmentRequest {
                tutor_id: Some(tutor),
                student_id: student,
                lesson_id: None,
                song_id: None,
                title: "Practice the C major scale".to_string(),
                description: None,
                due_at: None,
                max_score: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(assignment.max_score, 100.0);
    assert_eq!(assignment.status, AssignmentStatus::Assigned);
    (tutor, student, assignment.id)
}

#[tokio::test]
async fn test_submission_revision_cycle() {
    let storage = storage().await;
    let (tutor, student, assignment_id) = setup(&storage).await;

    let first = storage
        .create_submission(submission(assignment_id, student, "take one"))
        .await
        .unwrap();
    assert_eq!(first.version, 1);
    assert_eq!(first.status, SubmissionStatus::Submitted);

    // 待批改时不能再提交
    let err = storage
        .create_submission(submission(assignment_id, student, "take two"))
        .await
        .unwrap_err();
    assert!(matches!(err, TutorHubError::Conflict(_)));

    let reviewed = storage
        .review_submission(SubmissionReview {
            submission_id: first.id,
            graded_by: tutor,
            status: SubmissionStatus::RevisionRequested,
            score: None,
            feedback: Some("Watch the tempo".to_string()),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reviewed.status, SubmissionStatus::RevisionRequested);

    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assignment.status, AssignmentStatus::RevisionRequested);

    let second = storage
        .create_submission(submission(assignment_id, student, "take two"))
        .await
        .unwrap();
    assert_eq!(second.version, 2);

    // 旧版本不能批改
    let err = storage
        .review_submission(SubmissionReview {
            submission_id: first.id,
            graded_by: tutor,
            status: SubmissionStatus::Graded,
            score: Some(90.0),
            feedback: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TutorHubError::Conflict(_)));

    let graded = storage
        .review_submission(SubmissionReview {
            submission_id: second.id,
            graded_by: tutor,
            status: SubmissionStatus::Graded,
            score: Some(92.5),
            feedback: Some("Clean".to_string()),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(graded.score, Some(92.5));
    assert_eq!(graded.graded_by, Some(tutor));

    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Graded);

    // 已评分后不能再提交
    assert!(
        storage
            .create_submission(submission(assignment_id, student, "take three"))
            .await
            .is_err()
    );

    let history = storage.list_submission_history(assignment_id).await.unwrap();
    assert_eq!(
        history.iter().map(|s| s.version).collect::<Vec<_>>(),
        vec![1, 2]
    );
    let latest = storage.get_latest_submission(assignment_id).await.unwrap().unwrap();
    assert_eq!(latest.id, second.id);
}

#[tokio::test]
async fn test_double_review_conflicts() {
    let storage = storage().await;
    let (tutor, student, assignment_id) = setup(&storage).await;

    let sub = storage
        .create_submission(submission(assignment_id, student, "take one"))
        .await
        .unwrap();

    let review = SubmissionReview {
        submission_id: sub.id,
        graded_by: tutor,
        status: SubmissionStatus::Graded,
        score: Some(80.0),
        feedback: None,
    };
    storage.review_submission(review.clone()).await.unwrap();

    let err = storage.review_submission(review).await.unwrap_err();
    assert!(matches!(err, TutorHubError::Conflict(_)));
}

#[tokio::test]
async fn test_deleting_assignment_removes_submissions() {
    let storage = storage().await;
    let (_, student, assignment_id) = setup(&storage).await;

    storage
        .create_submission(submission(assignment_id, student, "take one"))
        .await
        .unwrap();

    assert!(storage.delete_assignment(assignment_id).await.unwrap());
    assert!(
        storage
            .list_submission_history(assignment_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(storage.get_assignment_by_id(assignment_id).await.unwrap().is_none());
}
