use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{
        entities::ReviewAction,
        requests::{ReviewSubmissionRequest, SubmissionReview},
    },
};
use crate::services::assignments::{can_manage, load_visible_assignment};
use crate::services::{current_user, forbidden, storage_error_response};

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubmissionNotFound,
        "Submission not found",
    ))
}

fn not_reviewable(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::SubmissionNotReviewable,
        msg,
    ))
}

/// 校验批改内容，返回（分数，反馈）
///
/// 评分时分数必须在 0..=max_score；退回修改时必须填写反馈且不带分数
pub(crate) fn check_review(
    action: ReviewAction,
    score: Option<f64>,
    feedback: Option<String>,
    max_score: f64,
) -> Result<(Option<f64>, Option<String>), String> {
    let feedback = feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    match action {
        ReviewAction::Grade => match score {
            Some(s) if s.is_finite() && (0.0..=max_score).contains(&s) => Ok((Some(s), feedback)),
            Some(_) => Err(format!("Score must be between 0 and {max_score}")),
            None => Err("Score is required when grading".to_string()),
        },
        ReviewAction::RequestRevision => match feedback {
            Some(f) => Ok((None, Some(f))),
            None => Err("Feedback is required when requesting a revision".to_string()),
        },
    }
}

pub async fn review_submission(
    service: &SubmissionService,
    submission_id: i64,
    req: ReviewSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => return Ok(not_found()),
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    let assignment =
        match load_visible_assignment(&storage, submission.assignment_id, &current).await {
            Ok(assignment) => assignment,
            Err(response) => return Ok(response),
        };
    if !can_manage(&current, &assignment) {
        return Ok(forbidden("Only the assigning tutor can review submissions"));
    }

    let (score, feedback) =
        match check_review(req.action, req.score, req.feedback, assignment.max_score) {
            Ok(checked) => checked,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::GradeInvalid,
                    msg,
                )));
            }
        };

    let review = SubmissionReview {
        submission_id,
        graded_by: current.id,
        status: req.action.resulting_status(),
        score,
        feedback,
    };

    match storage.review_submission(review).await {
        Ok(Some(updated)) => {
            info!(
                "Submission {} reviewed ({}) by user {}",
                submission_id, updated.status, current.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Submission reviewed")))
        }
        Ok(None) => Ok(not_found()),
        Err(TutorHubError::Conflict(msg)) => Ok(not_reviewable(msg)),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_requires_score_in_range() {
        assert_eq!(
            check_review(ReviewAction::Grade, Some(87.5), None, 100.0),
            Ok((Some(87.5), None))
        );
        assert!(check_review(ReviewAction::Grade, Some(0.0), None, 100.0).is_ok());
        assert!(check_review(ReviewAction::Grade, Some(100.0), None, 100.0).is_ok());
        assert!(check_review(ReviewAction::Grade, Some(100.5), None, 100.0).is_err());
        assert!(check_review(ReviewAction::Grade, Some(-1.0), None, 100.0).is_err());
        assert!(check_review(ReviewAction::Grade, None, None, 100.0).is_err());
    }

    #[test]
    fn test_revision_requires_feedback() {
        assert!(check_review(ReviewAction::RequestRevision, None, None, 10.0).is_err());
        assert!(
            check_review(ReviewAction::RequestRevision, None, Some("  ".into()), 10.0).is_err()
        );
        assert_eq!(
            check_review(
                ReviewAction::RequestRevision,
                Some(5.0),
                Some(" slow down the bridge ".into()),
                10.0
            ),
            Ok((None, Some("slow down the bridge".to_string())))
        );
    }
}
