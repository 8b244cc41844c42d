use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::SubmissionService;
use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::requests::{CreateSubmissionRequest, NewSubmission},
};
use crate::services::assignments::load_visible_assignment;
use crate::services::{current_user, forbidden, storage_error_response};

fn not_allowed(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::SubmissionNotAllowed,
        msg,
    ))
}

pub async fn submit(
    service: &SubmissionService,
    assignment_id: i64,
    req: CreateSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Submission content is required",
        )));
    }
    if req.practice_minutes.is_some_and(|m| m < 0) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "practice_minutes must not be negative",
        )));
    }

    let storage = service.get_storage(request)?;

    let assignment = match load_visible_assignment(&storage, assignment_id, &current).await {
        Ok(assignment) => assignment,
        Err(response) => return Ok(response),
    };
    if assignment.student_id != current.id {
        return Ok(forbidden("Only the assigned student can submit"));
    }
    if !assignment.status.awaiting_student() {
        return Ok(not_allowed(
            "The latest submission is awaiting review or already graded",
        ));
    }

    let new_submission = NewSubmission {
        assignment_id,
        student_id: current.id,
        content,
        practice_minutes: req.practice_minutes,
        is_late: assignment.due_at.is_some_and(|due| Utc::now() > due),
    };

    match storage.create_submission(new_submission).await {
        Ok(submission) => {
            info!(
                "Submission v{} for assignment {} by student {}",
                submission.version, assignment_id, current.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                submission,
                "Submission received",
            )))
        }
        // 并发提交时由存储层拒绝
        Err(TutorHubError::Conflict(msg)) => Ok(not_allowed(msg)),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
