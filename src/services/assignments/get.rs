use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_visible_assignment};
use crate::models::{ApiResponse, ErrorCode, assignments::responses::AssignmentDetail};
use crate::services::{current_user, storage_error_response};

pub async fn get_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let assignment = match load_visible_assignment(&storage, assignment_id, &current).await {
        Ok(assignment) => assignment,
        Err(response) => return Ok(response),
    };

    let latest_submission = match storage.get_latest_submission(assignment_id).await {
        Ok(latest) => latest,
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    let detail = AssignmentDetail {
        overdue: assignment.is_overdue(chrono::Utc::now()),
        assignment,
        latest_submission,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Assignment retrieved successfully",
    )))
}
