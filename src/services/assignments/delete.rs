use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, assignment_not_found, can_manage, load_visible_assignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, storage_error_response};

pub async fn delete_assignment(
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
    if !can_manage(&current, &assignment) {
        return Ok(forbidden("Only the assigning tutor can delete this assignment"));
    }

    match storage.delete_assignment(assignment_id).await {
        Ok(true) => {
            info!("Assignment {} deleted by user {}", assignment_id, current.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Assignment deleted")))
        }
        Ok(false) => Ok(assignment_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
