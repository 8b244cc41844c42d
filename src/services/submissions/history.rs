use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{
    ApiResponse, ErrorCode, submissions::responses::SubmissionHistoryResponse,
};
use crate::services::assignments::load_visible_assignment;
use crate::services::{current_user, storage_error_response};

pub async fn list_history(
    service: &SubmissionService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    if let Err(response) = load_visible_assignment(&storage, assignment_id, &current).await {
        return Ok(response);
    }

    match storage.list_submission_history(assignment_id).await {
        Ok(mut items) => {
            items.reverse();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionHistoryResponse {
                    assignment_id,
                    items,
                },
                "Submission history retrieved successfully",
            )))
        }
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
