use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    AssignmentService, assignment_not_found, can_manage, invalid_assignment,
    load_visible_assignment, valid_max_score,
};
use crate::models::{ApiResponse, ErrorCode, assignments::requests::UpdateAssignmentRequest};
use crate::services::{current_user, forbidden, storage_error_response};

pub async fn update_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    mut update: UpdateAssignmentRequest,
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
        return Ok(forbidden("Only the assigning tutor can modify this assignment"));
    }

    if let Some(title) = update.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Ok(invalid_assignment("Assignment title must not be empty"));
        }
    }
    if update.max_score.is_some_and(|s| !valid_max_score(s)) {
        return Ok(invalid_assignment("max_score must be greater than 0"));
    }
    if let Some(song_id) = update.song_id {
        match storage.get_song_by_id(song_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::SongNotFound,
                    "Song not found",
                )));
            }
            Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
        }
    }

    match storage.update_assignment(assignment_id, update).await {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            updated,
            "Assignment updated",
        ))),
        Ok(None) => Ok(assignment_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
