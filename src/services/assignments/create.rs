use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, invalid_assignment, valid_max_score};
use crate::models::{
    ApiResponse, ErrorCode, assignments::requests::CreateAssignmentRequest,
    users::entities::UserRole,
};
use crate::services::{current_user, forbidden, require_role_user, storage_error_response};

pub async fn create_assignment(
    service: &AssignmentService,
    mut req: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    req.title = req.title.trim().to_string();
    if req.title.is_empty() {
        return Ok(invalid_assignment("Assignment title is required"));
    }
    if req.max_score.is_some_and(|s| !valid_max_score(s)) {
        return Ok(invalid_assignment("max_score must be greater than 0"));
    }

    let tutor_id = if current.is_admin() {
        match req.tutor_id {
            Some(id) => id,
            None => return Ok(invalid_assignment("tutor_id is required")),
        }
    } else {
        if req.tutor_id.is_some_and(|id| id != current.id) {
            return Ok(forbidden("Tutors can only assign work as themselves"));
        }
        current.id
    };

    let storage = service.get_storage(request)?;

    if let Err(response) = require_role_user(&storage, tutor_id, UserRole::Tutor).await {
        return Ok(response);
    }
    if let Err(response) = require_role_user(&storage, req.student_id, UserRole::Student).await {
        return Ok(response);
    }

    // 关联课时必须属于同一对师生
    if let Some(lesson_id) = req.lesson_id {
        match storage.get_lesson_by_id(lesson_id).await {
            Ok(Some(lesson))
                if lesson.tutor_id == tutor_id && lesson.student_id == req.student_id => {}
            Ok(Some(_)) => {
                return Ok(invalid_assignment(
                    "Lesson does not belong to this tutor and student",
                ));
            }
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::LessonNotFound,
                    "Lesson not found",
                )));
            }
            Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
        }
    }
    if let Some(song_id) = req.song_id {
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

    match storage.create_assignment(tutor_id, req).await {
        Ok(assignment) => {
            info!(
                "Assignment {} created by tutor {} for student {}",
                assignment.id, assignment.tutor_id, assignment.student_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created",
            )))
        }
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
