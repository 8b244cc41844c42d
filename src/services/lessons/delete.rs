use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{LessonService, lesson_not_found};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, storage_error_response};

pub async fn delete_lesson(
    service: &LessonService,
    lesson_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if !current.is_admin() {
        return Ok(forbidden("Only administrators can delete lessons"));
    }

    let storage = service.get_storage(request)?;

    match storage.delete_lesson(lesson_id).await {
        Ok(true) => {
            info!("Lesson {} deleted by admin {}", lesson_id, current.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Lesson deleted")))
        }
        Ok(false) => Ok(lesson_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
