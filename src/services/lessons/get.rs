use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LessonService, load_visible_lesson};
use crate::models::ApiResponse;
use crate::services::current_user;

pub async fn get_lesson(
    service: &LessonService,
    lesson_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match load_visible_lesson(&storage, lesson_id, &current).await {
        Ok(lesson) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            lesson,
            "Lesson retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
