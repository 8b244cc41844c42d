use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LessonService, lesson_not_found, lesson_not_scheduled, load_visible_lesson};
use crate::models::{
    ApiResponse, ErrorCode,
    lessons::{entities::LessonStatus, requests::UpdateLessonRequest},
    revenue::entities::is_valid_price,
};
use crate::services::{current_user, forbidden, storage_error_response};

/// 修改课时信息或改期
///
/// 新时间段的冲突检测在存储层事务内完成
pub async fn update_lesson(
    service: &LessonService,
    lesson_id: i64,
    update: UpdateLessonRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let lesson = match load_visible_lesson(&storage, lesson_id, &current).await {
        Ok(lesson) => lesson,
        Err(response) => return Ok(response),
    };
    if !super::can_manage(&current, &lesson) {
        return Ok(forbidden("Only the lesson's tutor can modify it"));
    }
    if lesson.status != LessonStatus::Scheduled {
        return Ok(lesson_not_scheduled());
    }

    if update
        .title
        .as_ref()
        .is_some_and(|title| title.trim().is_empty())
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Lesson title must not be empty",
        )));
    }
    if update.price_cents.is_some_and(|p| !is_valid_price(p)) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Price must be between 0 and 10^12 cents",
        )));
    }
    let start = update.start_at.unwrap_or(lesson.start_at);
    let end = update.end_at.unwrap_or(lesson.end_at);
    if start >= end {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::LessonInvalidTime,
            "Lesson start must be earlier than its end",
        )));
    }

    match storage.update_lesson(lesson_id, update).await {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            updated,
            "Lesson updated",
        ))),
        Ok(None) => Ok(lesson_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
