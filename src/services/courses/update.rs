use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, load_owned_course};
use crate::models::{ApiResponse, ErrorCode, courses::requests::UpdateCourseRequest};
use crate::models::revenue::entities::is_valid_price;
use crate::services::current_user;

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    update: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseInvalid,
            "Course title is required",
        )));
    }
    if update.price_cents.is_some_and(|p| !is_valid_price(p)) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseInvalid,
            "Price must be between 0 and 10^12 cents",
        )));
    }

    let storage = service.get_storage(request)?;
    if let Err(response) = load_owned_course(&storage, course_id, &current).await {
        return Ok(response);
    }

    match storage.update_course(course_id, update).await {
        Ok(Some(course)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Course update failed: {e}"),
            )),
        ),
    }
}
