use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{ApiResponse, ErrorCode, courses::requests::CreateCourseRequest};
use crate::models::revenue::entities::is_valid_price;
use crate::models::users::entities::UserRole;
use crate::services::{current_user, forbidden, require_role_user};

pub async fn create_course(
    service: &CourseService,
    mut req: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if req.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseInvalid,
            "Course title is required",
        )));
    }
    if !is_valid_price(req.price_cents) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseInvalid,
            "Price must be between 0 and 10^12 cents",
        )));
    }

    // 教师只能为自己创建课程，管理员需要指定教师
    let tutor_id = if current.is_admin() {
        match req.tutor_id {
            Some(id) => id,
            None => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::CourseInvalid,
                    "tutor_id is required",
                )));
            }
        }
    } else {
        if req.tutor_id.is_some_and(|id| id != current.id) {
            return Ok(forbidden("Tutors can only create their own courses"));
        }
        current.id
    };
    req.tutor_id = Some(tutor_id);

    let storage = service.get_storage(request)?;

    if let Err(response) = require_role_user(&storage, tutor_id, UserRole::Tutor).await {
        return Ok(response);
    }

    match storage.create_course(tutor_id, req).await {
        Ok(course) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Course creation failed: {e}"),
            )),
        ),
    }
}
