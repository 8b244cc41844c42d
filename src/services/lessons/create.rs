use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::LessonService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    lessons::requests::{CreateLessonRequest, NewLesson},
    revenue::entities::is_valid_price,
    slots::entities::TimeRange,
    users::entities::UserRole,
};
use crate::services::{current_user, forbidden, require_role_user, storage_error_response};
use crate::storage::Storage;

fn invalid_time(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::LessonInvalidTime, msg))
}

fn bad_request(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
}

/// 课时是否完整落在教师的某段可用时段内
///
/// 已存储的时段是合并后的最大区间，因此只需找一段包含它的
pub async fn within_availability(
    storage: &dyn Storage,
    tutor_id: i64,
    lesson: TimeRange,
) -> Result<bool> {
    let slots = storage.list_tutor_slots(tutor_id, lesson).await?;
    Ok(slots.iter().any(|slot| slot.range().contains(&lesson)))
}

pub async fn create_lesson(
    service: &LessonService,
    req: CreateLessonRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if req.title.trim().is_empty() {
        return Ok(bad_request("Lesson title is required"));
    }
    if req.start_at >= req.end_at {
        return Ok(invalid_time("Lesson start must be earlier than its end"));
    }
    if req.price_cents.is_some_and(|p| !is_valid_price(p)) {
        return Ok(bad_request("Price must be between 0 and 10^12 cents"));
    }

    // 学生只能为自己预约，教师只能为自己排课
    let (tutor_id, student_id) = if current.is_student() {
        if req.student_id.is_some_and(|id| id != current.id) {
            return Ok(forbidden("Students can only book lessons for themselves"));
        }
        match req.tutor_id {
            Some(tutor_id) => (tutor_id, current.id),
            None => return Ok(bad_request("tutor_id is required")),
        }
    } else if current.is_tutor() {
        if req.tutor_id.is_some_and(|id| id != current.id) {
            return Ok(forbidden("Tutors can only schedule their own lessons"));
        }
        match req.student_id {
            Some(student_id) => (current.id, student_id),
            None => return Ok(bad_request("student_id is required")),
        }
    } else {
        match (req.tutor_id, req.student_id) {
            (Some(tutor_id), Some(student_id)) => (tutor_id, student_id),
            _ => return Ok(bad_request("tutor_id and student_id are required")),
        }
    };

    let now = chrono::Utc::now();
    if current.is_student() && req.start_at < now {
        return Ok(invalid_time("Cannot book a lesson in the past"));
    }

    let storage = service.get_storage(request)?;

    if let Err(response) = require_role_user(&storage, tutor_id, UserRole::Tutor).await {
        return Ok(response);
    }
    if let Err(response) = require_role_user(&storage, student_id, UserRole::Student).await {
        return Ok(response);
    }

    // 价格缺省取课程价格
    let mut price_cents = req.price_cents.unwrap_or(0);
    if let Some(course_id) = req.course_id {
        match storage.get_course_by_id(course_id).await {
            Ok(Some(course)) if course.tutor_id == tutor_id => {
                if req.price_cents.is_none() {
                    price_cents = course.price_cents;
                }
            }
            Ok(Some(_)) => return Ok(bad_request("Course belongs to another tutor")),
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::CourseNotFound,
                    "Course not found",
                )));
            }
            Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
        }
    }

    if current.is_student() {
        let range = TimeRange::new(req.start_at, req.end_at);
        match within_availability(storage.as_ref(), tutor_id, range).await {
            Ok(true) => {}
            Ok(false) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::LessonOutsideAvailability,
                    "Requested time is outside the tutor's availability",
                )));
            }
            Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
        }
    }

    let new_lesson = NewLesson {
        tutor_id,
        student_id,
        course_id: req.course_id,
        title: req.title.trim().to_string(),
        start_at: req.start_at,
        end_at: req.end_at,
        notes: req.notes,
        price_cents,
    };

    match storage.create_lesson(new_lesson).await {
        Ok(lesson) => {
            info!(
                "Lesson {} scheduled: tutor {} student {} at {}",
                lesson.id, lesson.tutor_id, lesson.student_id, lesson.start_at
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(lesson, "Lesson scheduled")))
        }
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
