use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::info;

use super::{LessonService, lesson_not_found, lesson_not_scheduled, load_visible_lesson};
use crate::models::{
    ApiResponse, ErrorCode,
    lessons::{entities::LessonStatus, requests::CancelLessonRequest},
};
use crate::services::{current_user, storage_error_response};

/// 学生需在开课前 `cutoff_hours` 小时之前取消
pub(crate) fn student_may_cancel(
    now: DateTime<Utc>,
    start_at: DateTime<Utc>,
    cutoff_hours: i64,
) -> bool {
    now + TimeDelta::hours(cutoff_hours) <= start_at
}

pub async fn cancel_lesson(
    service: &LessonService,
    lesson_id: i64,
    req: CancelLessonRequest,
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
    if lesson.status != LessonStatus::Scheduled {
        return Ok(lesson_not_scheduled());
    }

    let cutoff = service.get_config().scheduling.student_cancel_cutoff_hours;
    if current.is_student() && !student_may_cancel(Utc::now(), lesson.start_at, cutoff) {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::LessonCancelWindowClosed,
            format!("Lessons can only be cancelled at least {cutoff} hours in advance"),
        )));
    }

    let reason = req
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    match storage.cancel_lesson(lesson_id, current.id, reason).await {
        Ok(true) => {}
        Ok(false) => return Ok(lesson_not_scheduled()),
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }

    info!("Lesson {} cancelled by user {}", lesson_id, current.id);

    match storage.get_lesson_by_id(lesson_id).await {
        Ok(Some(lesson)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            lesson,
            "Lesson cancelled",
        ))),
        Ok(None) => Ok(lesson_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_student_cancel_cutoff() {
        let start = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();

        let early = start - TimeDelta::hours(30);
        assert!(student_may_cancel(early, start, 24));

        let exactly = start - TimeDelta::hours(24);
        assert!(student_may_cancel(exactly, start, 24));

        let late = start - TimeDelta::hours(23);
        assert!(!student_may_cancel(late, start, 24));

        assert!(student_may_cancel(start, start, 0));
    }
}
