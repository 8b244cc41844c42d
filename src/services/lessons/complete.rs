use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::{LessonService, lesson_not_found, lesson_not_scheduled, load_visible_lesson};
use crate::models::{
    ApiResponse, ErrorCode,
    lessons::entities::{Lesson, LessonStatus},
    revenue::{
        entities::{TransactionKind, TransactionStatus},
        requests::NewTransaction,
    },
};
use crate::services::{current_user, forbidden, storage_error_response};

/// 有价格的课时完成后生成一笔待支付的学费流水
pub(crate) fn lesson_payment(
    lesson: &Lesson,
    currency: &str,
    created_by: i64,
) -> Option<NewTransaction> {
    (lesson.price_cents > 0).then(|| NewTransaction {
        tutor_id: lesson.tutor_id,
        student_id: Some(lesson.student_id),
        lesson_id: Some(lesson.id),
        kind: TransactionKind::LessonPayment,
        amount_cents: lesson.price_cents,
        currency: currency.to_string(),
        status: TransactionStatus::Pending,
        occurred_at: lesson.end_at,
        note: Some(format!("Lesson: {}", lesson.title)),
        created_by,
    })
}

pub async fn complete_lesson(
    service: &LessonService,
    lesson_id: i64,
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
        return Ok(forbidden("Only the lesson's tutor can complete it"));
    }
    if lesson.status != LessonStatus::Scheduled {
        return Ok(lesson_not_scheduled());
    }
    if Utc::now() < lesson.start_at {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::LessonNotStarted,
            "Lesson has not started yet",
        )));
    }

    let currency = &service.get_config().revenue.default_currency;
    let payment = lesson_payment(&lesson, currency, current.id);

    match storage.complete_lesson(lesson_id, payment).await {
        Ok(true) => {}
        Ok(false) => return Ok(lesson_not_scheduled()),
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }

    info!("Lesson {} completed by user {}", lesson_id, current.id);

    match storage.get_lesson_by_id(lesson_id).await {
        Ok(Some(lesson)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            lesson,
            "Lesson completed",
        ))),
        Ok(None) => Ok(lesson_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::lessons::test_support::lesson;
    use chrono::TimeDelta;

    #[test]
    fn test_payment_only_for_priced_lessons() {
        let now = Utc::now();
        let mut l = lesson(7, now, now + TimeDelta::hours(1));
        assert!(lesson_payment(&l, "USD", 2).is_none());

        l.price_cents = 4500;
        let payment = lesson_payment(&l, "EUR", 2).unwrap();
        assert_eq!(payment.amount_cents, 4500);
        assert_eq!(payment.currency, "EUR");
        assert_eq!(payment.lesson_id, Some(7));
        assert_eq!(payment.student_id, Some(3));
        assert_eq!(payment.status, TransactionStatus::Pending);
        assert_eq!(payment.kind, TransactionKind::LessonPayment);
    }
}
