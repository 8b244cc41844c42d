use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::RevenueService;
use crate::models::{
    ApiResponse, ErrorCode,
    revenue::{
        entities::{MAX_AMOUNT_CENTS, TransactionStatus},
        requests::{CreateTransactionRequest, NewTransaction},
    },
    users::entities::UserRole,
};
use crate::services::{current_user, forbidden, require_role_user, storage_error_response};
use crate::utils::validate::validate_currency;

fn invalid(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::TransactionInvalid, msg))
}

pub async fn record_transaction(
    service: &RevenueService,
    req: CreateTransactionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let tutor_id = if current.is_admin() {
        match req.tutor_id {
            Some(id) => id,
            None => return Ok(invalid("tutor_id is required")),
        }
    } else {
        if req.tutor_id.is_some_and(|id| id != current.id) {
            return Ok(forbidden("Tutors can only record their own transactions"));
        }
        current.id
    };

    if !req.kind.accepts_amount(req.amount_cents) {
        return Ok(invalid(format!(
            "Amount must be positive (adjustments non-zero) and at most {MAX_AMOUNT_CENTS} cents"
        )));
    }

    let currency = req
        .currency
        .map(|c| c.trim().to_ascii_uppercase())
        .unwrap_or_else(|| service.get_config().revenue.default_currency.clone());
    if let Err(msg) = validate_currency(&currency) {
        return Ok(invalid(msg));
    }

    let status = req.status.unwrap_or(TransactionStatus::Pending);
    if status == TransactionStatus::Void {
        return Ok(invalid("A transaction cannot be recorded as void"));
    }

    let storage = service.get_storage(request)?;

    if let Err(response) = require_role_user(&storage, tutor_id, UserRole::Tutor).await {
        return Ok(response);
    }
    if let Some(student_id) = req.student_id
        && let Err(response) = require_role_user(&storage, student_id, UserRole::Student).await
    {
        return Ok(response);
    }
    if let Some(lesson_id) = req.lesson_id {
        match storage.get_lesson_by_id(lesson_id).await {
            Ok(Some(lesson)) if lesson.tutor_id == tutor_id => {}
            Ok(Some(_)) => return Ok(invalid("Lesson belongs to another tutor")),
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::LessonNotFound,
                    "Lesson not found",
                )));
            }
            Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
        }
    }

    let new_tx = NewTransaction {
        tutor_id,
        student_id: req.student_id,
        lesson_id: req.lesson_id,
        kind: req.kind,
        amount_cents: req.amount_cents,
        currency,
        status,
        occurred_at: req.occurred_at.unwrap_or_else(chrono::Utc::now),
        note: req.note,
        created_by: current.id,
    };

    match storage.create_transaction(new_tx).await {
        Ok(tx) => {
            info!(
                "Transaction {} recorded: {} {} {}",
                tx.reference, tx.kind, tx.amount_cents, tx.currency
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(tx, "Transaction recorded")))
        }
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
