use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RevenueService, scoped_tutor};
use crate::models::{
    ApiResponse, ErrorCode,
    revenue::requests::{TransactionListParams, TransactionListQuery},
};
use crate::services::{current_user, forbidden, storage_error_response};

pub async fn list_transactions(
    service: &RevenueService,
    query: TransactionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let list_query = TransactionListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        tutor_id: scoped_tutor(&current, query.tutor_id),
        student_id: query.student_id,
        status: query.status,
        kind: query.kind,
        from: query.from,
        to: query.to,
    };

    match storage.list_transactions_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Transaction list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_transaction(
    service: &RevenueService,
    transaction_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.get_transaction_by_id(transaction_id).await {
        Ok(Some(tx)) if current.is_admin() || tx.tutor_id == current.id => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(tx, "Transaction retrieved successfully"))),
        Ok(Some(_)) => Ok(forbidden("No permission to view this transaction")),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TransactionNotFound,
            "Transaction not found",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
