use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::RevenueService;
use crate::models::{
    ApiResponse, ErrorCode, revenue::requests::UpdateTransactionStatusRequest,
};
use crate::services::{current_user, forbidden, storage_error_response};

/// 修改流水状态
///
/// 允许 pending → paid、pending → void、paid → void。
/// 更新以读到的当前状态为条件，并发修改时返回 409
pub async fn update_status(
    service: &RevenueService,
    transaction_id: i64,
    req: UpdateTransactionStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let tx = match storage.get_transaction_by_id(transaction_id).await {
        Ok(Some(tx)) => tx,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TransactionNotFound,
                "Transaction not found",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    if !current.is_admin() && tx.tutor_id != current.id {
        return Ok(forbidden("No permission to modify this transaction"));
    }

    if !tx.status.can_transition_to(req.status) {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::TransactionStatusTransition,
            format!("Cannot change status from {} to {}", tx.status, req.status),
        )));
    }

    match storage
        .update_transaction_status(transaction_id, tx.status, req.status, req.note)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::TransactionStatusTransition,
                "Transaction status was changed concurrently",
            )));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }

    info!(
        "Transaction {} status {} -> {} by user {}",
        tx.reference, tx.status, req.status, current.id
    );

    match storage.get_transaction_by_id(transaction_id).await {
        Ok(Some(updated)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            updated,
            "Transaction status updated",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TransactionNotFound,
            "Transaction not found",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
