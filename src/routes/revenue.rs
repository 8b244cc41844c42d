use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::revenue::requests::{
    CreateTransactionRequest, RevenueSummaryParams, TransactionListParams,
    UpdateTransactionStatusRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::RevenueService;
use crate::utils::SafeIDI64;

static REVENUE_SERVICE: Lazy<RevenueService> = Lazy::new(RevenueService::new_lazy);

pub async fn list_transactions(
    req: HttpRequest,
    query: web::Query<TransactionListParams>,
) -> ActixResult<HttpResponse> {
    REVENUE_SERVICE
        .list_transactions(query.into_inner(), &req)
        .await
}

pub async fn record_transaction(
    req: HttpRequest,
    body: web::Json<CreateTransactionRequest>,
) -> ActixResult<HttpResponse> {
    REVENUE_SERVICE
        .record_transaction(body.into_inner(), &req)
        .await
}

pub async fn get_transaction(
    req: HttpRequest,
    transaction_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    REVENUE_SERVICE.get_transaction(transaction_id.0, &req).await
}

pub async fn update_status(
    req: HttpRequest,
    transaction_id: SafeIDI64,
    body: web::Json<UpdateTransactionStatusRequest>,
) -> ActixResult<HttpResponse> {
    REVENUE_SERVICE
        .update_status(transaction_id.0, body.into_inner(), &req)
        .await
}

pub async fn summary(
    req: HttpRequest,
    query: web::Query<RevenueSummaryParams>,
) -> ActixResult<HttpResponse> {
    REVENUE_SERVICE.summary(query.into_inner(), &req).await
}

// 配置路由：收入数据仅教师与管理员可见
pub fn configure_revenue_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/revenue")
            .wrap(middlewares::RequireRole::new_any(UserRole::tutor_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/transactions", web::get().to(list_transactions))
            .route("/transactions", web::post().to(record_transaction))
            .route("/transactions/{id}", web::get().to(get_transaction))
            .route("/transactions/{id}/status", web::put().to(update_status))
            .route("/summary", web::get().to(summary)),
    );
}
