use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RevenueService, scoped_tutor, summary::summarize};
use crate::models::{
    ApiResponse, ErrorCode,
    revenue::{
        requests::{RevenueSummaryParams, TransactionListQuery},
        responses::RevenueSummaryResponse,
    },
};
use crate::services::{current_user, storage_error_response};

pub async fn revenue_summary(
    service: &RevenueService,
    params: RevenueSummaryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let (Some(from), Some(to)) = (params.from, params.to)
        && to < from
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "`to` must not be earlier than `from`",
        )));
    }

    let tutor_id = scoped_tutor(&current, params.tutor_id);
    let storage = service.get_storage(request)?;

    let query = TransactionListQuery {
        tutor_id,
        from: params.from,
        to: params.to,
        ..Default::default()
    };

    let currencies = match storage
        .list_transactions(query)
        .await
        .and_then(|transactions| summarize(&transactions))
    {
        Ok(currencies) => currencies,
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RevenueSummaryResponse {
            tutor_id,
            from: params.from,
            to: params.to,
            currencies,
        },
        "Revenue summary retrieved successfully",
    )))
}
