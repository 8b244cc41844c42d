pub mod list;
pub mod record;
pub mod report;
pub mod status;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::revenue::requests::{
    CreateTransactionRequest, RevenueSummaryParams, TransactionListParams,
    UpdateTransactionStatusRequest,
};
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct RevenueService {
    storage: Option<Arc<dyn Storage>>,
}

impl RevenueService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 记录流水
    pub async fn record_transaction(
        &self,
        req: CreateTransactionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_transaction(self, req, request).await
    }

    pub async fn list_transactions(
        &self,
        query: TransactionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_transactions(self, query, request).await
    }

    pub async fn get_transaction(
        &self,
        transaction_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::get_transaction(self, transaction_id, request).await
    }

    // 修改流水状态
    pub async fn update_status(
        &self,
        transaction_id: i64,
        req: UpdateTransactionStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::update_status(self, transaction_id, req, request).await
    }

    // 收入汇总
    pub async fn summary(
        &self,
        params: RevenueSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report::revenue_summary(self, params, request).await
    }
}

/// 教师只能查看自己的流水
pub(crate) fn scoped_tutor(user: &User, requested: Option<i64>) -> Option<i64> {
    if user.is_admin() { requested } else { Some(user.id) }
}
