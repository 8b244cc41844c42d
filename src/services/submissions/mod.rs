pub mod history;
pub mod review;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{CreateSubmissionRequest, ReviewSubmissionRequest};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 学生提交作业
    pub async fn submit(
        &self,
        assignment_id: i64,
        req: CreateSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit(self, assignment_id, req, request).await
    }

    // 提交历史
    pub async fn history(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        history::list_history(self, assignment_id, request).await
    }

    // 批改
    pub async fn review(
        &self,
        submission_id: i64,
        req: ReviewSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_submission(self, submission_id, req, request).await
    }
}
