pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        entities::Assignment,
        requests::{AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    users::entities::User,
};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 布置作业
    pub async fn create_assignment(
        &self,
        req: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, req, request).await
    }

    pub async fn list_assignments(
        &self,
        query: AssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, query, request).await
    }

    pub async fn get_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_assignment(self, assignment_id, request).await
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, assignment_id, update, request).await
    }

    pub async fn delete_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, assignment_id, request).await
    }
}

/// 学生本人、布置的教师或管理员可以查看
pub(crate) fn can_view(user: &User, assignment: &Assignment) -> bool {
    user.is_admin() || assignment.student_id == user.id || assignment.tutor_id == user.id
}

pub(crate) fn can_manage(user: &User, assignment: &Assignment) -> bool {
    user.is_admin() || (user.is_tutor() && assignment.tutor_id == user.id)
}

pub(crate) fn assignment_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AssignmentNotFound,
        "Assignment not found",
    ))
}

pub(crate) fn invalid_assignment(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg))
}

/// 满分必须为正数
pub(crate) fn valid_max_score(max_score: f64) -> bool {
    max_score.is_finite() && max_score > 0.0
}

/// 读取作业，不存在或无权查看时返回对应响应
pub(crate) async fn load_visible_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
    user: &User,
) -> Result<Assignment, HttpResponse> {
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) if can_view(user, &assignment) => Ok(assignment),
        Ok(Some(_)) => Err(crate::services::forbidden(
            "No permission to access this assignment",
        )),
        Ok(None) => Err(assignment_not_found()),
        Err(e) => Err(crate::services::storage_error_response(
            e,
            ErrorCode::InternalServerError,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_score_must_be_positive() {
        assert!(valid_max_score(100.0));
        assert!(valid_max_score(0.5));
        assert!(!valid_max_score(0.0));
        assert!(!valid_max_score(-10.0));
        assert!(!valid_max_score(f64::NAN));
        assert!(!valid_max_score(f64::INFINITY));
    }
}
