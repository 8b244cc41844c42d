pub mod assignments;
pub mod auth;
pub mod courses;
pub mod lessons;
pub mod revenue;
pub mod slots;
pub mod songs;
pub mod submissions;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use lessons::LessonService;
pub use revenue::RevenueService;
pub use slots::SlotService;
pub use songs::SongService;
pub use submissions::SubmissionService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::error;

use crate::cache::{ObjectCache, user_cache_key};
use crate::errors::TutorHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    users::entities::{User, UserRole, UserStatus},
};
use crate::storage::Storage;

/// 从 app data 中取出存储句柄
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            actix_web::error::ErrorInternalServerError("Storage not configured")
        })
}

/// 当前登录用户，未登录时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 删除用户缓存，角色、状态或资料变更后调用
pub(crate) async fn evict_cached_user(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&user_cache_key(user_id)).await;
    }
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

/// 读取用户并要求其为指定角色的活跃用户
pub(crate) async fn require_role_user(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    role: UserRole,
) -> Result<User, HttpResponse> {
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.role == role && user.status == UserStatus::Active => Ok(user),
        Ok(Some(_)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserRoleMismatch,
            format!("User {user_id} is not an active {role}"),
        ))),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            format!("User {user_id} not found"),
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get user: {e}"),
            )),
        ),
    }
}

/// 存储层错误映射为 HTTP 响应
///
/// `fallback` 用于数据库等内部错误
pub(crate) fn storage_error_response(err: TutorHubError, fallback: ErrorCode) -> HttpResponse {
    match err {
        TutorHubError::Validation(msg) => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
        }
        TutorHubError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg))
        }
        TutorHubError::Conflict(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::Conflict, msg))
        }
        TutorHubError::Scheduling(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::LessonOverlap, msg))
        }
        other => {
            error!("{}", other);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(fallback, other.message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_storage_errors_map_to_status() {
        let cases = [
            (TutorHubError::validation("bad"), StatusCode::BAD_REQUEST),
            (TutorHubError::not_found("gone"), StatusCode::NOT_FOUND),
            (TutorHubError::conflict("busy"), StatusCode::CONFLICT),
            (TutorHubError::scheduling("overlap"), StatusCode::CONFLICT),
            (
                TutorHubError::database_operation("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let resp = storage_error_response(err, ErrorCode::InternalServerError);
            assert_eq!(resp.status(), status);
        }
    }
}
