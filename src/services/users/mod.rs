pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::errors::TutorHubError;
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::{
    validate_email, validate_password, validate_username, validate_utc_offset,
};

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 获取用户列表（教师只能看到学生）
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}

/// 新账号字段校验，注册与管理员建号共用
pub(crate) fn check_new_account(
    username: &str,
    email: &str,
    password: &str,
    utc_offset_minutes: i32,
) -> Result<(), HttpResponse> {
    let checks: [(Result<(), String>, ErrorCode); 4] = [
        (
            validate_username(username).map_err(String::from),
            ErrorCode::UserNameInvalid,
        ),
        (
            validate_email(email).map_err(String::from),
            ErrorCode::UserEmailInvalid,
        ),
        (validate_password(password), ErrorCode::UserPasswordInvalid),
        (
            validate_utc_offset(utc_offset_minutes).map_err(String::from),
            ErrorCode::InvalidUtcOffset,
        ),
    ];
    for (result, code) in checks {
        if let Err(msg) = result {
            return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
        }
    }
    Ok(())
}

/// 用户写入失败：唯一约束冲突为 409，其余为 500
pub(crate) fn user_write_error(err: TutorHubError, fallback: ErrorCode) -> HttpResponse {
    match err {
        TutorHubError::Conflict(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::UserAlreadyExists, msg)),
        other => {
            error!("User write failed: {}", other);
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
    fn test_check_new_account() {
        assert!(check_new_account("bo_chen", "bo@academy.test", "S3cret-Pass", 480).is_ok());

        let resp = check_new_account("bo chen", "bo@academy.test", "S3cret-Pass", 0).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(check_new_account("bo_chen", "bo@academy.test", "S3cret-Pass", 9999).is_err());
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let resp = user_write_error(
            TutorHubError::conflict("taken"),
            ErrorCode::InternalServerError,
        );
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
