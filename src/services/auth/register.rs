use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserRole,
        requests::{CreateUserRequest, RegisterRequest},
        responses::UserResponse,
    },
};
use crate::services::users::{check_new_account, user_write_error};
use crate::utils::password::hash_password;

use super::AuthService;

/// 公开注册，只能注册学生账号
///
/// 用户名或邮箱已被占用时由存储层唯一约束返回 409
pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();

    if let Err(response) = check_new_account(
        &username,
        &email,
        &register_request.password,
        register_request.utc_offset_minutes,
    ) {
        return Ok(response);
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    let storage = service.get_storage(request)?;
    let create_request = CreateUserRequest {
        username,
        email,
        password: password_hash,
        role: UserRole::Student,
        display_name: register_request.display_name,
        avatar_url: None,
        utc_offset_minutes: register_request.utc_offset_minutes,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            info!("Student {} registered", user.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "注册成功")))
        }
        Err(e) => Ok(user_write_error(e, ErrorCode::RegisterFailed)),
    }
}
