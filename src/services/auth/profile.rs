use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, evict_cached_user};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_password, validate_utc_offset};

use super::AuthService;

/// 更新个人资料
///
/// 修改密码需要提供当前密码；角色与状态只能由管理员修改
pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    if let Some(offset) = update_data.utc_offset_minutes
        && let Err(msg) = validate_utc_offset(offset)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidUtcOffset, msg)));
    }

    // 处理密码（如果提供了新密码）
    let hashed_password = if let Some(ref new_password) = update_data.new_password {
        // 缓存中的用户不含密码哈希，需要从存储层重新读取
        let stored = match storage.get_user_by_id(current.id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "用户不存在",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询用户失败: {e}"),
                    )),
                );
            }
        };

        let current_password = update_data.current_password.as_deref().unwrap_or_default();
        if !verify_password(current_password, &stored.password_hash) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserPasswordInvalid,
                "当前密码不正确",
            )));
        }

        if let Err(msg) = validate_password(new_password) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
        }

        match hash_password(new_password) {
            Ok(hash) => Some(hash),
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("密码哈希失败: {e}"),
                    )),
                );
            }
        }
    } else {
        None
    };

    let storage_update = UpdateUserRequest {
        password: hashed_password,
        display_name: update_data.display_name,
        avatar_url: update_data.avatar_url,
        utc_offset_minutes: update_data.utc_offset_minutes,
        ..Default::default()
    };

    match storage.update_user(current.id, storage_update).await {
        Ok(Some(user)) => {
            evict_cached_user(request, user.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "用户信息更新成功",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "用户不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新用户信息失败: {e}"),
            )),
        ),
    }
}
