/*!
 * 角色校验中间件
 *
 * 必须包在 RequireJWT 之内（即先执行 RequireJWT），从请求扩展中读取当前用户。
 *
 * ```rust,ignore
 * web::scope("/api/v1/revenue")
 *     .wrap(RequireRole::new_any(UserRole::tutor_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

/// 允许访问的角色集合，命中任一即可
#[derive(Clone, Copy)]
pub struct RequireRole {
    allowed: &'static [&'static UserRole],
}

impl RequireRole {
    pub fn new_any(allowed: &'static [&'static UserRole]) -> Self {
        Self { allowed }
    }

    fn permits(&self, role: &UserRole) -> bool {
        self.allowed.iter().any(|r| *r == role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            guard: *self,
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    guard: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let guard = self.guard;

        Box::pin(async move {
            let caller = req
                .extensions()
                .get::<User>()
                .map(|u| (u.id, u.role.clone()));

            let Some((user_id, role)) = caller else {
                info!("Role check without an authenticated user, RequireJWT must run first");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if !guard.permits(&role) {
                info!(
                    "Access denied for user {} (role: {}), allowed: {:?}",
                    user_id, role, guard.allowed
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::Forbidden,
                        "Access denied.",
                    )
                    .map_into_right_body(),
                ));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutor_guard_admits_admins() {
        let guard = RequireRole::new_any(UserRole::tutor_roles());
        assert!(guard.permits(&UserRole::Tutor));
        assert!(guard.permits(&UserRole::Admin));
        assert!(!guard.permits(&UserRole::Student));
    }

    #[test]
    fn test_admin_guard() {
        let guard = RequireRole::new_any(UserRole::admin_roles());
        assert!(!guard.permits(&UserRole::Tutor));
    }
}
