/*!
 * 速率限制中间件
 *
 * 固定窗口计数：每个 `前缀:身份:窗口序号` 一个计数器，窗口切换后自然失效。
 * 已登录请求按用户计数，其余按客户端 IP 计数。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 单个窗口的最大长度（秒），计数器存活时间与之对应
const MAX_WINDOW_SECS: u64 = 300;

static COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS * 2))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    scope: &'static str,
}

impl RateLimit {
    pub fn new(scope: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            scope,
        }
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new("register", 3, 60)
    }

    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    /// 预约课时：20 次/分钟/用户
    pub fn booking() -> Self {
        Self::new("booking", 20, 60)
    }
}

/// 限流身份
#[derive(Debug, PartialEq, Eq)]
enum Caller {
    User(i64),
    Ip(String),
}

impl Caller {
    fn of(req: &ServiceRequest) -> Self {
        if let Some(id) = req.extensions().get::<User>().map(|u| u.id) {
            return Caller::User(id);
        }
        Caller::Ip(client_ip(req))
    }

    fn key(&self, scope: &str, window: u64) -> String {
        match self {
            Caller::User(id) => format!("{scope}:user:{id}:{window}"),
            Caller::Ip(ip) => format!("{scope}:ip:{ip}:{window}"),
        }
    }
}

/// 客户端 IP：连接信息优先，其次 X-Forwarded-For 第一跳，再次 X-Real-IP
///
/// 转发头可被伪造，直接暴露在公网时应由反向代理覆盖这些头
fn client_ip(req: &ServiceRequest) -> String {
    let from_conn = req
        .connection_info()
        .realip_remote_addr()
        .and_then(parse_ip);
    if let Some(ip) = from_conn {
        return ip;
    }

    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    header("X-Forwarded-For")
        .and_then(|v| v.split(',').next().and_then(parse_ip))
        .or_else(|| header("X-Real-IP").and_then(|v| parse_ip(&v)))
        .unwrap_or_else(|| "unknown".to_string())
}

fn parse_ip(raw: &str) -> Option<String> {
    raw.trim().parse::<IpAddr>().ok().map(|ip| ip.to_string())
}

/// 当前窗口序号与剩余秒数
fn window_position(now_secs: u64, window_secs: u64) -> (u64, u64) {
    let index = now_secs / window_secs;
    let reset_in = window_secs - now_secs % window_secs;
    (index, reset_in)
}

fn too_many_requests(retry_after: u64, limit: u32) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Limit", limit.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "请求过于频繁，请稍后再试",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let (window, reset_in) = window_position(now, limit.window_secs);
            let key = Caller::of(&req).key(limit.scope, window);

            // 原子自增
            let count = COUNTERS
                .entry(key.clone())
                .and_upsert_with(|current| {
                    let next = current.map(|e| e.into_value()).unwrap_or(0) + 1;
                    std::future::ready(next)
                })
                .await
                .into_value();

            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, limit.max_requests
                );
                return Ok(req.into_response(
                    too_many_requests(reset_in, limit.max_requests).map_into_right_body(),
                ));
            }

            let mut res = srv.call(req).await?;
            let remaining = limit.max_requests - count;
            let headers = res.headers_mut();
            for (name, value) in [
                ("x-ratelimit-limit", limit.max_requests),
                ("x-ratelimit-remaining", remaining),
            ] {
                if let Ok(value) = HeaderValue::from_str(&value.to_string()) {
                    headers.insert(HeaderName::from_static(name), value);
                }
            }
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(RateLimit::booking().scope, "booking");
    }

    #[test]
    fn test_window_bounds_are_clamped() {
        let limit = RateLimit::new("x", 0, 10_000);
        assert_eq!(limit.max_requests, 1);
        assert_eq!(limit.window_secs, MAX_WINDOW_SECS);
    }

    #[test]
    fn test_window_position() {
        assert_eq!(window_position(120, 60), (2, 60));
        assert_eq!(window_position(179, 60), (2, 1));
    }

    #[test]
    fn test_keys_separate_scope_and_caller() {
        let user = Caller::User(7).key("booking", 3);
        let ip = Caller::Ip("10.0.0.1".to_string()).key("booking", 3);
        assert_eq!(user, "booking:user:7:3");
        assert_ne!(user, ip);
        assert_eq!(parse_ip(" ::1 ").as_deref(), Some("::1"));
        assert_eq!(parse_ip("not-an-ip"), None);
    }
}
