//! 安全的路径参数提取器
//!
//! 路径中的 ID 必须是正整数，否则直接返回 400 和统一的错误体。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 读取并校验路径参数
fn parse_positive_id(req: &HttpRequest, param: &str, label: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(param)
        .ok_or_else(|| bad_request(format!("缺少路径参数: {label}")))?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_request(format!("无效的{label}: {raw}"))),
    }
}

macro_rules! define_safe_id_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param, $label).map($name))
            }
        }
    };
}

define_safe_id_extractor!(
    /// 通用 `{id}` 路径参数
    SafeIDI64,
    "id",
    "ID"
);

define_safe_id_extractor!(
    /// `{tutor_id}` 路径参数
    SafeTutorIdI64,
    "tutor_id",
    "教师 ID"
);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        let req = TestRequest::default()
            .param("id", "42")
            .to_http_request();
        assert_eq!(parse_positive_id(&req, "id", "ID").unwrap(), 42);
    }

    #[test]
    fn test_rejects_invalid_ids() {
        for raw in ["0", "-3", "abc", "9999999999999999999999"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(parse_positive_id(&req, "id", "ID").is_err(), "{raw}");
        }

        let req = TestRequest::default().to_http_request();
        assert!(parse_positive_id(&req, "tutor_id", "教师 ID").is_err());
    }
}
