//! 查询参数反序列化辅助
//!
//! `#[serde(flatten)]` 会把 query string 中的值缓存为字符串，
//! 数值与布尔字段需要从字符串解析。

use serde::{Deserialize, Deserializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrValue<T> {
    Value(T),
    Str(String),
}

/// 接受原生值或可解析的字符串，空字符串视为缺省
pub fn opt_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: std::fmt::Display,
{
    match Option::<StrOrValue<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StrOrValue::Value(v)) => Ok(Some(v)),
        Some(StrOrValue::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(StrOrValue::Str(s)) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(flatten)]
        #[allow(dead_code)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "opt_from_str")]
        tutor_id: Option<i64>,
        #[serde(default, deserialize_with = "opt_from_str")]
        active: Option<bool>,
    }

    #[test]
    fn test_strings_and_native_values() {
        let p: Params = serde_json::from_str(r#"{"tutor_id":"42","active":"true"}"#).unwrap();
        assert_eq!(p.tutor_id, Some(42));
        assert_eq!(p.active, Some(true));

        let p: Params = serde_json::from_str(r#"{"tutor_id":7}"#).unwrap();
        assert_eq!(p.tutor_id, Some(7));
        assert_eq!(p.active, None);
    }

    #[test]
    fn test_empty_and_invalid() {
        let p: Params = serde_json::from_str(r#"{"tutor_id":""}"#).unwrap();
        assert_eq!(p.tutor_id, None);
        assert!(serde_json::from_str::<Params>(r#"{"tutor_id":"abc"}"#).is_err());
    }
}
