//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间统一以 unix 秒存储，金额以最小货币单位（分）存储。

pub mod prelude;

pub mod assignments;
pub mod courses;
pub mod lessons;
pub mod revenue_transactions;
pub mod songs;
pub mod submissions;
pub mod tutor_slots;
pub mod users;

use chrono::{DateTime, Utc};

/// unix 秒转为 UTC 时间，越界时取默认值
pub(crate) fn ts_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
