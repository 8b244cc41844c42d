use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub tutor_id: i64,
    pub title: String,
    pub description: Option<String>,
    // 乐器，如 guitar / piano
    pub instrument: Option<String>,
    // 单节课价格（最小货币单位）
    pub price_cents: i64,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
