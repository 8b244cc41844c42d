use super::entities::TimeRange;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 查询可用时段
///
/// `from`/`to` 为本地日期（含两端），`tz_offset` 缺省时使用当前用户的偏移
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/slot.ts")]
pub struct AvailabilityParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub tz_offset: Option<i32>,
}

/// 保存某一本地日期的小时网格
///
/// `hours` 为本地小时（0-23），提交后该日原有的小时全部被替换
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/slot.ts")]
pub struct SaveDayGridRequest {
    pub date: NaiveDate,
    pub tz_offset: Option<i32>,
    #[serde(default)]
    pub hours: Vec<u32>,
}

/// 按周重复添加时段
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/slot.ts")]
pub struct RecurrenceRequest {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub tz_offset: Option<i32>,
    pub hours: Vec<u32>,
    // ISO 星期：1 = 周一 … 7 = 周日，空表示每天
    #[serde(default)]
    pub weekdays: Vec<u32>,
    // 为 true 时先清空区间内原有时段
    #[serde(default)]
    pub replace: bool,
}

/// 清空本地日期区间内的时段
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/slot.ts")]
pub struct ClearRangeRequest {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub tz_offset: Option<i32>,
}

/// 一次时段编辑（用于存储层）
///
/// 先移除 `clear` 各窗口内的全部小时，再加入 `add_hours`，结果重新合并后写回
#[derive(Debug, Clone, Default)]
pub struct SlotEdit {
    pub clear: Vec<TimeRange>,
    pub add_hours: Vec<DateTime<Utc>>,
}
