use super::entities::TimeRange;
use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

/// 某一本地日期的可用小时
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/slot.ts")]
pub struct AvailabilityDay {
    pub date: NaiveDate,
    pub hours: Vec<u32>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/slot.ts")]
pub struct AvailabilityResponse {
    pub tutor_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub tz_offset: i32,
    // 裁剪到查询窗口内的 UTC 区间
    pub ranges: Vec<TimeRange>,
    pub days: Vec<AvailabilityDay>,
}

/// 写入操作的结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/slot.ts")]
pub struct SlotChangeResponse {
    pub tutor_id: i64,
    pub added_hours: i64,
    pub removed_hours: i64,
    pub availability: AvailabilityResponse,
}

/// 存储层编辑结果：实际新增与移除的小时数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotEditOutcome {
    pub added_hours: i64,
    pub removed_hours: i64,
}
