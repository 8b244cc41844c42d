use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 一段已合并的可用时段（UTC，整点对齐，左闭右开）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/slot.ts")]
pub struct TutorSlot {
    pub id: i64,
    pub tutor_id: i64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TutorSlot {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_at, self.end_at)
    }
}

/// 左闭右开的时间区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/slot.ts")]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// 与另一区间的交集，无交集时返回 None
    pub fn intersect(&self, other: &TimeRange) -> Option<TimeRange> {
        let clipped = TimeRange::new(self.start.max(other.start), self.end.min(other.end));
        (!clipped.is_empty()).then_some(clipped)
    }

    pub fn duration_hours(&self) -> i64 {
        (self.end - self.start).num_hours()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap()
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = TimeRange::new(at(9), at(11));
        let b = TimeRange::new(at(11), at(12));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&TimeRange::new(at(10), at(12))));
    }

    #[test]
    fn test_intersect_and_contains() {
        let a = TimeRange::new(at(9), at(13));
        let b = TimeRange::new(at(12), at(15));
        assert_eq!(a.intersect(&b), Some(TimeRange::new(at(12), at(13))));
        assert!(a.contains(&TimeRange::new(at(10), at(11))));
        assert!(!a.contains(&b));
        assert_eq!(a.duration_hours(), 4);
    }
}
