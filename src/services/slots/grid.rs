//! 小时网格运算
//!
//! 可用时段在库中以合并后的 UTC 区间保存，编辑时拆成整点小时集合，
//! 修改后再合并写回。所有区间均为左闭右开。

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};

use crate::models::slots::{entities::TimeRange, responses::AvailabilityDay};

pub const HOUR_SECS: i64 = 3600;

/// 是否落在 UTC 整点
pub fn is_hour_aligned(t: DateTime<Utc>) -> bool {
    t.timestamp().rem_euclid(HOUR_SECS) == 0 && t.timestamp_subsec_nanos() == 0
}

/// 将整点集合合并为最大连续区间，结果按开始时间排序
pub fn merge_hours<I>(hours: I) -> Vec<TimeRange>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let sorted: BTreeSet<DateTime<Utc>> = hours.into_iter().collect();
    let mut ranges: Vec<TimeRange> = Vec::new();

    for hour in sorted {
        let end = hour + TimeDelta::hours(1);
        match ranges.last_mut() {
            Some(last) if last.end == hour => last.end = end,
            _ => ranges.push(TimeRange::new(hour, end)),
        }
    }

    ranges
}

/// 将区间拆成整点小时
///
/// 区间边界不在整点时按所覆盖的完整小时计算
pub fn split_ranges(ranges: &[TimeRange]) -> Vec<DateTime<Utc>> {
    let mut hours = BTreeSet::new();

    for range in ranges {
        let mut cursor = ceil_hour(range.start);
        while cursor + TimeDelta::hours(1) <= range.end {
            hours.insert(cursor);
            cursor += TimeDelta::hours(1);
        }
    }

    hours.into_iter().collect()
}

fn ceil_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    let ts = t.timestamp();
    let rem = ts.rem_euclid(HOUR_SECS);
    if rem == 0 && t.timestamp_subsec_nanos() == 0 {
        t
    } else {
        DateTime::<Utc>::from_timestamp(ts - rem + HOUR_SECS, 0).unwrap_or(t)
    }
}

/// 本地日期与小时转换为 UTC 时间
pub fn local_to_utc(date: NaiveDate, hour: u32, offset_minutes: i32) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    let local = date.and_time(time);
    local
        .checked_sub_signed(TimeDelta::minutes(offset_minutes as i64))
        .map(|naive| naive.and_utc())
}

/// 本地日期区间（含两端）对应的 UTC 窗口
///
/// `to` 早于 `from` 或日期越界时返回 None
pub fn local_window(from: NaiveDate, to: NaiveDate, offset_minutes: i32) -> Option<TimeRange> {
    if to < from {
        return None;
    }
    let end_date = to.checked_add_days(Days::new(1))?;
    let start = local_to_utc(from, 0, offset_minutes)?;
    let end = local_to_utc(end_date, 0, offset_minutes)?;
    Some(TimeRange::new(start, end))
}

/// 区间裁剪到窗口内
pub fn clip(ranges: &[TimeRange], window: &TimeRange) -> Vec<TimeRange> {
    ranges.iter().filter_map(|r| r.intersect(window)).collect()
}

/// 从可用区间中扣除占用区间
pub fn subtract(ranges: &[TimeRange], busy: &[TimeRange]) -> Vec<TimeRange> {
    let mut busy: Vec<TimeRange> = busy.iter().filter(|b| !b.is_empty()).copied().collect();
    busy.sort();

    let mut result = Vec::new();
    for range in ranges {
        let mut cursor = range.start;
        for b in busy.iter().filter(|b| b.overlaps(range)) {
            if b.start > cursor {
                result.push(TimeRange::new(cursor, b.start));
            }
            cursor = cursor.max(b.end);
            if cursor >= range.end {
                break;
            }
        }
        if cursor < range.end {
            result.push(TimeRange::new(cursor, range.end));
        }
    }

    result
}

/// 将区间按本地日期分组为本地小时列表
///
/// 只输出 `from..=to` 内的日期，没有可用小时的日期也会出现（`hours` 为空）
pub fn local_days(
    ranges: &[TimeRange],
    from: NaiveDate,
    to: NaiveDate,
    offset_minutes: i32,
) -> Vec<AvailabilityDay> {
    let mut days: BTreeMap<NaiveDate, Vec<u32>> = from
        .iter_days()
        .take_while(|d| *d <= to)
        .map(|d| (d, Vec::new()))
        .collect();

    let offset = TimeDelta::minutes(offset_minutes as i64);
    for hour in split_ranges(ranges) {
        let local = hour.naive_utc() + offset;
        if let Some(list) = days.get_mut(&local.date()) {
            list.push(local.hour());
        }
    }

    days.into_iter()
        .map(|(date, hours)| AvailabilityDay { date, hours })
        .collect()
}

/// 本地小时必须在 0-23 之间
pub fn validate_local_hours(hours: &[u32]) -> bool {
    hours.iter().all(|h| *h < 24)
}

/// 只有整小时的偏移才能映射到 UTC 整点网格
pub fn is_grid_offset(offset_minutes: i32) -> bool {
    offset_minutes % 60 == 0
}

/// 一次编辑后的小时集合：移除各清空窗口内的小时，再加入新的小时
///
/// 返回（新集合，新增数，移除数）
pub fn apply_edit(
    existing: &[DateTime<Utc>],
    clear: &[TimeRange],
    add_hours: &[DateTime<Utc>],
) -> (BTreeSet<DateTime<Utc>>, i64, i64) {
    let before: BTreeSet<DateTime<Utc>> = existing.iter().copied().collect();

    let mut after: BTreeSet<DateTime<Utc>> = before
        .iter()
        .filter(|h| !clear.iter().any(|w| w.start <= **h && **h < w.end))
        .copied()
        .collect();
    after.extend(add_hours.iter().copied());

    let added = after.difference(&before).count() as i64;
    let removed = before.difference(&after).count() as i64;
    (after, added, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_merge_collapses_contiguous_hours() {
        let ranges = merge_hours(vec![at(2, 11), at(2, 9), at(2, 10), at(2, 14), at(2, 9)]);
        assert_eq!(
            ranges,
            vec![
                TimeRange::new(at(2, 9), at(2, 12)),
                TimeRange::new(at(2, 14), at(2, 15)),
            ]
        );
    }

    #[test]
    fn test_merge_crosses_midnight() {
        let ranges = merge_hours(vec![at(2, 23), at(3, 0)]);
        assert_eq!(ranges, vec![TimeRange::new(at(2, 23), at(3, 1))]);
    }

    #[test]
    fn test_split_then_merge_restores_ranges() {
        let ranges = vec![
            TimeRange::new(at(2, 8), at(2, 10)),
            TimeRange::new(at(2, 12), at(2, 13)),
        ];
        let hours = split_ranges(&ranges);
        assert_eq!(hours, vec![at(2, 8), at(2, 9), at(2, 12)]);
        assert_eq!(merge_hours(hours), ranges);
    }

    #[test]
    fn test_split_ignores_partial_hours() {
        let start = at(2, 8) + TimeDelta::minutes(30);
        let hours = split_ranges(&[TimeRange::new(start, at(2, 10))]);
        assert_eq!(hours, vec![at(2, 9)]);
    }

    #[test]
    fn test_local_window_with_offsets() {
        // UTC+8：本地 3 月 2 日整天对应 UTC 3 月 1 日 16:00 至 3 月 2 日 16:00
        let w = local_window(date(2), date(2), 480).unwrap();
        assert_eq!(w, TimeRange::new(at(1, 16), at(2, 16)));

        // UTC-5：两天
        let w = local_window(date(2), date(3), -300).unwrap();
        assert_eq!(w, TimeRange::new(at(2, 5), at(4, 5)));

        assert!(local_window(date(3), date(2), 0).is_none());
    }

    #[test]
    fn test_subtract_busy_intervals() {
        let ranges = vec![TimeRange::new(at(2, 9), at(2, 17))];
        let busy = vec![
            TimeRange::new(at(2, 10), at(2, 11)),
            TimeRange::new(at(2, 8), at(2, 9) + TimeDelta::minutes(30)),
            TimeRange::new(at(2, 16), at(2, 18)),
        ];
        assert_eq!(
            subtract(&ranges, &busy),
            vec![
                TimeRange::new(at(2, 9) + TimeDelta::minutes(30), at(2, 10)),
                TimeRange::new(at(2, 11), at(2, 16)),
            ]
        );
    }

    #[test]
    fn test_subtract_fully_covered() {
        let ranges = vec![TimeRange::new(at(2, 9), at(2, 10))];
        let busy = vec![TimeRange::new(at(2, 8), at(2, 12))];
        assert!(subtract(&ranges, &busy).is_empty());
    }

    #[test]
    fn test_local_days_groups_by_local_date() {
        // UTC 15:00-18:00 在 UTC+8 下跨越本地午夜
        let ranges = vec![TimeRange::new(at(2, 15), at(2, 18))];
        let days = local_days(&ranges, date(2), date(3), 480);
        assert_eq!(
            days,
            vec![
                AvailabilityDay { date: date(2), hours: vec![23] },
                AvailabilityDay { date: date(3), hours: vec![0, 1] },
            ]
        );
    }

    #[test]
    fn test_apply_edit_replaces_only_window() {
        // 现有 9-12 点，窗口为 10-11 点，加入 14 点
        let existing = split_ranges(&[TimeRange::new(at(2, 9), at(2, 12))]);
        let window = TimeRange::new(at(2, 10), at(2, 11));
        let (after, added, removed) = apply_edit(&existing, &[window], &[at(2, 14)]);

        assert_eq!(
            merge_hours(after),
            vec![
                TimeRange::new(at(2, 9), at(2, 10)),
                TimeRange::new(at(2, 11), at(2, 12)),
                TimeRange::new(at(2, 14), at(2, 15)),
            ]
        );
        assert_eq!((added, removed), (1, 1));
    }

    #[test]
    fn test_apply_edit_multiple_windows() {
        let existing = split_ranges(&[TimeRange::new(at(2, 8), at(4, 8))]);
        let clear = [
            TimeRange::new(at(2, 0), at(3, 0)),
            TimeRange::new(at(4, 0), at(5, 0)),
        ];
        let (after, added, removed) = apply_edit(&existing, &clear, &[at(2, 9)]);
        assert_eq!(
            merge_hours(after),
            vec![
                TimeRange::new(at(2, 9), at(2, 10)),
                TimeRange::new(at(3, 0), at(4, 0)),
            ]
        );
        assert_eq!(added, 0);
        assert_eq!(removed, 16 + 8 - 1);
    }

    #[test]
    fn test_grid_offset_and_hours() {
        assert!(is_grid_offset(-300));
        assert!(!is_grid_offset(330));
        assert!(validate_local_hours(&[0, 23]));
        assert!(!validate_local_hours(&[24]));
        assert!(is_hour_aligned(at(2, 3)));
        assert!(!is_hour_aligned(at(2, 3) + TimeDelta::minutes(1)));
    }
}
