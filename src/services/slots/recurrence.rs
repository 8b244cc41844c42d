//! 按周重复的时段展开

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

use super::grid::{local_to_utc, local_window};
use crate::models::slots::entities::TimeRange;

/// ISO 星期编号（1 = 周一 … 7 = 周日）
pub fn weekday_from_iso(n: u32) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// 区间内（含两端）规则生效的本地日期，`weekdays` 为空时每天生效
fn selected_days<'a>(
    weekdays: &'a [Weekday],
    from: NaiveDate,
    to: NaiveDate,
) -> impl Iterator<Item = NaiveDate> + 'a {
    from.iter_days()
        .take_while(move |d| *d <= to)
        .filter(move |d| weekdays.is_empty() || weekdays.contains(&d.weekday()))
}

/// 替换模式下需要清空的 UTC 窗口，每个生效的本地日期一个
///
/// 未被星期规则选中的日期不清空
pub fn replaced_days(
    weekdays: &[Weekday],
    from: NaiveDate,
    to: NaiveDate,
    offset_minutes: i32,
) -> Vec<TimeRange> {
    selected_days(weekdays, from, to)
        .filter_map(|d| local_window(d, d, offset_minutes))
        .collect()
}

/// 在本地日期区间（含两端）内展开重复规则，返回 UTC 整点
///
/// `weekdays` 为空时每天生效；星期按本地日期判断
pub fn expand_recurrence(
    hours: &[u32],
    weekdays: &[Weekday],
    from: NaiveDate,
    to: NaiveDate,
    offset_minutes: i32,
) -> Vec<DateTime<Utc>> {
    let hours: BTreeSet<u32> = hours.iter().copied().filter(|h| *h < 24).collect();
    let mut result = BTreeSet::new();

    for date in selected_days(weekdays, from, to) {
        for hour in &hours {
            if let Some(utc) = local_to_utc(date, *hour, offset_minutes) {
                result.insert(utc);
            }
        }
    }

    result.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::slots::grid::{apply_edit, merge_hours, split_ranges};
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_weekday_filter() {
        // 2026-03-02 为周一
        let hours = expand_recurrence(&[9], &[Weekday::Mon, Weekday::Wed], date(2), date(8), 0);
        assert_eq!(
            hours,
            vec![
                Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_every_day_with_offset() {
        // UTC-5 本地 20 点为 UTC 次日 1 点
        let hours = expand_recurrence(&[20, 20], &[], date(2), date(3), -300);
        assert_eq!(
            hours,
            vec![
                Utc.with_ymd_and_hms(2026, 3, 3, 1, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 4, 1, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_empty_when_range_inverted() {
        assert!(expand_recurrence(&[9], &[], date(5), date(4), 0).is_empty());
    }

    #[test]
    fn test_iso_weekdays() {
        assert_eq!(weekday_from_iso(1), Some(Weekday::Mon));
        assert_eq!(weekday_from_iso(7), Some(Weekday::Sun));
        assert_eq!(weekday_from_iso(0), None);
    }

    #[test]
    fn test_replace_only_touches_selected_weekdays() {
        // 周一 9-11 点、周二 9-11 点已有时段；规则为每周一 14 点
        let existing = split_ranges(&[
            TimeRange::new(at(2, 9), at(2, 11)),
            TimeRange::new(at(3, 9), at(3, 11)),
        ]);
        let clear = replaced_days(&[Weekday::Mon], date(2), date(8), 0);
        assert_eq!(clear, vec![TimeRange::new(at(2, 0), at(3, 0))]);

        let add = expand_recurrence(&[14], &[Weekday::Mon], date(2), date(8), 0);
        let (after, added, removed) = apply_edit(&existing, &clear, &add);
        assert_eq!(
            merge_hours(after),
            vec![
                TimeRange::new(at(2, 14), at(2, 15)),
                TimeRange::new(at(3, 9), at(3, 11)),
            ]
        );
        assert_eq!((added, removed), (1, 2));
    }

    #[test]
    fn test_replace_without_hours_clears_selected_days() {
        let existing = split_ranges(&[
            TimeRange::new(at(2, 9), at(2, 11)),
            TimeRange::new(at(3, 9), at(3, 11)),
            TimeRange::new(at(9, 9), at(9, 10)),
        ]);
        let clear = replaced_days(&[Weekday::Mon], date(2), date(9), 0);
        assert_eq!(clear.len(), 2);

        let add = expand_recurrence(&[], &[Weekday::Mon], date(2), date(9), 0);
        assert!(add.is_empty());
        let (after, _, removed) = apply_edit(&existing, &clear, &add);
        assert_eq!(merge_hours(after), vec![TimeRange::new(at(3, 9), at(3, 11))]);
        assert_eq!(removed, 3);
    }

    #[test]
    fn test_replaced_days_follow_local_offset() {
        // UTC+8 的本地周一对应 UTC 周日 16 点起
        let clear = replaced_days(&[Weekday::Mon], date(2), date(2), 480);
        assert_eq!(clear, vec![TimeRange::new(at(1, 16), at(2, 16))]);
    }
}
