use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{NaiveDate, TimeDelta};
use std::collections::BTreeMap;

use super::LessonService;
use crate::models::{
    ApiResponse, ErrorCode,
    lessons::{
        entities::Lesson,
        requests::{CalendarParams, LessonRangeQuery},
        responses::{CalendarDay, CalendarLesson, CalendarResponse},
    },
};
use crate::services::slots::grid::local_window;
use crate::services::{current_user, storage_error_response};
use crate::utils::validate::validate_utc_offset;

fn range_invalid(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::CalendarRangeInvalid,
        msg,
    ))
}

/// 按本地日期分组课时
///
/// 跨越午夜的课时出现在它覆盖的每一天；结束于午夜整点的课时不计入次日。
/// `from..=to` 内的每一天都会输出，没有课时的日期 `lessons` 为空
pub(crate) fn group_by_local_day(
    lessons: Vec<Lesson>,
    from: NaiveDate,
    to: NaiveDate,
    offset_minutes: i32,
) -> Vec<CalendarDay> {
    let mut days: BTreeMap<NaiveDate, Vec<CalendarLesson>> = from
        .iter_days()
        .take_while(|d| *d <= to)
        .map(|d| (d, Vec::new()))
        .collect();

    let offset = TimeDelta::minutes(offset_minutes as i64);
    for lesson in lessons {
        let local_start = lesson.start_at.naive_utc() + offset;
        let local_end = lesson.end_at.naive_utc() + offset;
        let last_day = (local_end - TimeDelta::seconds(1)).date().max(local_start.date());

        let entry = CalendarLesson {
            lesson,
            local_start,
            local_end,
        };
        // 只遍历与查询窗口相交的日期
        let first_day = local_start.date().max(from);
        let last_day = last_day.min(to);
        for day in first_day.iter_days().take_while(|d| *d <= last_day) {
            if let Some(list) = days.get_mut(&day) {
                list.push(entry.clone());
            }
        }
    }

    days.into_iter()
        .map(|(date, mut lessons)| {
            lessons.sort_by_key(|l| l.lesson.start_at);
            CalendarDay { date, lessons }
        })
        .collect()
}

pub async fn get_calendar(
    service: &LessonService,
    params: CalendarParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let offset = params.tz_offset.unwrap_or(current.utc_offset_minutes);
    if let Err(msg) = validate_utc_offset(offset) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidUtcOffset,
            msg,
        )));
    }

    if params.to < params.from {
        return Ok(range_invalid("`to` must not be earlier than `from`"));
    }
    let max_days = service.get_config().scheduling.max_calendar_days;
    if (params.to - params.from).num_days() + 1 > max_days {
        return Ok(range_invalid(format!(
            "Calendar range must not exceed {max_days} days"
        )));
    }
    let Some(window) = local_window(params.from, params.to, offset) else {
        return Ok(range_invalid("Calendar range out of bounds"));
    };

    let mut query = LessonRangeQuery::new(window.start, window.end);
    query.include_cancelled = params.include_cancelled;
    query.tutor_id = params.tutor_id;
    query.student_id = params.student_id;
    // 非管理员只能看到自己参与的课时
    if !current.is_admin() {
        query.participant_id = Some(current.id);
    }

    let storage = service.get_storage(request)?;
    let lessons = match storage.list_lessons_in_range(query).await {
        Ok(lessons) => lessons,
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    let response = CalendarResponse {
        from: params.from,
        to: params.to,
        tz_offset: offset,
        days: group_by_local_day(lessons, params.from, params.to, offset),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Calendar retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::lessons::test_support::lesson;
    use chrono::{TimeZone, Utc};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_empty_days_are_listed() {
        let days = group_by_local_day(Vec::new(), date(1), date(3), 0);
        assert_eq!(days.len(), 3);
        assert!(days.iter().all(|d| d.lessons.is_empty()));
    }

    #[test]
    fn test_offset_moves_lesson_to_previous_day() {
        // 03-02 02:00Z 在 UTC-5 为 03-01 21:00
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 2, 0, 0).unwrap();
        let l = lesson(1, start, start + TimeDelta::hours(1));

        let days = group_by_local_day(vec![l], date(1), date(2), -300);
        assert_eq!(days[0].lessons.len(), 1);
        assert!(days[1].lessons.is_empty());
        assert_eq!(
            days[0].lessons[0].local_start,
            date(1).and_hms_opt(21, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_lesson_across_midnight_on_both_days() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 23, 0, 0).unwrap();
        let crossing = lesson(1, start, start + TimeDelta::hours(2));
        let ends_at_midnight = lesson(2, start, start + TimeDelta::hours(1));

        let days = group_by_local_day(vec![crossing, ends_at_midnight], date(1), date(2), 0);
        assert_eq!(days[0].lessons.len(), 2);
        assert_eq!(days[1].lessons.len(), 1);
        assert_eq!(days[1].lessons[0].lesson.id, 1);
    }

    #[test]
    fn test_long_lesson_only_fills_requested_days() {
        let start = Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2200, 1, 1, 0, 0, 0).unwrap();
        let spanning = lesson(1, start, end);
        let before = lesson(2, start, start + TimeDelta::hours(1));

        let days = group_by_local_day(vec![spanning, before], date(1), date(3), 0);
        assert_eq!(days.len(), 3);
        assert!(
            days.iter()
                .all(|d| d.lessons.len() == 1 && d.lessons[0].lesson.id == 1)
        );
    }

    #[test]
    fn test_half_hour_offset() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap();
        let l = lesson(1, start, start + TimeDelta::hours(1));

        // UTC+5:30 本地 03-02 01:30
        let days = group_by_local_day(vec![l], date(1), date(2), 330);
        assert!(days[0].lessons.is_empty());
        assert_eq!(
            days[1].lessons[0].local_start,
            date(2).and_hms_opt(1, 30, 0).unwrap()
        );
    }
}
