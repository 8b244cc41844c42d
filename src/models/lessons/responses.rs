use super::entities::Lesson;
use crate::models::common::PaginationInfo;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct LessonListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<Lesson>,
}

/// 日历中的课时，附带本地时间
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct CalendarLesson {
    #[serde(flatten)]
    #[ts(flatten)]
    pub lesson: Lesson,
    pub local_start: NaiveDateTime,
    pub local_end: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub lessons: Vec<CalendarLesson>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct CalendarResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub tz_offset: i32,
    pub days: Vec<CalendarDay>,
}
