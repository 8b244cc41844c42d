//! 数据模型定义
//!
//! 每个业务模块拆分为 `entities`（业务实体）、`requests`（请求体/查询参数）、
//! `responses`（响应体）三部分。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod courses;
pub mod lessons;
pub mod revenue;
pub mod slots;
pub mod songs;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 业务错误码
///
/// - 0：成功
/// - 1xxx：通用错误
/// - 2xxx：认证与用户
/// - 3xxx：课程与曲谱
/// - 4xxx：课时与日历
/// - 5xxx：作业与提交
/// - 6xxx：收入流水
/// - 7xxx：可用时段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserAlreadyExists = 2003,
    UserNameInvalid = 2004,
    UserEmailInvalid = 2005,
    UserPasswordInvalid = 2006,
    UserRoleMismatch = 2007,
    CanNotDeleteCurrentUser = 2008,
    InvalidUtcOffset = 2009,

    CourseNotFound = 3000,
    CourseInvalid = 3001,
    SongNotFound = 3100,
    SongInvalid = 3101,

    LessonNotFound = 4000,
    LessonInvalidTime = 4001,
    LessonOverlap = 4002,
    LessonNotScheduled = 4003,
    LessonOutsideAvailability = 4004,
    LessonCancelWindowClosed = 4005,
    LessonNotStarted = 4006,
    CalendarRangeInvalid = 4100,

    AssignmentNotFound = 5000,
    AssignmentInvalid = 5001,
    SubmissionNotFound = 5100,
    SubmissionNotAllowed = 5101,
    SubmissionNotReviewable = 5102,
    GradeInvalid = 5103,

    TransactionNotFound = 6000,
    TransactionInvalid = 6001,
    TransactionStatusTransition = 6002,

    SlotRangeInvalid = 7000,
    SlotHourInvalid = 7001,
}
