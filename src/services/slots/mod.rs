//! 教师可用时段
//!
//! 可用时段是 UTC 整点小时的集合，库中保存为合并后的区间。
//! 客户端以本地日期与 UTC 偏移（分钟）表达查询与编辑。

pub mod availability;
pub mod edit;
pub mod grid;
pub mod recurrence;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode,
    slots::{
        entities::TimeRange,
        requests::{AvailabilityParams, ClearRangeRequest, RecurrenceRequest, SaveDayGridRequest},
        responses::AvailabilityResponse,
    },
    users::entities::User,
};
use crate::storage::Storage;
use crate::utils::validate::validate_utc_offset;

pub struct SlotService {
    storage: Option<Arc<dyn Storage>>,
}

impl SlotService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 查询可用时段
    pub async fn get_availability(
        &self,
        tutor_id: i64,
        params: AvailabilityParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        availability::get_availability(self, tutor_id, params, request).await
    }

    // 可预约时段：可用时段扣除已有课时
    pub async fn get_bookable(
        &self,
        tutor_id: i64,
        params: AvailabilityParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        availability::get_bookable(self, tutor_id, params, request).await
    }

    // 保存某一天的小时网格
    pub async fn save_day_grid(
        &self,
        tutor_id: i64,
        req: SaveDayGridRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        edit::save_day_grid(self, tutor_id, req, request).await
    }

    // 按周重复
    pub async fn apply_recurrence(
        &self,
        tutor_id: i64,
        req: RecurrenceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        edit::apply_recurrence(self, tutor_id, req, request).await
    }

    // 清空日期区间
    pub async fn clear_range(
        &self,
        tutor_id: i64,
        req: ClearRangeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        edit::clear_range(self, tutor_id, req, request).await
    }
}

fn bad_slot_request(code: ErrorCode, msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg))
}

/// 解析时段操作使用的偏移，缺省取用户设置
///
/// 只接受整小时偏移
pub(crate) fn resolve_grid_offset(tz_offset: Option<i32>, user: &User) -> std::result::Result<i32, HttpResponse> {
    let offset = tz_offset.unwrap_or(user.utc_offset_minutes);
    if let Err(msg) = validate_utc_offset(offset) {
        return Err(bad_slot_request(ErrorCode::InvalidUtcOffset, msg));
    }
    if !grid::is_grid_offset(offset) {
        return Err(bad_slot_request(
            ErrorCode::InvalidUtcOffset,
            "Availability grid requires a whole-hour UTC offset",
        ));
    }
    Ok(offset)
}

/// 本地日期区间转为 UTC 窗口，并限制最大天数
pub(crate) fn bounded_window(
    from: NaiveDate,
    to: NaiveDate,
    offset_minutes: i32,
    max_days: i64,
) -> std::result::Result<TimeRange, HttpResponse> {
    if to < from {
        return Err(bad_slot_request(
            ErrorCode::SlotRangeInvalid,
            "`to` must not be earlier than `from`",
        ));
    }
    if (to - from).num_days() + 1 > max_days {
        return Err(bad_slot_request(
            ErrorCode::SlotRangeInvalid,
            format!("Date range must not exceed {max_days} days"),
        ));
    }
    grid::local_window(from, to, offset_minutes)
        .ok_or_else(|| bad_slot_request(ErrorCode::SlotRangeInvalid, "Date range out of bounds"))
}

/// 教师只能编辑自己的时段，管理员可编辑任意教师
pub(crate) fn can_edit(user: &User, tutor_id: i64) -> bool {
    user.is_admin() || (user.is_tutor() && user.id == tutor_id)
}

/// 读取窗口内的可用时段并按本地日期展开
pub(crate) async fn load_availability(
    storage: &Arc<dyn Storage>,
    tutor_id: i64,
    from: NaiveDate,
    to: NaiveDate,
    offset_minutes: i32,
    window: TimeRange,
) -> Result<AvailabilityResponse> {
    let slots = storage.list_tutor_slots(tutor_id, window).await?;
    let ranges: Vec<TimeRange> = slots.iter().map(|s| s.range()).collect();
    let ranges = grid::clip(&ranges, &window);
    let days = grid::local_days(&ranges, from, to, offset_minutes);

    Ok(AvailabilityResponse {
        tutor_id,
        from,
        to,
        tz_offset: offset_minutes,
        ranges,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(id: i64, role: UserRole, offset: i32) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            avatar_url: None,
            utc_offset_minutes: offset,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_offset_defaults_to_user_setting() {
        let tutor = user(2, UserRole::Tutor, 480);
        assert_eq!(resolve_grid_offset(None, &tutor).unwrap(), 480);
        assert_eq!(resolve_grid_offset(Some(-300), &tutor).unwrap(), -300);
        assert!(resolve_grid_offset(Some(330), &tutor).is_err());
        assert!(resolve_grid_offset(Some(900), &tutor).is_err());
    }

    #[test]
    fn test_bounded_window_limits() {
        let window = bounded_window(date(1), date(7), 0, 7).unwrap();
        assert_eq!(window.duration_hours(), 7 * 24);
        assert!(bounded_window(date(1), date(8), 0, 7).is_err());
        assert!(bounded_window(date(5), date(4), 0, 7).is_err());
    }

    #[test]
    fn test_edit_permissions() {
        assert!(can_edit(&user(2, UserRole::Tutor, 0), 2));
        assert!(!can_edit(&user(2, UserRole::Tutor, 0), 3));
        assert!(can_edit(&user(1, UserRole::Admin, 0), 3));
        assert!(!can_edit(&user(4, UserRole::Student, 0), 4));
    }
}
