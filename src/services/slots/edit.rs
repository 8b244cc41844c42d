use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{NaiveDate, Weekday};
use tracing::info;

use super::{
    SlotService, bounded_window, can_edit, grid, load_availability, recurrence,
    resolve_grid_offset,
};
use crate::models::{
    ApiResponse, ErrorCode,
    slots::{
        entities::TimeRange,
        requests::{ClearRangeRequest, RecurrenceRequest, SaveDayGridRequest, SlotEdit},
        responses::SlotChangeResponse,
    },
    users::entities::UserRole,
};
use crate::services::{current_user, forbidden, require_role_user, storage_error_response};

/// 保存某个本地日期的小时网格
///
/// 窗口内原有的小时被替换为提交的小时，窗口外不受影响
pub async fn save_day_grid(
    service: &SlotService,
    tutor_id: i64,
    req: SaveDayGridRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if !can_edit(&current, tutor_id) {
        return Ok(forbidden("No permission to edit this tutor's availability"));
    }
    let offset = match resolve_grid_offset(req.tz_offset, &current) {
        Ok(offset) => offset,
        Err(response) => return Ok(response),
    };
    if !grid::validate_local_hours(&req.hours) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SlotHourInvalid,
            "Hours must be between 0 and 23",
        )));
    }
    let window = match bounded_window(req.date, req.date, offset, 1) {
        Ok(window) => window,
        Err(response) => return Ok(response),
    };

    let add_hours = req
        .hours
        .iter()
        .filter_map(|h| grid::local_to_utc(req.date, *h, offset))
        .collect();

    let edit = SlotEdit {
        clear: vec![window],
        add_hours,
    };
    apply_and_respond(service, tutor_id, edit, (req.date, req.date), offset, window, request).await
}

/// 按周重复添加（或替换）可用小时
pub async fn apply_recurrence(
    service: &SlotService,
    tutor_id: i64,
    req: RecurrenceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if !can_edit(&current, tutor_id) {
        return Ok(forbidden("No permission to edit this tutor's availability"));
    }
    let offset = match resolve_grid_offset(req.tz_offset, &current) {
        Ok(offset) => offset,
        Err(response) => return Ok(response),
    };
    if req.hours.is_empty() && !req.replace {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SlotHourInvalid,
            "At least one hour is required",
        )));
    }
    if !grid::validate_local_hours(&req.hours) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SlotHourInvalid,
            "Hours must be between 0 and 23",
        )));
    }
    let weekdays: Option<Vec<Weekday>> = req
        .weekdays
        .iter()
        .map(|n| recurrence::weekday_from_iso(*n))
        .collect();
    let Some(weekdays) = weekdays else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SlotRangeInvalid,
            "Weekdays must be between 1 (Monday) and 7 (Sunday)",
        )));
    };

    let max_days = service.get_config().scheduling.max_recurrence_days;
    let window = match bounded_window(req.from, req.to, offset, max_days) {
        Ok(window) => window,
        Err(response) => return Ok(response),
    };

    let add_hours =
        recurrence::expand_recurrence(&req.hours, &weekdays, req.from, req.to, offset);

    let clear = if req.replace {
        recurrence::replaced_days(&weekdays, req.from, req.to, offset)
    } else {
        Vec::new()
    };

    let edit = SlotEdit { clear, add_hours };
    apply_and_respond(service, tutor_id, edit, (req.from, req.to), offset, window, request).await
}

/// 清空本地日期区间内的全部可用小时
pub async fn clear_range(
    service: &SlotService,
    tutor_id: i64,
    req: ClearRangeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if !can_edit(&current, tutor_id) {
        return Ok(forbidden("No permission to edit this tutor's availability"));
    }
    let offset = match resolve_grid_offset(req.tz_offset, &current) {
        Ok(offset) => offset,
        Err(response) => return Ok(response),
    };
    let max_days = service.get_config().scheduling.max_recurrence_days;
    let window = match bounded_window(req.from, req.to, offset, max_days) {
        Ok(window) => window,
        Err(response) => return Ok(response),
    };

    let edit = SlotEdit {
        clear: vec![window],
        add_hours: Vec::new(),
    };
    apply_and_respond(service, tutor_id, edit, (req.from, req.to), offset, window, request).await
}

// 应用编辑并返回编辑范围内的最新可用时段
async fn apply_and_respond(
    service: &SlotService,
    tutor_id: i64,
    edit: SlotEdit,
    (from, to): (NaiveDate, NaiveDate),
    offset: i32,
    window: TimeRange,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if let Err(response) = require_role_user(&storage, tutor_id, UserRole::Tutor).await {
        return Ok(response);
    }

    let outcome = match storage.apply_slot_edit(tutor_id, edit).await {
        Ok(outcome) => outcome,
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    info!(
        "Availability of tutor {} updated: +{} -{} hours",
        tutor_id, outcome.added_hours, outcome.removed_hours
    );

    match load_availability(&storage, tutor_id, from, to, offset, window).await {
        Ok(availability) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SlotChangeResponse {
                tutor_id,
                added_hours: outcome.added_hours,
                removed_hours: outcome.removed_hours,
                availability,
            },
            "Availability updated",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
