use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SlotService, bounded_window, grid, load_availability, resolve_grid_offset};
use crate::models::{
    ApiResponse, ErrorCode,
    lessons::requests::LessonRangeQuery,
    slots::{entities::TimeRange, requests::AvailabilityParams},
    users::entities::UserRole,
};
use crate::services::{current_user, require_role_user, storage_error_response};

pub async fn get_availability(
    service: &SlotService,
    tutor_id: i64,
    params: AvailabilityParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let offset = match resolve_grid_offset(params.tz_offset, &current) {
        Ok(offset) => offset,
        Err(response) => return Ok(response),
    };
    let max_days = service.get_config().scheduling.max_calendar_days;
    let window = match bounded_window(params.from, params.to, offset, max_days) {
        Ok(window) => window,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request)?;
    if let Err(response) = require_role_user(&storage, tutor_id, UserRole::Tutor).await {
        return Ok(response);
    }

    match load_availability(&storage, tutor_id, params.from, params.to, offset, window).await {
        Ok(availability) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            availability,
            "Availability retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_bookable(
    service: &SlotService,
    tutor_id: i64,
    params: AvailabilityParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let offset = match resolve_grid_offset(params.tz_offset, &current) {
        Ok(offset) => offset,
        Err(response) => return Ok(response),
    };
    let max_days = service.get_config().scheduling.max_calendar_days;
    let window = match bounded_window(params.from, params.to, offset, max_days) {
        Ok(window) => window,
        Err(response) => return Ok(response),
    };

    let storage = service.get_storage(request)?;
    if let Err(response) = require_role_user(&storage, tutor_id, UserRole::Tutor).await {
        return Ok(response);
    }

    let mut availability =
        match load_availability(&storage, tutor_id, params.from, params.to, offset, window).await {
            Ok(availability) => availability,
            Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
        };

    let mut query = LessonRangeQuery::new(window.start, window.end);
    query.tutor_id = Some(tutor_id);
    let lessons = match storage.list_lessons_in_range(query).await {
        Ok(lessons) => lessons,
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    let busy: Vec<TimeRange> = lessons
        .iter()
        .map(|l| TimeRange::new(l.start_at, l.end_at))
        .collect();
    availability.ranges = grid::subtract(&availability.ranges, &busy);
    availability.days = grid::local_days(&availability.ranges, params.from, params.to, offset);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        availability,
        "Bookable hours retrieved successfully",
    )))
}
