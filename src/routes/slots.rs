use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::slots::requests::{
    AvailabilityParams, ClearRangeRequest, RecurrenceRequest, SaveDayGridRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::SlotService;
use crate::utils::SafeTutorIdI64;

static SLOT_SERVICE: Lazy<SlotService> = Lazy::new(SlotService::new_lazy);

pub async fn get_availability(
    req: HttpRequest,
    tutor_id: SafeTutorIdI64,
    query: web::Query<AvailabilityParams>,
) -> ActixResult<HttpResponse> {
    SLOT_SERVICE
        .get_availability(tutor_id.0, query.into_inner(), &req)
        .await
}

pub async fn get_bookable(
    req: HttpRequest,
    tutor_id: SafeTutorIdI64,
    query: web::Query<AvailabilityParams>,
) -> ActixResult<HttpResponse> {
    SLOT_SERVICE
        .get_bookable(tutor_id.0, query.into_inner(), &req)
        .await
}

pub async fn save_day_grid(
    req: HttpRequest,
    tutor_id: SafeTutorIdI64,
    body: web::Json<SaveDayGridRequest>,
) -> ActixResult<HttpResponse> {
    SLOT_SERVICE
        .save_day_grid(tutor_id.0, body.into_inner(), &req)
        .await
}

pub async fn apply_recurrence(
    req: HttpRequest,
    tutor_id: SafeTutorIdI64,
    body: web::Json<RecurrenceRequest>,
) -> ActixResult<HttpResponse> {
    SLOT_SERVICE
        .apply_recurrence(tutor_id.0, body.into_inner(), &req)
        .await
}

pub async fn clear_range(
    req: HttpRequest,
    tutor_id: SafeTutorIdI64,
    body: web::Json<ClearRangeRequest>,
) -> ActixResult<HttpResponse> {
    SLOT_SERVICE
        .clear_range(tutor_id.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_slot_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tutors/{tutor_id}/slots")
            .wrap(middlewares::RequireJWT)
            // 查询 - 所有登录用户
            .route("", web::get().to(get_availability))
            .route("/bookable", web::get().to(get_bookable))
            // 编辑 - 教师本人或管理员（业务层校验归属）
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::tutor_roles()))
                    .route("/day", web::put().to(save_day_grid))
                    .route("/recurrence", web::post().to(apply_recurrence))
                    .route("/clear", web::post().to(clear_range)),
            ),
    );
}
