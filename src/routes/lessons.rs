use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::lessons::requests::{
    CalendarParams, CancelLessonRequest, CreateLessonRequest, LessonListParams,
    UpdateLessonRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::LessonService;
use crate::utils::SafeIDI64;

static LESSON_SERVICE: Lazy<LessonService> = Lazy::new(LessonService::new_lazy);

pub async fn list_lessons(
    req: HttpRequest,
    query: web::Query<LessonListParams>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.list_lessons(query.into_inner(), &req).await
}

pub async fn create_lesson(
    req: HttpRequest,
    body: web::Json<CreateLessonRequest>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.create_lesson(body.into_inner(), &req).await
}

pub async fn calendar(
    req: HttpRequest,
    query: web::Query<CalendarParams>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.calendar(query.into_inner(), &req).await
}

pub async fn get_lesson(req: HttpRequest, lesson_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.get_lesson(lesson_id.0, &req).await
}

pub async fn update_lesson(
    req: HttpRequest,
    lesson_id: SafeIDI64,
    body: web::Json<UpdateLessonRequest>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE
        .update_lesson(lesson_id.0, body.into_inner(), &req)
        .await
}

pub async fn cancel_lesson(
    req: HttpRequest,
    lesson_id: SafeIDI64,
    body: Option<web::Json<CancelLessonRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    LESSON_SERVICE.cancel_lesson(lesson_id.0, body, &req).await
}

pub async fn complete_lesson(req: HttpRequest, lesson_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.complete_lesson(lesson_id.0, &req).await
}

pub async fn delete_lesson(req: HttpRequest, lesson_id: SafeIDI64) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.delete_lesson(lesson_id.0, &req).await
}

// 配置路由
pub fn configure_lesson_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/lessons")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列表按参与者过滤（业务层）
                    .route(web::get().to(list_lessons))
                    // 学生预约、教师排课
                    .route(web::post().to(create_lesson).wrap(RateLimit::booking())),
            )
            .service(web::resource("/calendar").route(web::get().to(calendar)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_lesson))
                    .route(
                        web::put()
                            .to(update_lesson)
                            .wrap(middlewares::RequireRole::new_any(UserRole::tutor_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_lesson)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 参与者均可取消，学生受提前量限制
            .service(web::resource("/{id}/cancel").route(web::post().to(cancel_lesson)))
            .service(
                web::resource("/{id}/complete").route(
                    web::post()
                        .to(complete_lesson)
                        .wrap(middlewares::RequireRole::new_any(UserRole::tutor_roles())),
                ),
            ),
    );
}
