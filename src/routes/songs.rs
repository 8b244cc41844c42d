use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::songs::requests::{CreateSongRequest, SongQueryParams, UpdateSongRequest};
use crate::models::users::entities::UserRole;
use crate::services::SongService;
use crate::utils::SafeIDI64;

static SONG_SERVICE: Lazy<SongService> = Lazy::new(SongService::new_lazy);

pub async fn list_songs(
    req: HttpRequest,
    query: web::Query<SongQueryParams>,
) -> ActixResult<HttpResponse> {
    SONG_SERVICE.list_songs(query.into_inner(), &req).await
}

pub async fn create_song(
    req: HttpRequest,
    body: web::Json<CreateSongRequest>,
) -> ActixResult<HttpResponse> {
    SONG_SERVICE.create_song(body.into_inner(), &req).await
}

pub async fn get_song(req: HttpRequest, song_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SONG_SERVICE.get_song(song_id.0, &req).await
}

pub async fn update_song(
    req: HttpRequest,
    song_id: SafeIDI64,
    body: web::Json<UpdateSongRequest>,
) -> ActixResult<HttpResponse> {
    SONG_SERVICE
        .update_song(song_id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_song(req: HttpRequest, song_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SONG_SERVICE.delete_song(song_id.0, &req).await
}

// 配置路由
pub fn configure_song_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/songs")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 曲谱库 - 所有登录用户可浏览
                    .route(web::get().to(list_songs))
                    .route(
                        web::post()
                            .to(create_song)
                            .wrap(middlewares::RequireRole::new_any(UserRole::tutor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_song))
                    .route(
                        web::put()
                            .to(update_song)
                            .wrap(middlewares::RequireRole::new_any(UserRole::tutor_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_song)
                            .wrap(middlewares::RequireRole::new_any(UserRole::tutor_roles())),
                    ),
            ),
    );
}
