use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SongService, validate_song_fields};
use crate::models::{ApiResponse, ErrorCode, songs::requests::CreateSongRequest};
use crate::services::current_user;

pub async fn create_song(
    service: &SongService,
    req: CreateSongRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Err(msg) = validate_song_fields(
        Some(&req.title),
        Some(&req.tab_source),
        req.tempo_bpm,
        req.difficulty,
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SongInvalid, msg)));
    }

    let storage = service.get_storage(request)?;

    match storage.create_song(current.id, req).await {
        Ok(song) => Ok(HttpResponse::Created().json(ApiResponse::success(song, "Song created"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Song creation failed: {e}"),
            )),
        ),
    }
}
