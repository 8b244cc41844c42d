use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SongService, validate_song_fields};
use crate::models::{ApiResponse, ErrorCode, songs::requests::UpdateSongRequest};
use crate::services::{current_user, forbidden};

pub async fn update_song(
    service: &SongService,
    song_id: i64,
    update: UpdateSongRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Err(msg) = validate_song_fields(
        update.title.as_deref(),
        update.tab_source.as_deref(),
        update.tempo_bpm,
        update.difficulty,
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SongInvalid, msg)));
    }

    let storage = service.get_storage(request)?;

    match storage.get_song_by_id(song_id).await {
        Ok(Some(song)) if current.is_admin() || song.created_by == current.id => {}
        Ok(Some(_)) => return Ok(forbidden("Only the author can edit this song")),
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SongNotFound,
                "Song not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get song: {e}"),
                )),
            );
        }
    }

    match storage.update_song(song_id, update).await {
        Ok(Some(song)) => Ok(HttpResponse::Ok().json(ApiResponse::success(song, "Song updated"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SongNotFound,
            "Song not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Song update failed: {e}"),
            )),
        ),
    }
}
