use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SongService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden};

pub async fn delete_song(
    service: &SongService,
    song_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    match storage.get_song_by_id(song_id).await {
        Ok(Some(song)) if current.is_admin() || song.created_by == current.id => {}
        Ok(Some(_)) => return Ok(forbidden("Only the author can delete this song")),
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

    match storage.delete_song(song_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Song deleted"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SongNotFound,
            "Song not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Song deletion failed: {e}"),
            )),
        ),
    }
}
