use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SongService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_song(
    service: &SongService,
    song_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_song_by_id(song_id).await {
        Ok(Some(song)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            song,
            "Song retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SongNotFound,
            "Song not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get song: {e}"),
            )),
        ),
    }
}
