use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SongService;
use crate::models::{
    ApiResponse, ErrorCode,
    songs::requests::{SongListQuery, SongQueryParams},
};

pub async fn list_songs(
    service: &SongService,
    query: SongQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = SongListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        difficulty: query.difficulty,
        created_by: query.created_by,
    };

    match storage.list_songs_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Song list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve song list: {e}"),
            )),
        ),
    }
}
