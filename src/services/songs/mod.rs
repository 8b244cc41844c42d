pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::songs::requests::{CreateSongRequest, SongQueryParams, UpdateSongRequest};
use crate::storage::Storage;

pub const MIN_TEMPO_BPM: i32 = 20;
pub const MAX_TEMPO_BPM: i32 = 400;
pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 5;

pub struct SongService {
    storage: Option<Arc<dyn Storage>>,
}

impl SongService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_song(
        &self,
        req: CreateSongRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_song(self, req, request).await
    }

    pub async fn list_songs(
        &self,
        query: SongQueryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_songs(self, query, request).await
    }

    pub async fn get_song(&self, song_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_song(self, song_id, request).await
    }

    pub async fn update_song(
        &self,
        song_id: i64,
        update: UpdateSongRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_song(self, song_id, update, request).await
    }

    pub async fn delete_song(
        &self,
        song_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_song(self, song_id, request).await
    }
}

// 曲谱字段校验，`None` 表示未修改
pub(crate) fn validate_song_fields(
    title: Option<&str>,
    tab_source: Option<&str>,
    tempo_bpm: Option<i32>,
    difficulty: Option<i32>,
) -> Result<(), &'static str> {
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err("Song title is required");
    }
    if tab_source.is_some_and(|t| t.trim().is_empty()) {
        return Err("Tab source is required");
    }
    if tempo_bpm.is_some_and(|bpm| !(MIN_TEMPO_BPM..=MAX_TEMPO_BPM).contains(&bpm)) {
        return Err("Tempo must be between 20 and 400 bpm");
    }
    if difficulty.is_some_and(|d| !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&d)) {
        return Err("Difficulty must be between 1 and 5");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_field_rules() {
        assert!(validate_song_fields(Some("Blackbird"), Some("e|--0--|"), Some(96), Some(3)).is_ok());
        assert!(validate_song_fields(None, None, None, None).is_ok());
        assert!(validate_song_fields(Some("  "), None, None, None).is_err());
        assert!(validate_song_fields(None, Some(""), None, None).is_err());
        assert!(validate_song_fields(None, None, Some(19), None).is_err());
        assert!(validate_song_fields(None, None, Some(400), None).is_ok());
        assert!(validate_song_fields(None, None, None, Some(6)).is_err());
    }
}
