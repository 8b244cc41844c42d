use crate::models::common::{PaginationQuery, opt_from_str};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/song.ts")]
pub struct SongQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub difficulty: Option<i32>,
    #[serde(default, deserialize_with = "opt_from_str")]
    pub created_by: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/song.ts")]
pub struct CreateSongRequest {
    pub title: String,
    pub artist: Option<String>,
    pub tab_source: String,
    pub tuning: Option<String>,
    pub tempo_bpm: Option<i32>,
    pub difficulty: Option<i32>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/song.ts")]
pub struct UpdateSongRequest {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub tab_source: Option<String>,
    pub tuning: Option<String>,
    pub tempo_bpm: Option<i32>,
    pub difficulty: Option<i32>,
}

// 用于存储层
#[derive(Debug, Clone, Default)]
pub struct SongListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub difficulty: Option<i32>,
    pub created_by: Option<i64>,
}
