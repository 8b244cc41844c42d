use super::entities::SongSummary;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/song.ts")]
pub struct SongListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<SongSummary>,
}
