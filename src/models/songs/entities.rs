use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 练习曲目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/song.ts")]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: Option<String>,
    // 原始谱面文本，由前端谱面组件渲染
    pub tab_source: String,
    pub tuning: Option<String>,
    pub tempo_bpm: Option<i32>,
    // 难度 1-5
    pub difficulty: i32,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 曲目摘要，列表接口不返回谱面正文
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/song.ts")]
pub struct SongSummary {
    pub id: i64,
    pub title: String,
    pub artist: Option<String>,
    pub tuning: Option<String>,
    pub tempo_bpm: Option<i32>,
    pub difficulty: i32,
    pub created_by: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Song> for SongSummary {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            title: song.title,
            artist: song.artist,
            tuning: song.tuning,
            tempo_bpm: song.tempo_bpm,
            difficulty: song.difficulty,
            created_by: song.created_by,
            updated_at: song.updated_at,
        }
    }
}
