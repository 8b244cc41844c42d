//! 曲谱存储操作

use super::SeaOrmStorage;
use crate::entity::songs::{ActiveModel, Column, Entity as Songs};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    songs::{
        entities::{Song, SongSummary},
        requests::{CreateSongRequest, SongListQuery, UpdateSongRequest},
        responses::SongListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建曲谱
    pub async fn create_song_impl(&self, created_by: i64, req: CreateSongRequest) -> Result<Song> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            artist: Set(req.artist),
            tab_source: Set(req.tab_source),
            tuning: Set(req.tuning),
            tempo_bpm: Set(req.tempo_bpm),
            difficulty: Set(req.difficulty.unwrap_or(1)),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("创建曲谱失败: {e}")))?;

        Ok(result.into_song())
    }

    /// 通过 ID 获取曲谱（含谱面内容）
    pub async fn get_song_by_id_impl(&self, song_id: i64) -> Result<Option<Song>> {
        let result = Songs::find_by_id(song_id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询曲谱失败: {e}")))?;

        Ok(result.map(|m| m.into_song()))
    }

    /// 分页列出曲谱，列表中不返回谱面内容
    pub async fn list_songs_with_pagination_impl(
        &self,
        query: SongListQuery,
    ) -> Result<SongListResponse> {
        let (page, size) = normalize_page(query.page, query.size, 20);

        let mut select = Songs::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.contains(&escaped))
                    .add(Column::Artist.contains(&escaped)),
            );
        }

        if let Some(difficulty) = query.difficulty {
            select = select.filter(Column::Difficulty.eq(difficulty));
        }

        if let Some(created_by) = query.created_by {
            select = select.filter(Column::CreatedBy.eq(created_by));
        }

        select = select.order_by_asc(Column::Title);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询曲谱总数失败: {e}")))?;

        let songs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询曲谱列表失败: {e}")))?;

        Ok(SongListResponse {
            items: songs
                .into_iter()
                .map(|m| SongSummary::from(m.into_song()))
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新曲谱
    pub async fn update_song_impl(
        &self,
        song_id: i64,
        update: UpdateSongRequest,
    ) -> Result<Option<Song>> {
        if self.get_song_by_id_impl(song_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(song_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(artist) = update.artist {
            model.artist = Set(Some(artist));
        }
        if let Some(tab_source) = update.tab_source {
            model.tab_source = Set(tab_source);
        }
        if let Some(tuning) = update.tuning {
            model.tuning = Set(Some(tuning));
        }
        if let Some(tempo) = update.tempo_bpm {
            model.tempo_bpm = Set(Some(tempo));
        }
        if let Some(difficulty) = update.difficulty {
            model.difficulty = Set(difficulty);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("更新曲谱失败: {e}")))?;

        Ok(Some(result.into_song()))
    }

    /// 删除曲谱
    pub async fn delete_song_impl(&self, song_id: i64) -> Result<bool> {
        let result = Songs::delete_by_id(song_id)
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("删除曲谱失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
