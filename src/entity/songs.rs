//! 曲谱实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub artist: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub tab_source: String,
    pub tuning: Option<String>,
    pub tempo_bpm: Option<i32>,
    pub difficulty: i32,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_song(self) -> crate::models::songs::entities::Song {
        use super::ts_to_datetime;
        use crate::models::songs::entities::Song;

        Song {
            id: self.id,
            title: self.title,
            artist: self.artist,
            tab_source: self.tab_source,
            tuning: self.tuning,
            tempo_bpm: self.tempo_bpm,
            difficulty: self.difficulty,
            created_by: self.created_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
