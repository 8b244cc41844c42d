#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rust_tutorhub::models::users::{entities::UserRole, requests::CreateUserRequest};
use rust_tutorhub::storage::{SeaOrmStorage, Storage};

/// 每个测试独立的内存库
pub async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::connect(":memory:", 1, 5)
        .await
        .expect("in-memory storage")
}

pub async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> i64 {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@academy.test"),
            password: "not-a-real-hash".to_string(),
            role,
            display_name: None,
            avatar_url: None,
            utc_offset_minutes: 0,
        })
        .await
        .expect("create user")
        .id
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}
