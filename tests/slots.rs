mod common;

use chrono::TimeDelta;
use common::{at, storage, user};
use rust_tutorhub::models::slots::{entities::TimeRange, requests::SlotEdit};
use rust_tutorhub::models::users::entities::UserRole;
use rust_tutorhub::storage::{SeaOrmStorage, Storage};

fn hours(day: u32, hs: &[u32]) -> Vec<chrono::DateTime<chrono::Utc>> {
    hs.iter().map(|h| at(day, *h)).collect()
}

async fn ranges(storage: &SeaOrmStorage, tutor: i64) -> Vec<TimeRange> {
    storage
        .list_tutor_slots(tutor, TimeRange::new(at(1, 0), at(20, 0)))
        .await
        .unwrap()
        .iter()
        .map(|s| s.range())
        .collect()
}

#[tokio::test]
async fn test_adjacent_hours_are_stored_merged() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;

    let outcome = storage
        .apply_slot_edit(
            tutor,
            SlotEdit {
                clear: Vec::new(),
                add_hours: hours(2, &[9, 10, 14]),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.added_hours, 3);

    // 与已有区间相接，合并为一段
    storage
        .apply_slot_edit(
            tutor,
            SlotEdit {
                clear: Vec::new(),
                add_hours: hours(2, &[11, 12, 13]),
            },
        )
        .await
        .unwrap();

    assert_eq!(ranges(&storage, tutor).await, vec![TimeRange::new(at(2, 9), at(2, 15))]);
}

#[tokio::test]
async fn test_day_replace_splits_straddling_range() {
    let storage = storage().await;
    let tutor = user(&storage, "tutor_ana", UserRole::Tutor).await;

    // 02 日 20:00 到 03 日 04:00 的连续区间
    let overnight: Vec<_> = (0..8).map(|i| at(2, 20) + TimeDelta::hours(i)).collect();
    storage
        .apply_slot_edit(
            tutor,
            SlotEdit {
                clear: Vec::new(),
                add_hours: overnight,
            },
        )
        .await
        .unwrap();

    // 只替换 03 日：保留 02 日晚间，03 日改为 10-12 点
    let outcome = storage
        .apply_slot_edit(
            tutor,
            SlotEdit {
                clear: vec![TimeRange::new(at(3, 0), at(4, 0))],
                add_hours: hours(3, &[10, 11]),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.removed_hours, 4);
    assert_eq!(outcome.added_hours, 2);

    assert_eq!(
        ranges(&storage, tutor).await,
        vec![
            TimeRange::new(at(2, 20), at(3, 0)),
            TimeRange::new(at(3, 10), at(3, 12)),
        ]
    );
}

#[tokio::test]
async fn test_clear_only_touches_own_tutor() {
    let storage = storage().await;
    let ana = user(&storage, "tutor_ana", UserRole::Tutor).await;
    let dee = user(&storage, "tutor_dee", UserRole::Tutor).await;

    for tutor in [ana, dee] {
        storage
            .apply_slot_edit(
                tutor,
                SlotEdit {
                    clear: Vec::new(),
                    add_hours: hours(5, &[9, 10]),
                },
            )
            .await
            .unwrap();
    }

    let outcome = storage
        .apply_slot_edit(
            ana,
            SlotEdit {
                clear: vec![TimeRange::new(at(5, 0), at(6, 0))],
                add_hours: Vec::new(),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.removed_hours, 2);

    assert!(ranges(&storage, ana).await.is_empty());
    assert_eq!(ranges(&storage, dee).await.len(), 1);

    // 空编辑不写库
    let noop = storage
        .apply_slot_edit(ana, SlotEdit::default())
        .await
        .unwrap();
    assert_eq!(noop.added_hours + noop.removed_hours, 0);
}
