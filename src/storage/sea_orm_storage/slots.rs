//! 可用时段存储操作

use super::SeaOrmStorage;
use super::users::lock_user_row;
use crate::entity::tutor_slots::{ActiveModel, Column, Entity as TutorSlots};
use crate::errors::{Result, TutorHubError};
use crate::models::slots::{
    entities::{TimeRange, TutorSlot},
    requests::SlotEdit,
    responses::SlotEditOutcome,
};
use crate::services::slots::grid::{apply_edit, merge_hours, split_ranges};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 与窗口重叠的时段
    pub async fn list_tutor_slots_impl(
        &self,
        tutor_id: i64,
        window: TimeRange,
    ) -> Result<Vec<TutorSlot>> {
        let slots = TutorSlots::find()
            .filter(Column::TutorId.eq(tutor_id))
            .filter(Column::StartAt.lt(window.end.timestamp()))
            .filter(Column::EndAt.gt(window.start.timestamp()))
            .order_by_asc(Column::StartAt)
            .all(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询可用时段失败: {e}")))?;

        Ok(slots.into_iter().map(|m| m.into_slot()).collect())
    }

    /// 应用一次时段编辑
    ///
    /// 读取受影响（重叠或相邻）的区间，拆成小时后修改，再合并写回，
    /// 窗口外的小时保持不变
    pub async fn apply_slot_edit_impl(
        &self,
        tutor_id: i64,
        edit: SlotEdit,
    ) -> Result<SlotEditOutcome> {
        // 受影响的范围：清空窗口与新增小时的包络
        let hour_ranges = edit
            .add_hours
            .iter()
            .map(|h| TimeRange::new(*h, *h + chrono::TimeDelta::hours(1)));
        let bounds = edit
            .clear
            .iter()
            .copied()
            .chain(hour_ranges)
            .reduce(|a, b| TimeRange::new(a.start.min(b.start), a.end.max(b.end)));
        let Some(bounds) = bounds else {
            return Ok(SlotEditOutcome::default());
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("开启事务失败: {e}")))?;
        lock_user_row(&txn, tutor_id).await?;

        // 包含端点相接的区间，合并后才能保持最大连续
        let affected = TutorSlots::find()
            .filter(Column::TutorId.eq(tutor_id))
            .filter(Column::StartAt.lte(bounds.end.timestamp()))
            .filter(Column::EndAt.gte(bounds.start.timestamp()))
            .all(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询可用时段失败: {e}")))?;

        let existing_ranges: Vec<TimeRange> = affected
            .iter()
            .map(|m| m.clone().into_slot().range())
            .collect();
        let existing_hours = split_ranges(&existing_ranges);

        let (hours, added, removed) =
            apply_edit(&existing_hours, &edit.clear, &edit.add_hours);

        if added == 0 && removed == 0 {
            return Ok(SlotEditOutcome::default());
        }

        let ids: Vec<i64> = affected.iter().map(|m| m.id).collect();
        if !ids.is_empty() {
            TutorSlots::delete_many()
                .filter(Column::Id.is_in(ids))
                .exec(&txn)
                .await
                .map_err(|e| TutorHubError::database_operation(format!("删除可用时段失败: {e}")))?;
        }

        let now = chrono::Utc::now().timestamp();
        let models: Vec<ActiveModel> = merge_hours(hours)
            .into_iter()
            .map(|r| ActiveModel {
                tutor_id: Set(tutor_id),
                start_at: Set(r.start.timestamp()),
                end_at: Set(r.end.timestamp()),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();

        if !models.is_empty() {
            TutorSlots::insert_many(models)
                .exec(&txn)
                .await
                .map_err(|e| TutorHubError::database_operation(format!("写入可用时段失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(SlotEditOutcome {
            added_hours: added,
            removed_hours: removed,
        })
    }
}
