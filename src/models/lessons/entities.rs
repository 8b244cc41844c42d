use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课时状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub enum LessonStatus {
    Scheduled, // 已排课
    Completed, // 已完成
    Cancelled, // 已取消
}

impl LessonStatus {
    pub const SCHEDULED: &'static str = "scheduled";
    pub const COMPLETED: &'static str = "completed";
    pub const CANCELLED: &'static str = "cancelled";

    /// 只有已排课的课时可以完成或取消，终态不可再变
    pub fn can_transition_to(&self, next: LessonStatus) -> bool {
        matches!(
            (self, next),
            (LessonStatus::Scheduled, LessonStatus::Completed)
                | (LessonStatus::Scheduled, LessonStatus::Cancelled)
        )
    }
}

impl<'de> Deserialize<'de> for LessonStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<LessonStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的课时状态: '{s}'. 支持的状态: scheduled, completed, cancelled"
            ))
        })
    }
}

impl std::fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LessonStatus::Scheduled => write!(f, "{}", LessonStatus::SCHEDULED),
            LessonStatus::Completed => write!(f, "{}", LessonStatus::COMPLETED),
            LessonStatus::Cancelled => write!(f, "{}", LessonStatus::CANCELLED),
        }
    }
}

impl std::str::FromStr for LessonStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LessonStatus::SCHEDULED => Ok(LessonStatus::Scheduled),
            LessonStatus::COMPLETED => Ok(LessonStatus::Completed),
            LessonStatus::CANCELLED => Ok(LessonStatus::Cancelled),
            _ => Err(format!("Invalid lesson status: {s}")),
        }
    }
}

// 课时实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/lesson.ts")]
pub struct Lesson {
    pub id: i64,
    pub tutor_id: i64,
    pub student_id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    pub status: LessonStatus,
    pub notes: Option<String>,
    pub price_cents: i64,
    pub cancel_reason: Option<String>,
    pub cancelled_by: Option<i64>,
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Lesson {
    /// 是否参与课时（教师或学生本人）
    pub fn involves(&self, user_id: i64) -> bool {
        self.tutor_id == user_id || self.student_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_scheduled_lessons_move() {
        assert!(LessonStatus::Scheduled.can_transition_to(LessonStatus::Cancelled));
        assert!(LessonStatus::Scheduled.can_transition_to(LessonStatus::Completed));
        assert!(!LessonStatus::Cancelled.can_transition_to(LessonStatus::Scheduled));
        assert!(!LessonStatus::Cancelled.can_transition_to(LessonStatus::Cancelled));
        assert!(!LessonStatus::Completed.can_transition_to(LessonStatus::Cancelled));
    }
}
