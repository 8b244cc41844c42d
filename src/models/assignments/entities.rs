use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::submissions::entities::SubmissionStatus;

/// 作业状态（以最新一次提交为准）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub enum AssignmentStatus {
    Assigned,          // 已布置，未提交
    Submitted,         // 已提交，待批改
    RevisionRequested, // 退回修改
    Graded,            // 已评分
}

impl AssignmentStatus {
    pub const ASSIGNED: &'static str = "assigned";
    pub const SUBMITTED: &'static str = "submitted";
    pub const REVISION_REQUESTED: &'static str = "revision_requested";
    pub const GRADED: &'static str = "graded";

    /// 由最新提交的状态推导作业状态
    pub fn from_latest(latest: Option<SubmissionStatus>) -> Self {
        match latest {
            None => AssignmentStatus::Assigned,
            Some(SubmissionStatus::Submitted) => AssignmentStatus::Submitted,
            Some(SubmissionStatus::RevisionRequested) => AssignmentStatus::RevisionRequested,
            Some(SubmissionStatus::Graded) => AssignmentStatus::Graded,
        }
    }

    /// 学生是否还需要（重新）提交
    pub fn awaiting_student(&self) -> bool {
        matches!(
            self,
            AssignmentStatus::Assigned | AssignmentStatus::RevisionRequested
        )
    }
}

impl<'de> Deserialize<'de> for AssignmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AssignmentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的作业状态: '{s}'. 支持的状态: assigned, submitted, revision_requested, graded"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssignmentStatus::Assigned => AssignmentStatus::ASSIGNED,
            AssignmentStatus::Submitted => AssignmentStatus::SUBMITTED,
            AssignmentStatus::RevisionRequested => AssignmentStatus::REVISION_REQUESTED,
            AssignmentStatus::Graded => AssignmentStatus::GRADED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AssignmentStatus::ASSIGNED => Ok(AssignmentStatus::Assigned),
            AssignmentStatus::SUBMITTED => Ok(AssignmentStatus::Submitted),
            AssignmentStatus::REVISION_REQUESTED => Ok(AssignmentStatus::RevisionRequested),
            AssignmentStatus::GRADED => Ok(AssignmentStatus::Graded),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub tutor_id: i64,
    pub student_id: i64,
    // 关联课时
    pub lesson_id: Option<i64>,
    // 关联练习曲目
    pub song_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub max_score: f64,
    pub status: AssignmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 截止时间已过且学生仍未交付
    pub fn is_overdue(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        match self.due_at {
            Some(due) => due < now && self.status.awaiting_student(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn assignment(status: AssignmentStatus, due_in: Option<Duration>) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            tutor_id: 2,
            student_id: 3,
            lesson_id: None,
            song_id: None,
            title: "Scales".to_string(),
            description: None,
            due_at: due_in.map(|d| now + d),
            max_score: 100.0,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_follows_latest_submission() {
        assert_eq!(AssignmentStatus::from_latest(None), AssignmentStatus::Assigned);
        assert_eq!(
            AssignmentStatus::from_latest(Some(SubmissionStatus::RevisionRequested)),
            AssignmentStatus::RevisionRequested
        );
        assert_eq!(
            AssignmentStatus::from_latest(Some(SubmissionStatus::Graded)),
            AssignmentStatus::Graded
        );
    }

    #[test]
    fn test_overdue_only_when_waiting_on_student() {
        let past = Some(Duration::hours(-1));
        assert!(assignment(AssignmentStatus::Assigned, past).is_overdue(Utc::now()));
        assert!(assignment(AssignmentStatus::RevisionRequested, past).is_overdue(Utc::now()));
        assert!(!assignment(AssignmentStatus::Submitted, past).is_overdue(Utc::now()));
        assert!(!assignment(AssignmentStatus::Assigned, None).is_overdue(Utc::now()));
        assert!(
            !assignment(AssignmentStatus::Assigned, Some(Duration::days(1))).is_overdue(Utc::now())
        );
    }
}
