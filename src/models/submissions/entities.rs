use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
    RevisionRequested,
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const GRADED: &'static str = "graded";
    pub const REVISION_REQUESTED: &'static str = "revision_requested";

    /// 根据最新一次提交判断能否再次提交
    ///
    /// 首次提交或被退回修改后允许；待批改或已评分时拒绝
    pub fn allows_new_submission(latest: Option<SubmissionStatus>) -> bool {
        matches!(latest, None | Some(SubmissionStatus::RevisionRequested))
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SubmissionStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: submitted, graded, revision_requested"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionStatus::Submitted => SubmissionStatus::SUBMITTED,
            SubmissionStatus::Graded => SubmissionStatus::GRADED,
            SubmissionStatus::RevisionRequested => SubmissionStatus::REVISION_REQUESTED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SubmissionStatus::SUBMITTED => Ok(SubmissionStatus::Submitted),
            SubmissionStatus::GRADED => Ok(SubmissionStatus::Graded),
            SubmissionStatus::REVISION_REQUESTED => Ok(SubmissionStatus::RevisionRequested),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 批改动作
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../web/src/types/generated/submission.ts")]
pub enum ReviewAction {
    Grade,
    RequestRevision,
}

impl ReviewAction {
    pub fn resulting_status(&self) -> SubmissionStatus {
        match self {
            ReviewAction::Grade => SubmissionStatus::Graded,
            ReviewAction::RequestRevision => SubmissionStatus::RevisionRequested,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../web/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    // 同一作业内从 1 递增
    pub version: i32,
    pub content: String,
    pub practice_minutes: Option<i32>,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resubmission_rules() {
        assert!(SubmissionStatus::allows_new_submission(None));
        assert!(SubmissionStatus::allows_new_submission(Some(
            SubmissionStatus::RevisionRequested
        )));
        assert!(!SubmissionStatus::allows_new_submission(Some(
            SubmissionStatus::Submitted
        )));
        assert!(!SubmissionStatus::allows_new_submission(Some(
            SubmissionStatus::Graded
        )));
    }

    #[test]
    fn test_review_action_from_json() {
        let action: ReviewAction = serde_json::from_str("\"request_revision\"").unwrap();
        assert_eq!(action.resulting_status(), SubmissionStatus::RevisionRequested);
    }
}
