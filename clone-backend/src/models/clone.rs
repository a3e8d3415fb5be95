use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Clone lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneStatus {
    Creating,
    Active,
    Paused,
    Deleted,
}

impl CloneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloneStatus::Creating => "creating",
            CloneStatus::Active => "active",
            CloneStatus::Paused => "paused",
            CloneStatus::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "creating" => Some(CloneStatus::Creating),
            "active" => Some(CloneStatus::Active),
            "paused" => Some(CloneStatus::Paused),
            "deleted" => Some(CloneStatus::Deleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for CloneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How far along the clone's training is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingStage {
    Initial,
    Learning,
    Mature,
}

impl TrainingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStage::Initial => "initial",
            TrainingStage::Learning => "learning",
            TrainingStage::Mature => "mature",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "initial" => Some(TrainingStage::Initial),
            "learning" => Some(TrainingStage::Learning),
            "mature" => Some(TrainingStage::Mature),
            _ => None,
        }
    }
}

/// The derived personality model for one user, built incrementally from
/// diary entries. One per user, created on the first diary.
///
/// Invariant: `diaries_count` and `total_words_analyzed` are monotonically
/// non-decreasing and always equal the count/word-sum of owned diaries —
/// they are only ever bumped in the same transaction as a diary insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneRecord {
    pub id: i64,
    pub user_id: i64,
    /// Structured personality document, default `{}`
    pub personality_profile: Value,
    pub accuracy_score: f64,
    pub diaries_count: i64,
    pub total_words_analyzed: i64,
    pub last_diary_at: Option<DateTime<Utc>>,
    pub status: CloneStatus,
    pub training_stage: TrainingStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CloneResponse {
    pub id: i64,
    pub personality_profile: Value,
    pub accuracy_score: f64,
    pub diaries_count: i64,
    pub total_words_analyzed: i64,
    pub status: CloneStatus,
    pub training_stage: TrainingStage,
    pub last_diary_at: Option<DateTime<Utc>>,
}

impl From<&CloneRecord> for CloneResponse {
    fn from(clone: &CloneRecord) -> Self {
        CloneResponse {
            id: clone.id,
            personality_profile: clone.personality_profile.clone(),
            accuracy_score: clone.accuracy_score,
            diaries_count: clone.diaries_count,
            total_words_analyzed: clone.total_words_analyzed,
            status: clone.status,
            training_stage: clone.training_stage,
            last_diary_at: clone.last_diary_at,
        }
    }
}
