use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of extracted memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Fact,
    Preference,
    Experience,
    Relationship,
    Goal,
    Fear,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Fact => "fact",
            MemoryType::Preference => "preference",
            MemoryType::Experience => "experience",
            MemoryType::Relationship => "relationship",
            MemoryType::Goal => "goal",
            MemoryType::Fear => "fear",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fact" => Some(MemoryType::Fact),
            "preference" => Some(MemoryType::Preference),
            "experience" => Some(MemoryType::Experience),
            "relationship" => Some(MemoryType::Relationship),
            "goal" => Some(MemoryType::Goal),
            "fear" => Some(MemoryType::Fear),
            _ => None,
        }
    }
}

/// One discrete fact/preference/experience attributed to a clone, with an
/// importance weight used for ranking.
///
/// `source_diary_id` is nulled (not cascaded) if the diary it came from is
/// removed. `usage_count`/`last_used_at` exist but are not updated by the
/// query pipeline — reads against the memory store are side-effect free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneMemory {
    pub id: i64,
    pub clone_id: i64,
    pub source_diary_id: Option<i64>,
    pub memory_type: MemoryType,
    pub memory_content: String,
    pub memory_context: Option<String>,
    /// In [0, 1]; set at creation and not revised
    pub importance_score: f64,
    /// In [0, 1]; set at creation and not revised
    pub confidence_score: f64,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to insert a memory into a clone's store
#[derive(Debug, Deserialize)]
pub struct CreateMemoryRequest {
    pub source_diary_id: Option<i64>,
    pub memory_type: MemoryType,
    pub memory_content: String,
    pub memory_context: Option<String>,
    pub importance_score: f64,
    pub confidence_score: f64,
}
