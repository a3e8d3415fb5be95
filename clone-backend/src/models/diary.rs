use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One user-submitted journal entry, possibly transcribed from audio.
///
/// Content is immutable once created; only the analysis triple
/// (`analysis_result`, `analyzed_at`, `analysis_version`) is written
/// post-creation, exactly once, by the enrichment task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diary {
    pub id: i64,
    pub user_id: i64,
    pub clone_id: i64,
    pub content_text: String,
    pub audio_file_path: Option<String>,
    pub audio_duration_seconds: Option<i64>,
    /// Whitespace-token count of `content_text`, computed at creation
    pub word_count: i64,
    pub analysis_result: Option<Value>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub analysis_version: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DiaryResponse {
    pub id: i64,
    pub content_text: String,
    pub word_count: i64,
    pub created_at: DateTime<Utc>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl From<&Diary> for DiaryResponse {
    fn from(diary: &Diary) -> Self {
        DiaryResponse {
            id: diary.id,
            content_text: diary.content_text.clone(),
            word_count: diary.word_count,
            created_at: diary.created_at,
            analyzed_at: diary.analyzed_at,
        }
    }
}
