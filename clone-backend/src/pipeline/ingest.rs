//! Diary ingestion pipeline.
//!
//! Primary action: optional transcription, then the transactional diary
//! insert + clone statistics bump. Secondary action: personality
//! extraction, detached from the request after commit — its failures are
//! logged, never surfaced.

use std::path::PathBuf;
use std::sync::Arc;

use crate::ai::AiClient;
use crate::db::Database;
use crate::error::ServiceError;
use crate::models::Diary;

/// Raw ingestion input: exactly one of `text` or `audio_path` must be set.
#[derive(Debug, Default)]
pub struct NewDiary {
    pub text: Option<String>,
    pub audio_path: Option<PathBuf>,
}

pub struct DiaryIngestor {
    db: Arc<Database>,
    ai: Arc<AiClient>,
    transcription_language: Option<String>,
}

impl DiaryIngestor {
    pub fn new(db: Arc<Database>, ai: Arc<AiClient>, transcription_language: Option<String>) -> Self {
        Self {
            db,
            ai,
            transcription_language,
        }
    }

    /// Ingest one diary entry for `user_id` and return the persisted Diary.
    ///
    /// The returned diary never carries analysis fields; those are filled
    /// in later by the detached enrichment task, if extraction succeeds.
    pub async fn ingest(&self, user_id: i64, input: NewDiary) -> Result<Diary, ServiceError> {
        let (content, audio_path) = match (input.text, input.audio_path) {
            (Some(_), Some(_)) => {
                return Err(ServiceError::InvalidInput(
                    "Provide either text or audio, not both".to_string(),
                ));
            }
            (None, None) => {
                return Err(ServiceError::InvalidInput(
                    "Either text or audio must be provided".to_string(),
                ));
            }
            (Some(text), None) => (text, None),
            (None, Some(path)) => {
                // Transcription is the primary action here: failure aborts
                // the request and no diary row is written.
                let text = self
                    .ai
                    .transcribe_audio(&path, self.transcription_language.as_deref())
                    .await
                    .map_err(ServiceError::Dependency)?;
                (text, Some(path.to_string_lossy().to_string()))
            }
        };

        if content.split_whitespace().next().is_none() {
            return Err(ServiceError::InvalidInput(
                "Diary content must not be empty".to_string(),
            ));
        }

        let diary = self
            .db
            .create_diary(user_id, &content, audio_path.as_deref())?;

        log::info!(
            "Created diary {} for user {} ({} words)",
            diary.id,
            user_id,
            diary.word_count
        );

        // Fire-and-forget enrichment: the caller already has its diary.
        let db = Arc::clone(&self.db);
        let ai = Arc::clone(&self.ai);
        let diary_id = diary.id;
        let content = diary.content_text.clone();
        tokio::spawn(async move {
            run_enrichment(db, ai, diary_id, &content).await;
        });

        Ok(diary)
    }
}

/// Best-effort personality extraction for one committed diary.
///
/// Every failure path ends in a log line; nothing is rethrown into the
/// ingestion caller's path.
pub(crate) async fn run_enrichment(db: Arc<Database>, ai: Arc<AiClient>, diary_id: i64, content: &str) {
    match ai.analyze_personality(content).await {
        Ok(analysis) => match db.update_diary_analysis(diary_id, &analysis, &ai.model_version()) {
            Ok(true) => log::info!("Analyzed diary {}", diary_id),
            Ok(false) => log::warn!("Diary {} missing or already analyzed, dropping result", diary_id),
            Err(e) => log::error!("Failed to store analysis for diary {}: {}", diary_id, e),
        },
        Err(e) => log::warn!("Personality extraction failed for diary {}: {}", diary_id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockAiClient;
    use serde_json::json;
    use std::io::Write;

    fn harness() -> (Arc<Database>, Arc<AiClient>, DiaryIngestor) {
        let db = Arc::new(Database::new(":memory:").expect("in-memory db"));
        let ai = Arc::new(AiClient::Mock(MockAiClient::new()));
        let ingestor = DiaryIngestor::new(db.clone(), ai.clone(), None);
        (db, ai, ingestor)
    }

    fn mock(ai: &AiClient) -> &MockAiClient {
        match ai {
            AiClient::Mock(m) => m,
            _ => unreachable!(),
        }
    }

    fn text_input(text: &str) -> NewDiary {
        NewDiary {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ingest_persists_diary_and_creates_clone() {
        let (db, _ai, ingestor) = harness();
        let user = db.get_or_create_user(1).unwrap();

        let diary = ingestor.ingest(user.id, text_input("hello world")).await.unwrap();
        assert_eq!(diary.word_count, 2);
        assert!(diary.analysis_result.is_none());

        let clone = db.get_clone_for_user(user.id).unwrap().unwrap();
        assert_eq!(clone.id, diary.clone_id);
        assert_eq!(clone.diaries_count, 1);
        assert_eq!(
            clone.diaries_count as usize,
            db.list_user_diaries(user.id).unwrap().len()
        );
    }

    #[tokio::test]
    async fn rejects_empty_and_contradictory_input() {
        let (db, _ai, ingestor) = harness();
        let user = db.get_or_create_user(1).unwrap();

        for input in [
            NewDiary::default(),
            text_input("   \n\t "),
            NewDiary {
                text: Some("hi".to_string()),
                audio_path: Some(PathBuf::from("a.ogg")),
            },
        ] {
            match ingestor.ingest(user.id, input).await {
                Err(ServiceError::InvalidInput(_)) => {}
                other => panic!("expected InvalidInput, got {:?}", other.map(|d| d.id)),
            }
        }
        assert!(db.list_user_diaries(user.id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn audio_is_transcribed_before_persisting() {
        let (db, ai, ingestor) = harness();
        let user = db.get_or_create_user(1).unwrap();

        let mut audio = tempfile::NamedTempFile::new().unwrap();
        audio.write_all(b"not really audio").unwrap();
        mock(&ai).queue_transcription(Ok("today was a good day".to_string()));

        let diary = ingestor
            .ingest(
                user.id,
                NewDiary {
                    text: None,
                    audio_path: Some(audio.path().to_path_buf()),
                },
            )
            .await
            .unwrap();

        assert_eq!(diary.content_text, "today was a good day");
        assert_eq!(diary.word_count, 5);
        assert!(diary.audio_file_path.is_some());
    }

    #[tokio::test]
    async fn transcription_failure_aborts_without_a_diary() {
        let (db, ai, ingestor) = harness();
        let user = db.get_or_create_user(1).unwrap();

        mock(&ai).queue_transcription(Err("quota exceeded".to_string()));
        let result = ingestor
            .ingest(
                user.id,
                NewDiary {
                    text: None,
                    audio_path: Some(PathBuf::from("voice.ogg")),
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Dependency(_))));
        assert!(db.list_user_diaries(user.id).unwrap().is_empty());
        assert!(db.get_clone_for_user(user.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn enrichment_success_stores_analysis() {
        let (db, ai, ingestor) = harness();
        let user = db.get_or_create_user(1).unwrap();
        let diary = ingestor.ingest(user.id, text_input("a fine day")).await.unwrap();

        mock(&ai).queue_analysis(Ok(json!({"mood": "positive"})));
        run_enrichment(db.clone(), ai.clone(), diary.id, &diary.content_text).await;

        let stored = db.get_diary(diary.id).unwrap().unwrap();
        assert_eq!(stored.analysis_result, Some(json!({"mood": "positive"})));
        assert_eq!(stored.analysis_version.as_deref(), Some("mock"));
    }

    #[tokio::test]
    async fn enrichment_failure_leaves_diary_unanalyzed() {
        let (db, ai, ingestor) = harness();
        let user = db.get_or_create_user(1).unwrap();
        let diary = ingestor.ingest(user.id, text_input("a fine day")).await.unwrap();

        mock(&ai).queue_analysis(Err("malformed output".to_string()));
        run_enrichment(db.clone(), ai.clone(), diary.id, &diary.content_text).await;

        let stored = db.get_diary(diary.id).unwrap().unwrap();
        assert!(stored.analysis_result.is_none());
        assert!(stored.analyzed_at.is_none());
        assert!(stored.analysis_version.is_none());
    }
}
