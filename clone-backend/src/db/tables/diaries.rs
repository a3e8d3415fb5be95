//! Diary database operations (diaries)
//!
//! The diary insert and the clone statistics bump happen in one
//! transaction so the two are never observably inconsistent, even under
//! concurrent ingestion for the same clone.

use chrono::Utc;
use rusqlite::{OptionalExtension, Result as SqliteResult};
use serde_json::Value;

use super::users::parse_ts;
use crate::db::Database;
use crate::models::Diary;

const DIARY_COLUMNS: &str = "id, user_id, clone_id, content_text, audio_file_path,
     audio_duration_seconds, word_count, analysis_result, analyzed_at, analysis_version, created_at";

impl Database {
    /// Persist a diary for `user_id`, creating the user's clone on first
    /// diary (the sole clone-creation path) and bumping its aggregate
    /// statistics, all in one transaction.
    pub fn create_diary(
        &self,
        user_id: i64,
        content_text: &str,
        audio_file_path: Option<&str>,
    ) -> SqliteResult<Diary> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        let clone_id: Option<i64> = tx
            .query_row("SELECT id FROM clones WHERE user_id = ?1", [user_id], |row| {
                row.get(0)
            })
            .optional()?;
        let clone_id = match clone_id {
            Some(id) => id,
            None => {
                tx.execute(
                    "INSERT INTO clones (user_id, created_at, updated_at) VALUES (?1, ?2, ?2)",
                    rusqlite::params![user_id, &now_str],
                )?;
                tx.last_insert_rowid()
            }
        };

        let word_count = content_text.split_whitespace().count() as i64;
        tx.execute(
            "INSERT INTO diaries (user_id, clone_id, content_text, audio_file_path, word_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![user_id, clone_id, content_text, audio_file_path, word_count, &now_str],
        )?;
        let diary_id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE clones SET diaries_count = diaries_count + 1,
                               total_words_analyzed = total_words_analyzed + ?1,
                               last_diary_at = ?2,
                               updated_at = ?2
             WHERE id = ?3",
            rusqlite::params![word_count, &now_str, clone_id],
        )?;

        tx.commit()?;

        Ok(Diary {
            id: diary_id,
            user_id,
            clone_id,
            content_text: content_text.to_string(),
            audio_file_path: audio_file_path.map(|s| s.to_string()),
            audio_duration_seconds: None,
            word_count,
            analysis_result: None,
            analyzed_at: None,
            analysis_version: None,
            created_at: now,
        })
    }

    /// Store the extraction result on a diary, exactly once. Returns false
    /// if the diary is missing or already analyzed.
    pub fn update_diary_analysis(
        &self,
        diary_id: i64,
        analysis: &Value,
        analysis_version: &str,
    ) -> SqliteResult<bool> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let analysis_str = analysis.to_string();
        let rows = conn.execute(
            "UPDATE diaries SET analysis_result = ?1, analyzed_at = ?2, analysis_version = ?3
             WHERE id = ?4 AND analysis_result IS NULL",
            rusqlite::params![&analysis_str, &now, analysis_version, diary_id],
        )?;
        Ok(rows > 0)
    }

    pub fn get_diary(&self, id: i64) -> SqliteResult<Option<Diary>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {} FROM diaries WHERE id = ?1", DIARY_COLUMNS),
            [id],
            |row| Self::row_to_diary(row),
        )
        .optional()
    }

    /// All diaries for a user, newest first.
    pub fn list_user_diaries(&self, user_id: i64) -> SqliteResult<Vec<Diary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM diaries WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            DIARY_COLUMNS
        ))?;

        let diaries = stmt
            .query_map([user_id], |row| Self::row_to_diary(row))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(diaries)
    }

    /// Remove a diary. Memories citing it keep their row; the reference is
    /// nulled by the ON DELETE SET NULL rule.
    pub fn delete_diary(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn();
        let rows = conn.execute("DELETE FROM diaries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    fn row_to_diary(row: &rusqlite::Row) -> rusqlite::Result<Diary> {
        let analysis_str: Option<String> = row.get(7)?;
        let analyzed_at_str: Option<String> = row.get(8)?;
        let created_at_str: String = row.get(10)?;

        Ok(Diary {
            id: row.get(0)?,
            user_id: row.get(1)?,
            clone_id: row.get(2)?,
            content_text: row.get(3)?,
            audio_file_path: row.get(4)?,
            audio_duration_seconds: row.get(5)?,
            word_count: row.get(6)?,
            analysis_result: analysis_str.and_then(|s| serde_json::from_str(&s).ok()),
            analyzed_at: analyzed_at_str.map(|s| parse_ts(&s)),
            analysis_version: row.get(9)?,
            created_at: parse_ts(&created_at_str),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[test]
    fn word_count_is_whitespace_token_count() {
        let db = Database::new(":memory:").expect("in-memory db");
        let user = db.get_or_create_user(1).unwrap();

        let diary = db.create_diary(user.id, "hello world", None).unwrap();
        assert_eq!(diary.word_count, 2);

        let diary = db.create_diary(user.id, "  one\ttwo\nthree  ", None).unwrap();
        assert_eq!(diary.word_count, 3);
    }

    #[test]
    fn stats_track_diary_count_and_word_sum() {
        let db = Database::new(":memory:").expect("in-memory db");
        let user = db.get_or_create_user(1).unwrap();

        db.create_diary(user.id, "a b c", None).unwrap();
        db.create_diary(user.id, "d e", None).unwrap();

        let clone = db.get_clone_for_user(user.id).unwrap().unwrap();
        assert_eq!(clone.diaries_count, 2);
        assert_eq!(clone.total_words_analyzed, 5);
        assert!(clone.last_diary_at.is_some());
        assert_eq!(
            clone.diaries_count as usize,
            db.list_user_diaries(user.id).unwrap().len()
        );
    }

    #[test]
    fn both_diaries_share_one_clone() {
        let db = Database::new(":memory:").expect("in-memory db");
        let user = db.get_or_create_user(1).unwrap();

        let a = db.create_diary(user.id, "first entry", None).unwrap();
        let b = db.create_diary(user.id, "second entry", None).unwrap();
        assert_eq!(a.clone_id, b.clone_id);
    }

    #[test]
    fn analysis_is_write_once() {
        let db = Database::new(":memory:").expect("in-memory db");
        let user = db.get_or_create_user(1).unwrap();
        let diary = db.create_diary(user.id, "some text", None).unwrap();

        let first = serde_json::json!({"mood": "positive"});
        assert!(db.update_diary_analysis(diary.id, &first, "gpt-4").unwrap());

        let second = serde_json::json!({"mood": "negative"});
        assert!(!db.update_diary_analysis(diary.id, &second, "gpt-4").unwrap());

        let stored = db.get_diary(diary.id).unwrap().unwrap();
        assert_eq!(stored.analysis_result, Some(first));
        assert_eq!(stored.analysis_version.as_deref(), Some("gpt-4"));
        assert!(stored.analyzed_at.is_some());
    }

    #[test]
    fn deleting_diary_nulls_memory_reference() {
        use crate::models::{CreateMemoryRequest, MemoryType};

        let db = Database::new(":memory:").expect("in-memory db");
        let user = db.get_or_create_user(1).unwrap();
        let diary = db.create_diary(user.id, "likes hiking", None).unwrap();

        let memory = db
            .create_memory(
                diary.clone_id,
                &CreateMemoryRequest {
                    source_diary_id: Some(diary.id),
                    memory_type: MemoryType::Preference,
                    memory_content: "likes hiking".to_string(),
                    memory_context: None,
                    importance_score: 0.8,
                    confidence_score: 0.9,
                },
            )
            .unwrap();
        assert_eq!(memory.source_diary_id, Some(diary.id));

        assert!(db.delete_diary(diary.id).unwrap());
        let memories = db.list_clone_memories(diary.clone_id).unwrap();
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0].source_diary_id, None);
    }
}
