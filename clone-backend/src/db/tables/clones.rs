//! Clone database operations (clones)

use rusqlite::{OptionalExtension, Result as SqliteResult};
use serde_json::Value;

use super::users::parse_ts;
use crate::db::Database;
use crate::models::{CloneRecord, CloneStatus, TrainingStage};

const CLONE_COLUMNS: &str = "id, user_id, personality_profile, accuracy_score, diaries_count,
     total_words_analyzed, last_diary_at, status, training_stage, created_at, updated_at";

impl Database {
    pub fn get_clone(&self, id: i64) -> SqliteResult<Option<CloneRecord>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {} FROM clones WHERE id = ?1", CLONE_COLUMNS),
            [id],
            |row| Self::row_to_clone(row),
        )
        .optional()
    }

    /// A user owns at most one clone.
    pub fn get_clone_for_user(&self, user_id: i64) -> SqliteResult<Option<CloneRecord>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {} FROM clones WHERE user_id = ?1", CLONE_COLUMNS),
            [user_id],
            |row| Self::row_to_clone(row),
        )
        .optional()
    }

    pub(crate) fn row_to_clone(row: &rusqlite::Row) -> rusqlite::Result<CloneRecord> {
        let profile_str: String = row.get(2)?;
        let last_diary_at_str: Option<String> = row.get(6)?;
        let status_str: String = row.get(7)?;
        let stage_str: String = row.get(8)?;
        let created_at_str: String = row.get(9)?;
        let updated_at_str: String = row.get(10)?;

        Ok(CloneRecord {
            id: row.get(0)?,
            user_id: row.get(1)?,
            personality_profile: serde_json::from_str::<Value>(&profile_str)
                .unwrap_or_else(|_| serde_json::json!({})),
            accuracy_score: row.get(3)?,
            diaries_count: row.get(4)?,
            total_words_analyzed: row.get(5)?,
            last_diary_at: last_diary_at_str.map(|s| parse_ts(&s)),
            status: CloneStatus::from_str(&status_str).unwrap_or(CloneStatus::Creating),
            training_stage: TrainingStage::from_str(&stage_str).unwrap_or(TrainingStage::Initial),
            created_at: parse_ts(&created_at_str),
            updated_at: parse_ts(&updated_at_str),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use crate::models::CloneStatus;

    #[test]
    fn no_clone_until_first_diary() {
        let db = Database::new(":memory:").expect("in-memory db");
        let user = db.get_or_create_user(1).unwrap();
        assert!(db.get_clone_for_user(user.id).unwrap().is_none());

        db.create_diary(user.id, "hello world", None).unwrap();
        let clone = db.get_clone_for_user(user.id).unwrap().unwrap();
        assert_eq!(clone.status, CloneStatus::Creating);
        assert_eq!(clone.personality_profile, serde_json::json!({}));
    }
}
