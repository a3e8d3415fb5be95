//! Clone memory database operations (clone_memories)

use chrono::Utc;
use rusqlite::{OptionalExtension, Result as SqliteResult};

use super::users::parse_ts;
use crate::db::Database;
use crate::models::{CloneMemory, CreateMemoryRequest, MemoryType};

const MEMORY_COLUMNS: &str = "id, clone_id, source_diary_id, memory_type, memory_content,
     memory_context, importance_score, confidence_score, usage_count, last_used_at,
     created_at, updated_at";

impl Database {
    /// Insert one memory into a clone's store. Scores are clamped to [0, 1].
    pub fn create_memory(
        &self,
        clone_id: i64,
        request: &CreateMemoryRequest,
    ) -> SqliteResult<CloneMemory> {
        let conn = self.conn();
        let now = Utc::now();
        let now_str = now.to_rfc3339();
        let importance = request.importance_score.clamp(0.0, 1.0);
        let confidence = request.confidence_score.clamp(0.0, 1.0);

        conn.execute(
            "INSERT INTO clone_memories (clone_id, source_diary_id, memory_type, memory_content,
                                         memory_context, importance_score, confidence_score,
                                         created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            rusqlite::params![
                clone_id,
                request.source_diary_id,
                request.memory_type.as_str(),
                &request.memory_content,
                request.memory_context.as_deref(),
                importance,
                confidence,
                &now_str,
            ],
        )?;

        Ok(CloneMemory {
            id: conn.last_insert_rowid(),
            clone_id,
            source_diary_id: request.source_diary_id,
            memory_type: request.memory_type,
            memory_content: request.memory_content.clone(),
            memory_context: request.memory_context.clone(),
            importance_score: importance,
            confidence_score: confidence,
            usage_count: 0,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// All memories owned by a clone, in insertion order. Ranking happens
    /// in the query pipeline, not here.
    pub fn list_clone_memories(&self, clone_id: i64) -> SqliteResult<Vec<CloneMemory>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM clone_memories WHERE clone_id = ?1 ORDER BY id ASC",
            MEMORY_COLUMNS
        ))?;

        let memories = stmt
            .query_map([clone_id], |row| Self::row_to_memory(row))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(memories)
    }

    pub fn get_memory(&self, id: i64) -> SqliteResult<Option<CloneMemory>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {} FROM clone_memories WHERE id = ?1", MEMORY_COLUMNS),
            [id],
            |row| Self::row_to_memory(row),
        )
        .optional()
    }

    fn row_to_memory(row: &rusqlite::Row) -> rusqlite::Result<CloneMemory> {
        let type_str: String = row.get(3)?;
        let last_used_at_str: Option<String> = row.get(9)?;
        let created_at_str: String = row.get(10)?;
        let updated_at_str: String = row.get(11)?;

        Ok(CloneMemory {
            id: row.get(0)?,
            clone_id: row.get(1)?,
            source_diary_id: row.get(2)?,
            memory_type: MemoryType::from_str(&type_str).unwrap_or(MemoryType::Fact),
            memory_content: row.get(4)?,
            memory_context: row.get(5)?,
            importance_score: row.get(6)?,
            confidence_score: row.get(7)?,
            usage_count: row.get(8)?,
            last_used_at: last_used_at_str.map(|s| parse_ts(&s)),
            created_at: parse_ts(&created_at_str),
            updated_at: parse_ts(&updated_at_str),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use crate::models::{CreateMemoryRequest, MemoryType};

    fn request(content: &str, importance: f64) -> CreateMemoryRequest {
        CreateMemoryRequest {
            source_diary_id: None,
            memory_type: MemoryType::Fact,
            memory_content: content.to_string(),
            memory_context: None,
            importance_score: importance,
            confidence_score: 0.5,
        }
    }

    #[test]
    fn scores_are_clamped_to_unit_interval() {
        let db = Database::new(":memory:").expect("in-memory db");
        let user = db.get_or_create_user(1).unwrap();
        let diary = db.create_diary(user.id, "x", None).unwrap();

        let memory = db.create_memory(diary.clone_id, &request("a", 1.5)).unwrap();
        assert_eq!(memory.importance_score, 1.0);

        let memory = db.create_memory(diary.clone_id, &request("b", -0.2)).unwrap();
        assert_eq!(memory.importance_score, 0.0);
    }

    #[test]
    fn list_returns_only_this_clones_memories() {
        let db = Database::new(":memory:").expect("in-memory db");
        let user_a = db.get_or_create_user(1).unwrap();
        let user_b = db.get_or_create_user(2).unwrap();
        let diary_a = db.create_diary(user_a.id, "x", None).unwrap();
        let diary_b = db.create_diary(user_b.id, "y", None).unwrap();

        db.create_memory(diary_a.clone_id, &request("a1", 0.5)).unwrap();
        db.create_memory(diary_a.clone_id, &request("a2", 0.5)).unwrap();
        db.create_memory(diary_b.clone_id, &request("b1", 0.5)).unwrap();

        assert_eq!(db.list_clone_memories(diary_a.clone_id).unwrap().len(), 2);
        assert_eq!(db.list_clone_memories(diary_b.clone_id).unwrap().len(), 1);
    }
}
