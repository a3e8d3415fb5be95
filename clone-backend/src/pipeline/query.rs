//! Clone query pipeline: question in, in-character answer out.

use std::sync::Arc;

use crate::ai::{AiClient, Message};
use crate::db::Database;
use crate::error::ServiceError;
use crate::pipeline::prompt::build_clone_prompt;
use crate::pipeline::ranking::{TOP_MEMORY_COUNT, rank_memories};

/// Low-to-moderate randomness: in-character consistency over creativity.
const ANSWER_TEMPERATURE: f32 = 0.7;

pub struct QueryPipeline {
    db: Arc<Database>,
    ai: Arc<AiClient>,
}

impl QueryPipeline {
    pub fn new(db: Arc<Database>, ai: Arc<AiClient>) -> Self {
        Self { db, ai }
    }

    /// Answer `question` as the clone.
    ///
    /// Read-only against the memory store: usage counters are not touched.
    /// A missing clone fails before any external call is issued.
    pub async fn ask(&self, clone_id: i64, question: &str) -> Result<String, ServiceError> {
        let clone = self
            .db
            .get_clone(clone_id)?
            .ok_or_else(|| ServiceError::NotFound("Clone not found".to_string()))?;

        let memories = self.db.list_clone_memories(clone_id)?;
        let top_memories = rank_memories(&memories, TOP_MEMORY_COUNT);

        let system_prompt = build_clone_prompt(&clone.personality_profile, &top_memories);
        let messages = vec![Message::system(system_prompt), Message::user(question)];

        self.ai
            .generate_text(messages, ANSWER_TEMPERATURE)
            .await
            .map_err(ServiceError::Dependency)
    }
}
