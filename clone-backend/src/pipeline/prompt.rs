//! Clone answer prompt composition.
//!
//! The system prompt is a pure function of the personality profile and
//! the ordered memory list — no timestamps, no randomness — so a fixed
//! (profile, memories, question) triple always produces the same request.

use serde_json::Value;

use crate::models::CloneMemory;

pub fn build_clone_prompt(profile: &Value, memories: &[CloneMemory]) -> String {
    let profile_text =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string());

    let memories_text = memories
        .iter()
        .map(|m| format!("- {}", m.memory_content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an AI clone of a specific user. Your task is to talk and think like that person.

PERSONALITY PROFILE:
{profile_text}

KEY FACTS ABOUT THE USER:
{memories_text}

COMMUNICATION STYLE:
- Use the words and phrases the user uses
- Mirror their emotional patterns
- Think the way they think
- React the way they react

REMEMBER:
- You are not just imitating; you understand their values and motivations
- Use concrete facts from their life
- Stay consistent in character"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemoryType;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn memory(id: i64, content: &str) -> CloneMemory {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        CloneMemory {
            id,
            clone_id: 1,
            source_diary_id: None,
            memory_type: MemoryType::Fact,
            memory_content: content.to_string(),
            memory_context: None,
            importance_score: 0.5,
            confidence_score: 0.5,
            usage_count: 0,
            last_used_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn prompt_is_deterministic_for_fixed_inputs() {
        let profile = json!({"values": ["family"], "humor": "dry"});
        let memories = vec![memory(1, "works as a teacher"), memory(2, "afraid of heights")];

        let a = build_clone_prompt(&profile, &memories);
        let b = build_clone_prompt(&profile, &memories);
        assert_eq!(a, b);
        assert!(a.contains("- works as a teacher\n- afraid of heights"));
        assert!(a.contains("\"dry\""));
    }

    #[test]
    fn memory_order_is_preserved_verbatim() {
        let profile = json!({});
        let forward = build_clone_prompt(&profile, &[memory(1, "a"), memory(2, "b")]);
        let reversed = build_clone_prompt(&profile, &[memory(2, "b"), memory(1, "a")]);
        assert_ne!(forward, reversed);
    }

    #[test]
    fn empty_memory_set_still_produces_a_prompt() {
        let prompt = build_clone_prompt(&json!({}), &[]);
        assert!(prompt.contains("KEY FACTS ABOUT THE USER:\n\n"));
        assert!(prompt.contains("PERSONALITY PROFILE:\n{}"));
    }
}
