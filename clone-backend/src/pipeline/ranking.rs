//! Memory ranking: fixed-size top-k select by importance.

use crate::models::CloneMemory;

/// How many memories condition a clone answer.
pub const TOP_MEMORY_COUNT: usize = 10;

/// Select the `k` highest-importance memories.
///
/// Deterministic for any fixed input set: ties on importance break by
/// creation time ascending, then id ascending. Prompt content (and thus
/// answer reproducibility under a fixed completion backend) depends on
/// this order being stable.
pub fn rank_memories(memories: &[CloneMemory], k: usize) -> Vec<CloneMemory> {
    let mut ranked = memories.to_vec();
    ranked.sort_by(|a, b| {
        b.importance_score
            .total_cmp(&a.importance_score)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemoryType;
    use chrono::{Duration, Utc};

    fn memory(id: i64, importance: f64, age_minutes: i64) -> CloneMemory {
        let created_at = Utc::now() - Duration::minutes(age_minutes);
        CloneMemory {
            id,
            clone_id: 1,
            source_diary_id: None,
            memory_type: MemoryType::Fact,
            memory_content: format!("memory {}", id),
            memory_context: None,
            importance_score: importance,
            confidence_score: 0.5,
            usage_count: 0,
            last_used_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn returns_at_most_k_sorted_by_importance_desc() {
        let memories: Vec<_> = (0..25)
            .map(|i| memory(i, i as f64 / 25.0, 0))
            .collect();

        let ranked = rank_memories(&memories, TOP_MEMORY_COUNT);
        assert_eq!(ranked.len(), TOP_MEMORY_COUNT);
        for pair in ranked.windows(2) {
            assert!(pair[0].importance_score >= pair[1].importance_score);
        }
        assert_eq!(ranked[0].id, 24);
    }

    #[test]
    fn returns_all_when_fewer_than_k() {
        let memories = vec![memory(1, 0.9, 0), memory(2, 0.1, 0)];
        let ranked = rank_memories(&memories, TOP_MEMORY_COUNT);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(rank_memories(&[], TOP_MEMORY_COUNT).is_empty());
    }

    #[test]
    fn ties_break_by_created_at_then_id() {
        // Same importance: older first, then smaller id
        let old = memory(5, 0.5, 60);
        let newer_small_id = memory(1, 0.5, 10);
        let newer_big_id = memory(9, 0.5, 10);

        let memories = vec![newer_big_id.clone(), old.clone(), newer_small_id.clone()];
        let ranked = rank_memories(&memories, 3);
        let ids: Vec<i64> = ranked.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![5, 1, 9]);

        // Deterministic regardless of input order
        let shuffled = vec![newer_small_id, newer_big_id, old];
        let ranked_again = rank_memories(&shuffled, 3);
        let ids_again: Vec<i64> = ranked_again.iter().map(|m| m.id).collect();
        assert_eq!(ids, ids_again);
    }
}
