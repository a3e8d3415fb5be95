pub mod ingest;
pub mod prompt;
pub mod query;
pub mod ranking;

pub use ingest::{DiaryIngestor, NewDiary};
pub use query::QueryPipeline;
pub use ranking::{TOP_MEMORY_COUNT, rank_memories};
