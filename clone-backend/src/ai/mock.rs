//! Queued mock AI client for tests.
//!
//! Each operation pops from its own FIFO queue of pre-configured results
//! and records call counts, so tests can assert exactly how many external
//! calls a pipeline issued.

use serde_json::Value;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ai::types::Message;

#[derive(Default)]
pub struct MockAiClient {
    completions: Mutex<VecDeque<Result<String, String>>>,
    analyses: Mutex<VecDeque<Result<Value, String>>>,
    transcriptions: Mutex<VecDeque<Result<String, String>>>,
    completion_calls: AtomicUsize,
    last_messages: Mutex<Option<Vec<Message>>>,
}

impl MockAiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_completion(&self, result: Result<String, String>) {
        self.completions.lock().unwrap().push_back(result);
    }

    pub fn queue_analysis(&self, result: Result<Value, String>) {
        self.analyses.lock().unwrap().push_back(result);
    }

    pub fn queue_transcription(&self, result: Result<String, String>) {
        self.transcriptions.lock().unwrap().push_back(result);
    }

    /// Number of completion calls issued so far.
    pub fn completion_calls(&self) -> usize {
        self.completion_calls.load(Ordering::SeqCst)
    }

    /// Messages passed to the most recent completion call.
    pub fn last_messages(&self) -> Option<Vec<Message>> {
        self.last_messages.lock().unwrap().clone()
    }

    pub(crate) async fn generate_text(
        &self,
        messages: Vec<Message>,
        _temperature: f32,
    ) -> Result<String, String> {
        self.completion_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = Some(messages);
        self.completions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("MockAiClient: no queued completion".to_string()))
    }

    pub(crate) async fn analyze_personality(&self, _diary_text: &str) -> Result<Value, String> {
        self.analyses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("MockAiClient: no queued analysis".to_string()))
    }

    pub(crate) async fn transcribe_audio(
        &self,
        _audio_path: &Path,
        _language: Option<&str>,
    ) -> Result<String, String> {
        self.transcriptions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("MockAiClient: no queued transcription".to_string()))
    }
}
