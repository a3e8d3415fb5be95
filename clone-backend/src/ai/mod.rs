pub mod mock;
pub mod openai;
pub mod types;

pub use mock::MockAiClient;
pub use openai::OpenAiClient;
pub use types::{Message, MessageRole};

use serde_json::Value;
use std::path::Path;

/// Unified AI client over the configured backend.
///
/// All operations are single-attempt: there are no retries, and every
/// failure is reported as a plain message for the caller to classify.
pub enum AiClient {
    OpenAi(OpenAiClient),
    Mock(MockAiClient),
}

impl AiClient {
    pub async fn generate_text(
        &self,
        messages: Vec<Message>,
        temperature: f32,
    ) -> Result<String, String> {
        match self {
            AiClient::OpenAi(client) => client.generate_text(messages, temperature).await,
            AiClient::Mock(client) => client.generate_text(messages, temperature).await,
        }
    }

    pub async fn analyze_personality(&self, diary_text: &str) -> Result<Value, String> {
        match self {
            AiClient::OpenAi(client) => client.analyze_personality(diary_text).await,
            AiClient::Mock(client) => client.analyze_personality(diary_text).await,
        }
    }

    pub async fn transcribe_audio(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<String, String> {
        match self {
            AiClient::OpenAi(client) => client.transcribe_audio(audio_path, language).await,
            AiClient::Mock(client) => client.transcribe_audio(audio_path, language).await,
        }
    }

    pub async fn guess_gender(&self, name: &str) -> Result<String, String> {
        match self {
            AiClient::OpenAi(client) => client.guess_gender(name).await,
            AiClient::Mock(client) => {
                let guess = client.generate_text(vec![Message::user(name)], 0.1).await?;
                Ok(openai::normalize_gender(&guess.to_lowercase()))
            }
        }
    }

    /// Identifier recorded as `analysis_version` on analyzed diaries.
    pub fn model_version(&self) -> String {
        match self {
            AiClient::OpenAi(client) => client.model().to_string(),
            AiClient::Mock(_) => "mock".to_string(),
        }
    }
}
