//! OpenAI-compatible API client: chat completions and audio transcription.

use reqwest::{Client, header};
use serde_json::Value;
use std::path::Path;

use crate::ai::types::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, Message, ResponseFormat,
    TranscriptionResponse,
};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_CHAT_MODEL: &str = "gpt-4";
const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Personality-extraction prompt: eight fixed categories, JSON output.
const ANALYSIS_PROMPT: &str = "You are an expert personality analyst. Analyze this person's diary \
entry and extract structured information.

DIARY:
{diary_text}

EXTRACT THE FOLLOWING:

1. EMOTIONS AND MOOD:
   - Dominant emotions (joy, sadness, anxiety, calm, anger, fear, etc.)
   - Emotion intensity (1-10)
   - Overall mood (positive/neutral/negative)

2. VALUES AND PRIORITIES:
   - What matters to this person (family, career, friendship, growth, money, health, etc.)
   - Priorities (what matters most)

3. INTERESTS AND HOBBIES:
   - What they are passionate about
   - What they love doing

4. COMMUNICATION STYLE:
   - Formality (formal/informal/mixed)
   - Use of humor (yes/no, what kind)
   - Sentence length (short/medium/long)
   - Emotional expressiveness

5. THINKING PATTERNS:
   - Analytical or intuitive
   - Optimist or pessimist
   - Detail-focused or big-picture

6. GOALS AND DREAMS:
   - Short-term goals
   - Long-term dreams

7. FEARS AND CONCERNS:
   - What they worry about
   - Which fears are mentioned

8. NEEDS AND OFFERS:
   - What they need (things, work, services)
   - What they offer (things, work, services)

RETURN THE ANSWER AS JSON.";

pub struct OpenAiClient {
    client: Client,
    auth_headers: header::HeaderMap,
    api_base: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, api_base: Option<&str>, model: Option<&str>) -> Result<Self, String> {
        let mut auth_headers = header::HeaderMap::new();
        let auth_value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| format!("Invalid API key format: {}", e))?;
        auth_headers.insert(header::AUTHORIZATION, auth_value);

        Ok(Self {
            client: crate::http::shared_client().clone(),
            auth_headers,
            api_base: api_base
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or(DEFAULT_CHAT_MODEL).to_string(),
        })
    }

    /// Model identifier, recorded as `analysis_version` on analyzed diaries.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single chat completion. At most one attempt; any failure (transport,
    /// non-2xx status, empty choices) is returned to the caller.
    pub async fn generate_text(
        &self,
        messages: Vec<Message>,
        temperature: f32,
    ) -> Result<String, String> {
        self.chat(messages, temperature, None).await
    }

    /// Extract the personality analysis document from diary text.
    pub async fn analyze_personality(&self, diary_text: &str) -> Result<Value, String> {
        let prompt = ANALYSIS_PROMPT.replace("{diary_text}", diary_text);
        let messages = vec![
            Message::system("You are an expert personality analyst. Always respond with valid JSON."),
            Message::user(prompt),
        ];
        let content = self
            .chat(messages, 0.3, Some(ResponseFormat::json_object()))
            .await?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Malformed analysis result: {} (content: {})", e, content))
    }

    /// Transcribe an audio file via the Whisper endpoint.
    pub async fn transcribe_audio(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<String, String> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| format!("Failed to read audio file: {}", e))?;
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        let mut form = reqwest::multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(file_name));
        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.api_base))
            .headers(self.auth_headers.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("Transcription request failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read transcription response: {}", e))?;
        if !status.is_success() {
            return Err(format_api_error("Transcription", status.as_u16(), &body));
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&body)
            .map_err(|e| format!("Unexpected transcription response: {}", e))?;
        Ok(parsed.text)
    }

    /// Guess a gender from a first name. Returns "male", "female" or
    /// "unknown"; collaborator failure propagates.
    pub async fn guess_gender(&self, name: &str) -> Result<String, String> {
        let messages = vec![
            Message::system(
                "Determine the likely gender from the given first name. \
                 Answer with exactly one word: male, female, or unknown.",
            ),
            Message::user(name),
        ];
        let guess = self.chat(messages, 0.1, None).await?.to_lowercase();
        Ok(normalize_gender(&guess))
    }

    async fn chat(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        response_format: Option<ResponseFormat>,
    ) -> Result<String, String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature,
            response_format,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .headers(self.auth_headers.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Completion request failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read completion response: {}", e))?;
        if !status.is_success() {
            return Err(format_api_error("Completion", status.as_u16(), &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| format!("Unexpected completion response: {}", e))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| "Completion response contained no choices".to_string())
    }
}

fn format_api_error(operation: &str, status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => format!("{} API error (HTTP {}): {}", operation, status, parsed.error.message),
        Err(_) => format!("{} API returned HTTP {}: {}", operation, status, body),
    }
}

/// "female" contains "male", so check it first.
pub(crate) fn normalize_gender(guess: &str) -> String {
    if guess.contains("female") {
        "female".to_string()
    } else if guess.contains("male") {
        "male".to_string()
    } else {
        "unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_gender;

    #[test]
    fn gender_normalization_checks_female_first() {
        assert_eq!(normalize_gender("female"), "female");
        assert_eq!(normalize_gender("male"), "male");
        assert_eq!(normalize_gender("the name is most likely female."), "female");
        assert_eq!(normalize_gender("no idea"), "unknown");
    }
}
