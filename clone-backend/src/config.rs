use std::env;

#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_endpoint: Option<String>,
    pub openai_model: Option<String>,
    pub telegram_bot_token: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: String,
    /// Optional ISO-639-1 hint passed to the transcription endpoint
    pub transcription_language: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set"),
            openai_endpoint: env::var("OPENAI_ENDPOINT").ok(),
            openai_model: env::var("OPENAI_MODEL").ok(),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN")
                .expect("TELEGRAM_BOT_TOKEN must be set"),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "./.db/clone.db".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            transcription_language: env::var("TRANSCRIPTION_LANGUAGE").ok(),
        }
    }
}
