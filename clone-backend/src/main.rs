use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod ai;
mod config;
mod controllers;
mod db;
mod error;
mod http;
mod models;
mod pipeline;
mod security;

use ai::{AiClient, OpenAiClient};
use config::Config;
use db::Database;
use pipeline::{DiaryIngestor, QueryPipeline};

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    pub ai: Arc<AiClient>,
    pub ingestor: Arc<DiaryIngestor>,
    pub query: Arc<QueryPipeline>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    let openai = OpenAiClient::new(
        &config.openai_api_key,
        config.openai_endpoint.as_deref(),
        config.openai_model.as_deref(),
    )
    .expect("Failed to initialize OpenAI client");
    let ai = Arc::new(AiClient::OpenAi(openai));
    log::info!("Using chat model {}", ai.model_version());

    let ingestor = Arc::new(DiaryIngestor::new(
        db.clone(),
        ai.clone(),
        config.transcription_language.clone(),
    ));
    let query = Arc::new(QueryPipeline::new(db.clone(), ai.clone()));

    log::info!("Starting clone backend on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                config: config.clone(),
                ai: Arc::clone(&ai),
                ingestor: Arc::clone(&ingestor),
                query: Arc::clone(&query),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::onboarding::config)
            .configure(controllers::profile::config)
            .configure(controllers::diaries::config)
            .configure(controllers::clone::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
