pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::{
    attempt_service::AttemptService, generator_service::GeneratorService,
    question_service::QuestionService, quiz_service::QuizService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub quiz_service: QuizService,
    pub question_service: QuestionService,
    pub attempt_service: AttemptService,
    pub generator_service: GeneratorService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap();

        let quiz_service = QuizService::new(pool.clone());
        let question_service = QuestionService::new(pool.clone());
        let attempt_service = AttemptService::new(pool.clone());
        let generator_service = GeneratorService::new(
            config.generator_url.clone(),
            config.generator_api_key.clone(),
            http_client,
        );

        Self {
            pool,
            quiz_service,
            question_service,
            attempt_service,
            generator_service,
        }
    }
}
