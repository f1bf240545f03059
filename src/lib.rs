pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    ai_service::{AIService, LanguageModel},
    extract_service::ExtractService,
    log_service::{LogService, LogStore},
    quiz_service::QuizService,
    tutor_service::TutorService,
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: QuizService,
    pub tutor_service: TutorService,
    pub extract_service: ExtractService,
    pub log_service: LogService,
    pub allowed_origins: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder().build()?;
        let model: Arc<dyn LanguageModel> = Arc::new(AIService::new(config, http_client.clone()));
        Ok(Self::with_model(model, config, http_client))
    }

    /// Builds the state around an already constructed model client.
    pub fn with_model(model: Arc<dyn LanguageModel>, config: &Config, http_client: Client) -> Self {
        let log_store = config
            .log_store
            .as_ref()
            .map(|store| LogStore::new(store, http_client.clone()));

        Self {
            quiz_service: QuizService::new(model.clone()),
            tutor_service: TutorService::new(model),
            extract_service: ExtractService::new(http_client),
            log_service: LogService::new(log_store),
            allowed_origins: Arc::new(config.allowed_origins.clone()),
        }
    }
}
