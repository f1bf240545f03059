use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::config::LogStoreConfig;
use crate::models::log_event::{LogEvent, LogLevel};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("log store returned {status}: {body}")]
    Store { status: u16, body: String },

    #[error("log store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// PostgREST client for the `logs` table.
#[derive(Clone)]
pub struct LogStore {
    client: Client,
    endpoint: String,
    key: String,
}

impl LogStore {
    pub fn new(config: &LogStoreConfig, client: Client) -> Self {
        Self {
            client,
            endpoint: format!("{}/rest/v1/{}", config.url, config.table),
            key: config.key.clone(),
        }
    }

    pub async fn insert(&self, event: &LogEvent) -> Result<(), LoggingError> {
        let res = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Prefer", "return=minimal")
            .json(&[event])
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(LoggingError::Store { status, body });
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct LogService {
    store: Option<LogStore>,
}

impl LogService {
    pub fn new(store: Option<LogStore>) -> Self {
        if store.is_none() {
            tracing::info!("Log store disabled (SUPABASE_URL or SUPABASE_KEY not set)");
        }
        Self { store }
    }

    pub fn info(&self, message: &str, metadata: Option<JsonValue>) {
        self.dispatch(LogEvent::new(LogLevel::Info, message, metadata));
    }

    pub fn error(&self, message: &str, metadata: Option<JsonValue>) {
        self.dispatch(LogEvent::new(LogLevel::Error, message, metadata));
    }

    /// Hands the event to a detached task; the caller never waits on the store.
    pub fn dispatch(&self, event: LogEvent) {
        let Some(store) = self.store.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(e) = store.insert(&event).await {
                tracing::warn!(error = %e, message = %event.message, "Failed to write log event");
            }
        });
    }
}
