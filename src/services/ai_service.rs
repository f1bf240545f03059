use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::config::Config;

/// Named JSON schema sent to the provider as the required response shape.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: &'static str,
    pub schema: JsonValue,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("model provider returned an invalid payload: {0}")]
    InvalidPayload(String),

    #[error("model output failed schema validation: {0:?}")]
    SchemaViolation(Vec<String>),

    #[error("model provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Black-box completion service. Handlers only ever talk to this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Free-text completion for a single prompt.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;

    /// Completion constrained to `schema`; returns the reply parsed as JSON
    /// but not yet validated against the schema.
    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<JsonValue, ModelError>;
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    reasoning_effort: Option<String>,
}

impl AIService {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
            reasoning_effort: config.openai_reasoning_effort.clone(),
        }
    }

    fn payload(&self, prompt: &str) -> JsonValue {
        let mut payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });
        if let Some(effort) = &self.reasoning_effort {
            payload["reasoning_effort"] = JsonValue::String(effort.clone());
        }
        payload
    }

    async fn chat_openai(&self, payload: JsonValue) -> Result<String, ModelError> {
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ModelError::Provider { status, body });
        }

        let body: JsonValue = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| ModelError::InvalidPayload("missing choices[0].message.content".into()))
    }
}

#[async_trait]
impl LanguageModel for AIService {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending completion request");
        self.chat_openai(self.payload(prompt)).await
    }

    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<JsonValue, ModelError> {
        let mut payload = self.payload(prompt);
        payload["response_format"] = serde_json::json!({
            "type": "json_schema",
            "json_schema": {
                "name": schema.name,
                "strict": true,
                "schema": schema.schema,
            }
        });

        tracing::debug!(model = %self.model, schema = schema.name, "Sending structured completion request");
        let content = self.chat_openai(payload).await?;
        serde_json::from_str(&content).map_err(|e| ModelError::InvalidPayload(e.to_string()))
    }
}
