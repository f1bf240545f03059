use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractTextRequest {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    #[validate(required, length(min = 1))]
    pub article_input: Option<String>,
}

/// Fields stay untyped so a bad value in one never hides the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatRequest {
    pub qa_data: Option<JsonValue>,
    pub user_message: Option<JsonValue>,
    pub attempt_count: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub attempt_count: u32,
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_request_reads_camel_case_and_defaults_attempts() {
        let req: ChatRequest = serde_json::from_value(json!({
            "qaData": {"question": "Q"},
            "userMessage": "salut"
        }))
        .unwrap();
        assert_eq!(req.user_message, Some(json!("salut")));
        assert!(req.qa_data.is_some());
        assert!(req.attempt_count.is_none());
    }

    #[test]
    fn quiz_request_requires_non_empty_article() {
        let missing = GenerateQuizRequest::default();
        assert!(missing.validate().is_err());

        let empty = GenerateQuizRequest {
            article_input: Some(String::new()),
        };
        assert!(empty.validate().is_err());

        let ok: GenerateQuizRequest =
            serde_json::from_value(json!({"articleInput": "Texte"})).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn chat_response_uses_camel_case() {
        let body = serde_json::to_value(ChatResponse {
            response: "ok".into(),
            attempt_count: 4,
            question: "Q".into(),
        })
        .unwrap();
        assert_eq!(body["attemptCount"], 4);
    }
}
