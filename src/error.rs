use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::services::extract_service::FetchError;

pub type Result<T> = std::result::Result<T, Error>;

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const INVALID_QA_DATA: &str = "Invalid QA data format";
pub const MISSING_USER_MESSAGE: &str = "Missing or invalid user message";
pub const MISSING_URL: &str = "Missing or invalid url";
pub const EXTRACT_TEXT_ERROR: &str = "Error extracting text";
pub const FAILED_CHAT_RESPONSE: &str = "Failed to generate chat response";
pub const MISSING_ARTICLE_INPUT: &str = "Missing or invalid article input";
pub const FAILED_QA_GENERATION: &str = "Failed to generate Q&A list";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Extraction error: {0}")]
    Extraction(#[from] FetchError),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            Error::Body(rejection) => return rejection.into_response(),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            Error::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": METHOD_NOT_ALLOWED }),
            ),
            Error::Extraction(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": EXTRACT_TEXT_ERROR, "details": err.to_string() }),
            ),
            Error::Generation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": FAILED_QA_GENERATION }),
            ),
            Error::Chat(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": FAILED_CHAT_RESPONSE }),
            ),
            Error::Http(err) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": format!("External service error: {}", err) }),
            ),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "An unexpected error occurred" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
