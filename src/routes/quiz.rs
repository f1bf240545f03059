use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::quiz_dto::{ChatRequest, ChatResponse, ExtractTextRequest, ExtractTextResponse, GenerateQuizRequest},
    error::{self, Error, Result},
    models::qa::QaRecord,
    services::extract_service::parse_page_url,
    utils::validation::validate,
    AppState,
};

/// An absent or undecodable body reads as `{}`; a body that could not be
/// buffered (over the size limit) is passed back as the rejection.
fn body_or_default<T: Default>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection @ JsonRejection::BytesRejection(_)) => Err(rejection.into()),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable request body");
            Ok(T::default())
        }
    }
}

#[axum::debug_handler]
pub async fn extract_text(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ExtractTextRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let payload = body_or_default(payload)?;
    let url = payload
        .url
        .as_deref()
        .and_then(parse_page_url)
        .ok_or_else(|| Error::Validation(error::MISSING_URL.to_string()))?;

    match state.extract_service.extract(&url).await {
        Ok(text) => Ok(Json(ExtractTextResponse { text })),
        Err(e) => {
            tracing::error!(%url, error = %e, "Text extraction failed");
            state.log_service.error(
                "Text extraction failed",
                Some(json!({ "url": url.as_str(), "details": e.to_string() })),
            );
            Err(e.into())
        }
    }
}

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let payload = body_or_default(payload)?;
    let article = match (payload.validate(), payload.article_input.as_deref()) {
        (Ok(()), Some(article)) => article,
        _ => return Err(Error::Validation(error::MISSING_ARTICLE_INPUT.to_string())),
    };

    match state.quiz_service.generate(article).await {
        Ok(list) => {
            state.log_service.info(
                "Quiz generated",
                Some(json!({ "qaCount": list.items.len() })),
            );
            Ok(Json(list))
        }
        Err(e) => {
            tracing::error!(error = %e, "Quiz generation failed");
            state.log_service.error(
                "Quiz generation failed",
                Some(json!({ "details": e.to_string() })),
            );
            Err(Error::Generation(e.to_string()))
        }
    }
}

#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let payload = body_or_default(payload)?;

    let record = payload
        .qa_data
        .and_then(|raw| serde_json::from_value::<QaRecord>(raw).ok())
        .filter(|record| validate(record).is_ok())
        .ok_or_else(|| Error::Validation(error::INVALID_QA_DATA.to_string()))?;

    let user_message = payload
        .user_message
        .as_ref()
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| Error::Validation(error::MISSING_USER_MESSAGE.to_string()))?;

    // Anything but a non-negative integer counts as no attempts yet.
    let attempt_count = payload
        .attempt_count
        .as_ref()
        .and_then(|n| n.as_u64())
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0);

    match state
        .tutor_service
        .reply(&record, user_message, attempt_count)
        .await
    {
        Ok(reply) => {
            state.log_service.info(
                "Chat response generated",
                Some(json!({ "question": reply.question, "attemptCount": reply.attempt_count })),
            );
            Ok(Json(ChatResponse {
                response: reply.response,
                attempt_count: reply.attempt_count,
                question: reply.question,
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, question = %record.question, "Chat generation failed");
            state.log_service.error(
                "Chat generation failed",
                Some(json!({ "question": record.question, "details": e.to_string() })),
            );
            Err(Error::Chat(e.to_string()))
        }
    }
}
