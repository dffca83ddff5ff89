use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{ChatReply, ChatRequest},
    state::SharedState,
};

const MISSING_PROMPT: &str = "Missing prompt in request body";
const UNPARSEABLE_BODY: &str = "Request body must be a JSON object with a string \"prompt\" field";

/// Relay Endpoint. The body is parsed by hand so a missing Content-Type does
/// not turn into a 415.
pub async fn diagnose_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ChatReply>, AppError> {
    let request_id = Uuid::new_v4();

    async move {
        let payload = parse_request(&body)?;
        let prompt = payload.prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::BadRequest(MISSING_PROMPT.to_string()));
        }

        let reply = state.relay.diagnose(prompt).await?;
        Ok(Json(reply))
    }
    .instrument(info_span!("relay", %request_id))
    .await
}

/// Only a JSON object is a request. A missing or null `prompt` reads as empty;
/// any other non-string `prompt` is malformed.
fn parse_request(body: &[u8]) -> Result<ChatRequest, AppError> {
    let value: Value = serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "rejecting unparseable body");
        AppError::BadRequest(UNPARSEABLE_BODY.to_string())
    })?;

    let Value::Object(fields) = value else {
        debug!("rejecting non-object body");
        return Err(AppError::BadRequest(UNPARSEABLE_BODY.to_string()));
    };

    match fields.get("prompt") {
        None | Some(Value::Null) => Ok(ChatRequest::new("")),
        Some(Value::String(prompt)) => Ok(ChatRequest::new(prompt.as_str())),
        Some(_) => Err(AppError::BadRequest(UNPARSEABLE_BODY.to_string())),
    }
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
