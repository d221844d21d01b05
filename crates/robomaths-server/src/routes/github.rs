//! GitHub write proxy
//!
//! Accepts the site's save-file requests and forwards them upstream with
//! the server-held token. The upstream status and body pass through
//! verbatim.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    AppState,
    error::{ApiError, Result},
    github::GithubClient,
};

/// Supported proxy actions. `saveFile` is the only one; everything else is
/// rejected with a client error before any upstream call.
#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
pub enum GithubRequest {
    #[serde(rename = "saveFile")]
    SaveFile(SaveFileRequest),
}

#[derive(Debug, Deserialize)]
pub struct SaveFileRequest {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub content: String,
    #[serde(default)]
    pub message: Option<String>,
}

pub async fn handle(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Response> {
    if body.get("action").and_then(Value::as_str) != Some("saveFile") {
        return Err(ApiError::UnsupportedAction);
    }

    let GithubRequest::SaveFile(request) =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // Token check comes before any network call
    let token = state.config.github_token.as_deref().ok_or(ApiError::MissingToken)?;

    debug!(
        owner = %request.owner,
        repo = %request.repo,
        path = %request.path,
        "forwarding saveFile"
    );

    let client = GithubClient::new(token)?;
    let (status, upstream) = client
        .save_file(
            &request.owner,
            &request.repo,
            &request.path,
            &request.content,
            request.message.as_deref(),
        )
        .await?;

    Ok((status, Json(upstream)).into_response())
}
