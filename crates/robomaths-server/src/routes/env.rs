//! Public runtime configuration endpoint

use axum::{Json, extract::State};
use robomaths::PublicConfig;

use crate::AppState;

/// Expose the publishable configuration values to the browser.
///
/// Unset values are served as empty strings. Only publishable values are
/// eligible here; the GitHub token never transits through this endpoint.
pub async fn public_env(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(PublicConfig {
        supabase_url: state.config.supabase_url.clone().unwrap_or_default(),
        supabase_key: state.config.supabase_key.clone().unwrap_or_default(),
    })
}
