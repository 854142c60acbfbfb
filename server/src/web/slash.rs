use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use tracing::warn;

use super::app_state::AppState;
use crate::relay::SlashCommand;

/// Slash command callback. Slack expects a 200 with plain text no matter what,
/// so form errors are reported in the body rather than the status.
pub async fn slash_command(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SlashCommand>, FormRejection>,
) -> String {
    match form {
        Ok(Form(command)) => state.relay.respond(command).await,
        Err(rejection) => {
            warn!(code = "parse_error", error = %rejection, "Failed to parse slash command");
            rejection.body_text()
        }
    }
}
