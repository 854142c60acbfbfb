use serde::Deserialize;

/// Form fields Slack posts for a slash command invocation.
///
/// Every field is optional at the parsing layer; the relay decides which ones
/// it cannot do without. Fields Slack adds beyond these are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashCommand {
    /// Shared verification token.
    pub token: Option<String>,
    pub team_id: Option<String>,
    pub channel_id: Option<String>,
    pub channel_name: Option<String>,
    pub user_id: Option<String>,
    /// Real name of the invoking user.
    pub user_name: Option<String>,
    /// The command itself, e.g. `/whisper`.
    pub command: Option<String>,
    /// Everything typed after the command.
    pub text: Option<String>,
}
