use serde::{Serialize, Serializer};

use crate::roster::Disguise;

/// Payload posted to the Slack incoming webhook.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    /// Display name the message appears under.
    pub username: String,
    pub channel: String,
    #[serde(serialize_with = "python_bool")]
    pub as_user: bool,
    pub icon_url: String,
    #[serde(serialize_with = "numeric_bool")]
    pub link_names: bool,
}

impl OutboundMessage {
    /// Message posted by the disguise's bot identity, with @-mentions linked.
    pub fn disguised(
        text: impl Into<String>,
        disguise: &Disguise,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            username: disguise.name.clone(),
            channel: channel.into(),
            as_user: false,
            icon_url: disguise.icon_url.clone(),
            link_names: true,
        }
    }
}

// The webhook accepts flags as strings: "True"/"False" and "1"/"0".
fn python_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

fn numeric_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "1" } else { "0" })
}
