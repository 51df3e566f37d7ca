//! Conversation event envelope.
//!
//! The webhook receives provider-formatted activities: plain messages,
//! membership changes, and a long tail of other event types the bot only
//! acknowledges. Replies are activities too, addressed back through the
//! same conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of conversation event, with the raw type string preserved for
/// anything the bot does not handle specially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    /// A user (or bot) message.
    Message,
    /// Conversation membership changed — members joined or left.
    ConversationUpdate,
    /// Any other event type, kept verbatim.
    Other(String),
}

impl From<String> for ActivityType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "message" => Self::Message,
            "conversationUpdate" => Self::ConversationUpdate,
            _ => Self::Other(raw),
        }
    }
}

impl From<ActivityType> for String {
    fn from(kind: ActivityType) -> Self {
        match kind {
            ActivityType::Message => "message".to_string(),
            ActivityType::ConversationUpdate => "conversationUpdate".to_string(),
            ActivityType::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message => write!(f, "message"),
            Self::ConversationUpdate => write!(f, "conversationUpdate"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// A participant in a conversation (user or bot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The conversation an activity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationAccount {
    pub id: String,
}

/// One conversation event, inbound or outbound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    /// Channel-assigned id. Absent on replies until the channel assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Callback base URL for delivering replies to this conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    pub from: ChannelAccount,
    pub recipient: ChannelAccount,
    pub conversation: ConversationAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Participants added, present on membership-change events.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_added: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
}

impl Activity {
    /// Message text, empty when the activity carries none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Build a plain-text reply to this activity.
    ///
    /// Sender and recipient swap (the bot was the recipient of the inbound
    /// event), conversation routing is copied through, and the inbound id
    /// becomes the reply target.
    pub fn build_reply(&self, text: impl Into<String>) -> Activity {
        Activity {
            kind: ActivityType::Message,
            id: None,
            timestamp: Some(Utc::now()),
            channel_id: self.channel_id.clone(),
            service_url: self.service_url.clone(),
            from: self.recipient.clone(),
            recipient: self.from.clone(),
            conversation: self.conversation.clone(),
            text: Some(text.into()),
            members_added: Vec::new(),
            reply_to_id: self.id.clone(),
        }
    }
}
