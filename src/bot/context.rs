//! Per-turn context — the inbound activity plus the reply path.
//!
//! Handlers never address replies themselves: [`TurnContext::send_text`]
//! builds the reply from the inbound activity and hands it to the sink,
//! so routing fields are set in exactly one place.

use std::sync::Arc;

use async_trait::async_trait;

use crate::activity::Activity;
use crate::error::ChannelError;

/// Delivers outbound activities to the conversation channel.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn send(&self, activity: Activity) -> Result<(), ChannelError>;
}

/// Everything one turn needs: the activity that started it and the sink
/// replies go out through.
pub struct TurnContext {
    activity: Activity,
    sink: Arc<dyn ActivitySink>,
}

impl TurnContext {
    pub fn new(activity: Activity, sink: Arc<dyn ActivitySink>) -> Self {
        Self { activity, sink }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Send a plain-text reply to the inbound activity.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), ChannelError> {
        self.sink.send(self.activity.build_reply(text)).await
    }
}
