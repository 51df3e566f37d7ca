//! Greets members who join the conversation.

use futures::future::join_all;

use crate::bot::context::TurnContext;
use crate::error::ChannelError;

const WELCOME_TEXT: &str = "Welcome!";

/// Send a welcome to every member a membership-change event added, except
/// the bot itself (the bot is the recipient of every channel event, its own
/// join included). Sends run concurrently; the turn waits for all of them.
pub async fn send_welcome(ctx: &TurnContext) -> Result<(), ChannelError> {
    let activity = ctx.activity();
    let sends = activity
        .members_added
        .iter()
        .filter(|member| member.id != activity.recipient.id)
        .map(|_| ctx.send_text(WELCOME_TEXT));

    for result in join_all(sends).await {
        result?;
    }
    Ok(())
}
