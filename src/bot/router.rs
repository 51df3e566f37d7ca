//! Turn routing — decides what handles each inbound activity.
//!
//! Message turns go through a fixed precedence: resume the onboarding
//! dialog, else resume the knowledge-base sub-dialog, else dispatch on the
//! stored profile and the classified intent. Exactly one of those consumes
//! the message. Membership changes and unrecognized event types are
//! handled without touching state.

use std::sync::Arc;

use crate::activity::ActivityType;
use crate::bot::context::TurnContext;
use crate::bot::welcome;
use crate::dialogs::{OnboardingStep, QnaStep, UserProfile, qna};
use crate::error::{Error, Result, StoreError};
use crate::kb::KnowledgeBase;
use crate::nlu::IntentRecognizer;
use crate::state::{StateScope, Storage, storage_key};

const USER_SCOPE: &str = "user";
const DIALOG_SCOPE: &str = "dialog";
const QNA_DIALOG_SCOPE: &str = "qna_dialog";

const NO_HELP_TEXT: &str = "I don't know how to help.";
const TURN_ERROR_TEXT: &str = "Oops. Something went wrong!";

/// Routes inbound activities to dialogs, classification, or acknowledgment.
pub struct TurnRouter {
    storage: Arc<dyn Storage>,
    recognizer: Arc<dyn IntentRecognizer>,
    knowledge_base: Arc<dyn KnowledgeBase>,
}

impl TurnRouter {
    pub fn new(
        storage: Arc<dyn Storage>,
        recognizer: Arc<dyn IntentRecognizer>,
        knowledge_base: Arc<dyn KnowledgeBase>,
    ) -> Self {
        Self {
            storage,
            recognizer,
            knowledge_base,
        }
    }

    /// Handle one inbound activity end to end.
    pub async fn handle_turn(&self, ctx: &TurnContext) -> Result<()> {
        match &ctx.activity().kind {
            ActivityType::Message => self.handle_message(ctx).await,
            ActivityType::ConversationUpdate => {
                welcome::send_welcome(ctx).await?;
                Ok(())
            }
            ActivityType::Other(kind) => {
                ctx.send_text(format!("[{kind} event detected]")).await?;
                Ok(())
            }
        }
    }

    async fn handle_message(&self, ctx: &TurnContext) -> Result<()> {
        let activity = ctx.activity();
        let conversation_id = activity.conversation.id.as_str();
        let user_id = activity.from.id.as_str();
        let text = activity.text();

        let mut profile =
            StateScope::<UserProfile>::load(Arc::clone(&self.storage), USER_SCOPE, user_id)
                .await?;
        let mut dialog = StateScope::<Option<OnboardingStep>>::load(
            Arc::clone(&self.storage),
            DIALOG_SCOPE,
            conversation_id,
        )
        .await?;
        let mut qna_dialog = StateScope::<Option<QnaStep>>::load(
            Arc::clone(&self.storage),
            QNA_DIALOG_SCOPE,
            conversation_id,
        )
        .await?;

        let mut handled = false;
        if let Some(step) = *dialog.get() {
            tracing::debug!(conversation = %conversation_id, step = %step, "resuming onboarding dialog");
            let outcome = step.advance(text, profile.get_mut());
            dialog.set(outcome.next);
            handled = !outcome.replies.is_empty();
            for reply in outcome.replies {
                ctx.send_text(reply).await?;
            }
        }

        // The sub-dialog only sees the message when onboarding did not
        // reply; its cursor is untouched on onboarding turns.
        if !handled {
            if let Some(QnaStep::AwaitingQuestion) = *qna_dialog.get() {
                tracing::debug!(conversation = %conversation_id, "answering from the knowledge base");
                let answers = self.knowledge_base.lookup(text).await?;
                qna_dialog.set(None);
                ctx.send_text(qna::answer_reply(&answers)).await?;
                handled = true;
            }
        }

        if !handled {
            if profile.get().name.is_some() {
                let result = self.recognizer.classify(text).await?;
                tracing::debug!(
                    intent = %result.top_intent.name,
                    score = result.top_intent.score,
                    "classified message"
                );
                if result.is_none_intent() {
                    ctx.send_text(NO_HELP_TEXT).await?;
                } else if result.top_intent.name == "qna" {
                    let outcome = QnaStep::begin();
                    qna_dialog.set(outcome.next);
                    for reply in outcome.replies {
                        ctx.send_text(reply).await?;
                    }
                } else {
                    let intent = &result.top_intent;
                    ctx.send_text(format!(
                        "LUIS Top Scoring Intent: {}, Score: {}",
                        intent.name, intent.score
                    ))
                    .await?;
                }
            } else {
                // No name on record yet: onboarding starts, classification
                // never runs for this user.
                let outcome = OnboardingStep::begin();
                dialog.set(outcome.next);
                for reply in outcome.replies {
                    ctx.send_text(reply).await?;
                }
            }
        }

        // Message turns always flush; other turn types never reach here.
        profile.save_changes().await?;
        dialog.save_changes().await?;
        qna_dialog.save_changes().await?;
        Ok(())
    }

    /// Recovery after a failed turn: log, apologize, and drop this
    /// conversation's dialog cursors so the next message starts clean. The
    /// user profile survives.
    pub async fn on_turn_error(&self, ctx: &TurnContext, err: &Error) {
        tracing::error!(error = %err, "turn failed");

        if let Err(send_err) = ctx.send_text(TURN_ERROR_TEXT).await {
            tracing::error!(error = %send_err, "could not deliver the turn-error reply");
        }

        let conversation_id = &ctx.activity().conversation.id;
        if let Err(store_err) = self.clear_conversation_state(conversation_id).await {
            tracing::error!(error = %store_err, "could not clear conversation state");
        }
    }

    async fn clear_conversation_state(
        &self,
        conversation_id: &str,
    ) -> std::result::Result<(), StoreError> {
        let keys = [
            storage_key(DIALOG_SCOPE, conversation_id),
            storage_key(QNA_DIALOG_SCOPE, conversation_id),
        ];
        self.storage.delete(&keys).await
    }
}
