//! Intent recognition — labels a user message with its purpose.
//!
//! The bot never does its own language understanding; a hosted classifier
//! behind [`IntentRecognizer`] assigns a named intent with a confidence
//! score, and the router branches on the name alone.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::NluError;

pub mod luis;

pub use luis::LuisClient;

/// A classifier-assigned label with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    pub score: f32,
}

/// Classification result for one utterance. Only the top-scoring intent is
/// carried; the runner-ups are never inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentResult {
    pub top_intent: Intent,
}

impl IntentResult {
    /// Whether the classifier found no usable intent. The hosted service
    /// reports the reserved intent as `"None"`; matching is case-insensitive.
    pub fn is_none_intent(&self) -> bool {
        self.top_intent.name.eq_ignore_ascii_case("none")
    }
}

/// Classifies an utterance into its top-scoring intent.
#[async_trait]
pub trait IntentRecognizer: Send + Sync {
    async fn classify(&self, utterance: &str) -> Result<IntentResult, NluError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_intent_matches_case_insensitively() {
        for name in ["None", "none", "NONE"] {
            let result = IntentResult {
                top_intent: Intent { name: name.to_string(), score: 0.2 },
            };
            assert!(result.is_none_intent(), "intent {name:?}");
        }
    }

    #[test]
    fn named_intents_are_not_none() {
        for name in ["qna", "Greeting", "nonessential"] {
            let result = IntentResult {
                top_intent: Intent { name: name.to_string(), score: 0.9 },
            };
            assert!(!result.is_none_intent(), "intent {name:?}");
        }
    }
}
