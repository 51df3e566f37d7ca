//! Knowledge-base sub-dialog — a two-step waterfall.
//!
//! Step one announces that the bot is answering from its knowledge base and
//! waits for the question. Step two is driven by the router: it runs the
//! (effectful) lookup and picks the reply with [`answer_reply`]; the dialog
//! ends unconditionally after that, whatever the lookup returned.

use serde::{Deserialize, Serialize};

use crate::kb::RankedAnswer;

const KB_LEAD_IN: &str = "I'm now answering with information in my KB.";
const NO_ANSWER: &str = "I don't know how to answer your question.";

/// Where the sub-dialog is waiting for input. One waiting position only;
/// `None` as the persisted cursor means the sub-dialog is not in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QnaStep {
    AwaitingQuestion,
}

impl std::fmt::Display for QnaStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingQuestion => write!(f, "awaiting_question"),
        }
    }
}

/// Result of starting the sub-dialog: the cursor to persist and the replies
/// to deliver.
#[derive(Debug, PartialEq)]
pub struct QnaOutcome {
    pub next: Option<QnaStep>,
    pub replies: Vec<String>,
}

impl QnaStep {
    /// Start the sub-dialog: send the lead-in and wait for the question.
    pub fn begin() -> QnaOutcome {
        QnaOutcome {
            next: Some(Self::AwaitingQuestion),
            replies: vec![KB_LEAD_IN.to_string()],
        }
    }
}

/// Reply for a ranked answer list: the top-ranked answer's text verbatim,
/// or the fallback when the knowledge base had nothing.
///
/// The caller's ordering is trusted; the first element is the top answer.
pub fn answer_reply(answers: &[RankedAnswer]) -> String {
    answers
        .first()
        .map(|answer| answer.text.clone())
        .unwrap_or_else(|| NO_ANSWER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_announces_and_waits_for_the_question() {
        let outcome = QnaStep::begin();
        assert_eq!(outcome.next, Some(QnaStep::AwaitingQuestion));
        assert_eq!(outcome.replies, vec!["I'm now answering with information in my KB."]);
    }

    #[test]
    fn top_answer_is_sent_verbatim() {
        let answers = vec![
            RankedAnswer { text: "Press the red button.".to_string(), score: 0.92 },
            RankedAnswer { text: "Try turning it off.".to_string(), score: 0.41 },
        ];
        assert_eq!(answer_reply(&answers), "Press the red button.");
    }

    #[test]
    fn first_element_wins_regardless_of_score() {
        // The service returns answers ranked; ordering is not re-derived here.
        let answers = vec![
            RankedAnswer { text: "first".to_string(), score: 0.10 },
            RankedAnswer { text: "second".to_string(), score: 0.99 },
        ];
        assert_eq!(answer_reply(&answers), "first");
    }

    #[test]
    fn empty_result_falls_back() {
        assert_eq!(answer_reply(&[]), "I don't know how to answer your question.");
    }

    #[test]
    fn cursor_roundtrips_through_storage_form() {
        let json = serde_json::to_value(Some(QnaStep::AwaitingQuestion)).unwrap();
        assert_eq!(json, serde_json::json!("awaiting_question"));
        let parsed: Option<QnaStep> = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, Some(QnaStep::AwaitingQuestion));
    }
}
