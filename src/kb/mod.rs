//! Knowledge-base lookup — curated question/answer search.
//!
//! Search and ranking live in a hosted service behind [`KnowledgeBase`];
//! the bot only forwards the question and consumes the top-ranked answer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::KbError;

pub mod qna_maker;

pub use qna_maker::QnaMakerClient;

/// One ranked answer from the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAnswer {
    pub text: String,
    pub score: f32,
}

/// Searches the knowledge base for answers to a question, best first.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn lookup(&self, question: &str) -> Result<Vec<RankedAnswer>, KbError>;
}
