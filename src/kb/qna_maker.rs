//! Hosted knowledge-base endpoint client (QnA Maker generateAnswer API).

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::QnaConfig;
use crate::error::KbError;
use crate::kb::{KnowledgeBase, RankedAnswer};

/// Client for a published knowledge base.
pub struct QnaMakerClient {
    config: QnaConfig,
    client: reqwest::Client,
}

impl QnaMakerClient {
    pub fn new(config: QnaConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/knowledgebases/{}/generateAnswer",
            self.config.host.trim_end_matches('/'),
            self.config.kb_id
        )
    }
}

#[async_trait]
impl KnowledgeBase for QnaMakerClient {
    async fn lookup(&self, question: &str) -> Result<Vec<RankedAnswer>, KbError> {
        let body = serde_json::json!({
            "question": question,
            "top": self.config.top,
        });

        let resp = self
            .client
            .post(self.api_url())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("EndpointKey {}", self.config.endpoint_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| KbError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(KbError::RequestFailed(format!(
                "endpoint returned {status}: {body}"
            )));
        }

        let payload: GenerateAnswerResponse = resp
            .json()
            .await
            .map_err(|e| KbError::InvalidResponse(e.to_string()))?;
        Ok(payload.into_answers())
    }
}

/// The slice of the generateAnswer response the bot consumes.
#[derive(Debug, Deserialize)]
struct GenerateAnswerResponse {
    #[serde(default)]
    answers: Vec<WireAnswer>,
}

#[derive(Debug, Deserialize)]
struct WireAnswer {
    answer: String,
    #[serde(default)]
    score: f32,
}

impl GenerateAnswerResponse {
    /// Positive-score answers only, best first. The service's no-match
    /// sentinel comes back with a zero score and is dropped here.
    fn into_answers(self) -> Vec<RankedAnswer> {
        let mut answers: Vec<RankedAnswer> = self
            .answers
            .into_iter()
            .filter(|a| a.score > 0.0)
            .map(|a| RankedAnswer { text: a.answer, score: a.score })
            .collect();
        answers.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        answers
    }
}
