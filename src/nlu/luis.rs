//! Hosted intent-classification endpoint client (LUIS v2 query API).

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::LuisConfig;
use crate::error::NluError;
use crate::nlu::{Intent, IntentRecognizer, IntentResult};

/// Client for a published LUIS application.
pub struct LuisClient {
    config: LuisConfig,
    client: reqwest::Client,
}

impl LuisClient {
    pub fn new(config: LuisConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/luis/v2.0/apps/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.app_id
        )
    }
}

#[async_trait]
impl IntentRecognizer for LuisClient {
    async fn classify(&self, utterance: &str) -> Result<IntentResult, NluError> {
        let mut params: Vec<(&str, String)> = vec![
            (
                "subscription-key",
                self.config.endpoint_key.expose_secret().to_string(),
            ),
            ("q", utterance.to_string()),
        ];
        if self.config.verbose {
            params.push(("verbose", "true".to_string()));
        }
        if self.config.staging {
            params.push(("staging", "true".to_string()));
        }

        let resp = self
            .client
            .get(self.api_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| NluError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(NluError::RequestFailed(format!(
                "endpoint returned {status}: {body}"
            )));
        }

        let prediction: LuisResponse = resp
            .json()
            .await
            .map_err(|e| NluError::InvalidResponse(e.to_string()))?;
        prediction.into_result()
    }
}

/// The slice of the query response the bot consumes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LuisResponse {
    top_scoring_intent: Option<TopScoringIntent>,
}

#[derive(Debug, Deserialize)]
struct TopScoringIntent {
    intent: String,
    score: f32,
}

impl LuisResponse {
    fn into_result(self) -> Result<IntentResult, NluError> {
        let top = self.top_scoring_intent.ok_or_else(|| {
            NluError::InvalidResponse("response has no topScoringIntent".to_string())
        })?;
        Ok(IntentResult {
            top_intent: Intent {
                name: top.intent,
                score: top.score,
            },
        })
    }
}
