//! Outbound reply delivery through the channel's callback URL.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::activity::Activity;
use crate::bot::context::ActivitySink;
use crate::config::AppCredentials;
use crate::error::ChannelError;

const TOKEN_URL: &str = "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";
const TOKEN_SCOPE: &str = "https://api.botframework.com/.default";

/// Posts activities to the conversation they belong to.
///
/// With credentials configured, requests carry a bearer token from the
/// client-credentials grant. Without them, requests go out unauthenticated,
/// which is what the local channel emulator expects.
pub struct ConnectorClient {
    credentials: Option<AppCredentials>,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

impl ConnectorClient {
    pub fn new(credentials: Option<AppCredentials>) -> Self {
        Self {
            credentials,
            client: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    /// Delivery URL for an activity: the conversation's activities
    /// collection, or the specific activity being replied to when the
    /// reply target is known.
    fn activities_url(activity: &Activity) -> Result<String, ChannelError> {
        let service_url = activity
            .service_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ChannelError::SendFailed("activity has no service url".to_string())
            })?;

        let base = format!(
            "{}/v3/conversations/{}/activities",
            service_url.trim_end_matches('/'),
            activity.conversation.id
        );
        Ok(
            match activity.reply_to_id.as_deref().filter(|s| !s.is_empty()) {
                Some(reply_to) => format!("{base}/{reply_to}"),
                None => base,
            },
        )
    }

    async fn bearer_token(&self, credentials: &AppCredentials) -> Result<String, ChannelError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.access_token.clone());
            }
        }

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.app_id.as_str()),
            ("client_secret", credentials.app_password.expose_secret()),
            ("scope", TOKEN_SCOPE),
        ];
        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&form)
            .send()
            .await
            .map_err(|e| ChannelError::AuthFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ChannelError::AuthFailed(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ChannelError::AuthFailed(e.to_string()))?;

        // Refresh a minute before the reported expiry.
        let expires_at = Utc::now() + Duration::seconds(token.expires_in.saturating_sub(60));
        let access = token.access_token.clone();
        *cached = Some(CachedToken { access_token: token.access_token, expires_at });
        Ok(access)
    }
}

#[async_trait]
impl ActivitySink for ConnectorClient {
    async fn send(&self, activity: Activity) -> Result<(), ChannelError> {
        let url = Self::activities_url(&activity)?;

        let mut request = self.client.post(&url).json(&activity);
        if let Some(credentials) = &self.credentials {
            let token = self.bearer_token(credentials).await?;
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed(format!(
                "connector returned {status}: {body}"
            )));
        }
        Ok(())
    }
}
