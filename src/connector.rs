//! Talking back to the Bot Framework connector service: who is in this
//! conversation, and please post this reply.
use anyhow::{anyhow, Context, Result};
use axum::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tokio::sync::RwLock;

use std::time::{Duration, Instant};

use crate::{Activity, Participant};

/// Where Bot Framework hands out app tokens.
pub const TOKEN_URL: &str = "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";
/// The scope an app token must carry to call the connector.
pub const TOKEN_SCOPE: &str = "https://api.botframework.com/.default";

/// The connector operations a turn needs. The real one speaks http; tests
/// bring their own.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Everyone in the given conversation (or team).
    async fn list_members(&self, service_url: &str, conversation_id: &str) -> Result<Vec<Participant>>;
    /// Post an activity into a conversation.
    async fn send_activity(&self, service_url: &str, activity: &Activity) -> Result<()>;
}

/// The app registration we authenticate to the connector as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_password: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// An app token and the moment we stop trusting it.
#[derive(Clone, Debug)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Build `{service_url}/v3/conversations/{conversation_id}/{rest..}`.
pub fn conversation_url(service_url: &str, conversation_id: &str, rest: &[&str]) -> Result<Url> {
    let mut url = Url::parse(service_url)
        .with_context(|| format!("Unable to parse service url {}", service_url))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("service url {} cannot take a path", service_url))?
        .pop_if_empty()
        .extend(["v3", "conversations", conversation_id])
        .extend(rest);
    Ok(url)
}

/// The connector over http.
pub struct BotConnector {
    client: reqwest::Client,
    credentials: Option<Credentials>,
    token_url: String,
    token: RwLock<Option<CachedToken>>,
}

impl BotConnector {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            token_url: TOKEN_URL.to_string(),
            token: RwLock::new(None),
        }
    }

    /// Trade credentials somewhere other than the Bot Framework login service.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// An app token, if we have credentials to trade for one. Without them
    /// we're talking to the emulator, which doesn't check. Tokens are reused
    /// until a minute before they expire.
    async fn bearer(&self) -> Result<Option<String>> {
        let creds = match &self.credentials {
            Some(c) => c,
            None => return Ok(None),
        };

        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Instant::now() {
                    return Ok(Some(token.access_token.clone()));
                }
            }
        }

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", creds.app_id.as_str()),
                ("client_secret", creds.app_password.as_str()),
                ("scope", TOKEN_SCOPE),
            ])
            .send()
            .await
            .context("Unable to reach the token service")?
            .error_for_status()
            .context("Token service refused our credentials")?;
        let token: TokenResponse = response.json().await?;

        let ttl = token.expires_in.unwrap_or(3600).saturating_sub(60);
        log::debug!("fetched an app token good for {ttl}s");
        let mut cached = self.token.write().await;
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(ttl),
        });
        Ok(Some(token.access_token))
    }

    fn authorize(&self, request: reqwest::RequestBuilder, token: Option<String>) -> reqwest::RequestBuilder {
        match token {
            Some(t) => request.bearer_auth(t),
            None => request,
        }
    }
}

#[async_trait]
impl Connector for BotConnector {
    async fn list_members(&self, service_url: &str, conversation_id: &str) -> Result<Vec<Participant>> {
        let url = conversation_url(service_url, conversation_id, &["members"])?;
        let token = self.bearer().await?;
        let response = self
            .authorize(self.client.get(url.clone()), token)
            .send()
            .await
            .with_context(|| format!("Unable to fetch members @ {}", url))?;

        match response.error_for_status() {
            Ok(r) => Ok(r.json::<Vec<Participant>>().await?),
            Err(e) => {
                log::error!("error trying to list members of {}: {:?}", conversation_id, e);
                Err(anyhow!(e))
            }
        }
    }

    async fn send_activity(&self, service_url: &str, activity: &Activity) -> Result<()> {
        let url = conversation_url(service_url, &activity.conversation.id, &["activities"])?;
        let token = self.bearer().await?;
        let response = self
            .authorize(self.client.post(url.clone()), token)
            .json(activity)
            .send()
            .await
            .with_context(|| format!("Unable to post activity @ {}", url))?;

        match response.error_for_status() {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("error trying to post message: {:?}", e);
                Err(anyhow!(e))
            }
        }
    }
}
