//! Management API client used by `deploy` and `cleanup`.

use acul_kit_core::config::Auth0Config;
use acul_kit_core::contract::{ApiError, ManagementApi, RenderingConfig};
use acul_kit_core::screens::PromptScreen;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Stands in for an error response body that could not be read.
pub const UNREADABLE_BODY: &str = "<unreadable body>";

pub struct Auth0Client {
    client: reqwest::Client,
    credentials: Auth0Config,
    base_url: String,
}

impl Auth0Client {
    pub fn new(credentials: Auth0Config) -> Self {
        let base_url = format!("https://{}", credentials.domain);
        Self::with_base_url(credentials, base_url)
    }

    /// Send requests to `base_url` instead of the tenant domain.
    /// The token audience still names the tenant.
    pub fn with_base_url(credentials: Auth0Config, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url)
    }

    pub fn audience(&self) -> String {
        format!("https://{}/api/v2/", self.credentials.domain)
    }

    pub fn rendering_url(&self, target: &PromptScreen) -> String {
        format!(
            "{}/api/v2/prompts/{}/screen/{}/rendering",
            self.base_url, target.prompt, target.screen
        )
    }
}

fn transport(url: &str, e: reqwest::Error) -> ApiError {
    ApiError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    }
}

async fn ensure_success(
    url: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(url, status = status.as_u16(), error = %e, "Could not read error body");
            UNREADABLE_BODY.to_string()
        }
    };
    Err(ApiError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ManagementApi for Auth0Client {
    async fn fetch_token(&self) -> Result<String, ApiError> {
        let url = self.token_url();
        let audience = self.audience();
        info!(domain = %self.credentials.domain, "Requesting Management API token");
        let response = self
            .client
            .post(&url)
            .json(&TokenRequest {
                grant_type: "client_credentials",
                client_id: &self.credentials.client_id,
                client_secret: &self.credentials.client_secret,
                audience: &audience,
            })
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        let response = ensure_success(&url, response).await?;
        let token: TokenResponse = response.json().await.map_err(|e| ApiError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        Ok(token.access_token)
    }

    async fn update_rendering(
        &self,
        token: &str,
        target: &PromptScreen,
        config: &RenderingConfig,
    ) -> Result<(), ApiError> {
        let url = self.rendering_url(target);
        debug!(url = %url, ?config, "PATCH rendering");
        let response = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(config)
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        ensure_success(&url, response).await?;
        Ok(())
    }
}
