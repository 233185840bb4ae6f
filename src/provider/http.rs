//! HTTP transport for real providers.
//!
//! Posts the wire payload as JSON to a vendor endpoint and decodes the
//! translated payload from the response body. Vendors expose separate live
//! and staging environments; which one is used follows the operator
//! configuration.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::TranslationsConf;
use crate::error::{Result, TranslationsError};
use crate::exchange::wire::ProviderPayload;
use crate::provider::TranslationProvider;

/// Environment variable the API token is read from by [`HttpProvider::from_env`]
pub const API_TOKEN_ENV: &str = "CMS_TRANSLATIONS_API_TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A provider reached over HTTP
pub struct HttpProvider {
    name: String,
    endpoint: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Create a provider talking to either the live or the staging endpoint,
    /// selected by `conf.use_staging`.
    pub fn new(
        name: impl Into<String>,
        live_url: &str,
        staging_url: &str,
        api_token: Option<String>,
        conf: &TranslationsConf,
    ) -> Result<Self> {
        let endpoint = if conf.use_staging {
            staging_url
        } else {
            live_url
        };
        Self::with_endpoint(name, endpoint, api_token)
    }

    /// Create a provider with an explicit endpoint
    pub fn with_endpoint(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        api_token: Option<String>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(TranslationsError::Config(
                "provider endpoint cannot be empty".to_owned(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            name: name.into(),
            endpoint,
            api_token,
            client,
        })
    }

    /// Like [`HttpProvider::new`], with the API token taken from the
    /// `CMS_TRANSLATIONS_API_TOKEN` environment variable.
    pub fn from_env(
        name: impl Into<String>,
        live_url: &str,
        staging_url: &str,
        conf: &TranslationsConf,
    ) -> Result<Self> {
        let token = std::env::var(API_TOKEN_ENV).map_err(|_| {
            TranslationsError::Config(format!("{API_TOKEN_ENV} environment variable not set"))
        })?;
        Self::new(name, live_url, staging_url, Some(token), conf)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TranslationProvider for HttpProvider {
    async fn translate(&self, payload: &ProviderPayload) -> Result<ProviderPayload> {
        tracing::debug!(
            provider = %self.name,
            endpoint = %self.endpoint,
            groups = payload.groups.len(),
            "submitting payload"
        );

        let mut request = self.client.post(&self.endpoint).json(payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_owned());
            return Err(TranslationsError::Provider(format!(
                "{} answered {status}: {body}",
                self.name
            )));
        }

        let translated: ProviderPayload = response.json().await.map_err(|e| {
            TranslationsError::Provider(format!("{} sent an undecodable payload: {e}", self.name))
        })?;
        Ok(translated)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .finish()
    }
}
