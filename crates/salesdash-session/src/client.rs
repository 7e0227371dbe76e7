//! HTTP client for the sales dashboard API.
//!
//! Wraps `reqwest` with bearer authorization, the `{ApiStatus, Data}`
//! envelope, and endpoint-specific error mapping. Endpoint paths are joined
//! under the configured base URL so tests can point the client at a mock
//! server.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use salesdash_core::AppConfig;
use serde::de::DeserializeOwned;

use crate::error::{SessionError, LOGIN_FAILED, PROFILE_FETCH_FAILED};
use crate::types::{
    ApiEnvelope, DailySalesOverviewData, DailySalesQuery, RemoteDailySales, RemoteUser,
    TokenData, TokenRequest, UserInformationData, UserInformationRequest,
};

pub(crate) const TOKEN_PATH: &str = "oauth/token";
pub(crate) const USER_INFORMATION_PATH: &str = "user/user-information";
pub(crate) const LOGOUT_PATH: &str = "user/logout";
pub(crate) const DAILY_SALES_PATH: &str = "data/daily-sales-overview";

const GRANT_TYPE: &str = "password";

/// OAuth client registration sent with every token request.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl ClientCredentials {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
        }
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Client for the dashboard REST API.
///
/// Use [`DashboardClient::new`] with the loaded [`AppConfig`], or
/// [`DashboardClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug)]
pub struct DashboardClient {
    client: Client,
    base_url: Url,
    credentials: ClientCredentials,
}

impl DashboardClient {
    /// # Errors
    ///
    /// Returns [`SessionError::Network`] if the `reqwest::Client` cannot be
    /// built, or [`SessionError::InvalidBaseUrl`] for an unparseable base URL.
    pub fn new(config: &AppConfig) -> Result<Self, SessionError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            ClientCredentials::from_config(config),
        )
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Network`] if the `reqwest::Client` cannot be
    /// built, or [`SessionError::InvalidBaseUrl`] for an unparseable base URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        credentials: ClientCredentials,
    ) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joining "oauth/token" appends to any
        // path prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SessionError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Exchanges an email and password for an access token.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Authentication`] with `"Login failed"` on a non-2xx
    ///   status, `ApiStatus: false`, or a response without token data.
    /// - [`SessionError::Network`] on transport failure.
    /// - [`SessionError::Deserialize`] if the body is not the token envelope.
    pub async fn request_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenData, SessionError> {
        let url = self.endpoint(TOKEN_PATH)?;
        let body = TokenRequest {
            email,
            password,
            grant_type: GRANT_TYPE,
            scope: &self.credentials.scope,
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
            redirect_uri: &self.credentials.redirect_uri,
        };

        let response = self.client.post(url).json(&body).send().await?;
        if !response.status().is_success() {
            tracing::debug!(status = response.status().as_u16(), "token endpoint rejected credentials");
            return Err(SessionError::Authentication(LOGIN_FAILED.to_owned()));
        }

        let envelope: ApiEnvelope<TokenData> = Self::read_json(response, TOKEN_PATH).await?;
        if envelope.is_failure() {
            return Err(SessionError::Authentication(LOGIN_FAILED.to_owned()));
        }
        envelope
            .data
            .filter(|d| !d.access_token.is_empty())
            .ok_or_else(|| SessionError::Authentication(LOGIN_FAILED.to_owned()))
    }

    /// Fetches the profile for `email` under bearer authorization.
    ///
    /// # Errors
    ///
    /// - [`SessionError::ProfileFetch`] on a non-2xx status or
    ///   `ApiStatus: false`, carrying `ApiStatusMessage` when the server
    ///   sent one.
    /// - [`SessionError::Network`] on transport failure.
    /// - [`SessionError::Deserialize`] if a 2xx body is not the profile
    ///   envelope.
    pub async fn fetch_user_information(
        &self,
        access_token: &str,
        email: &str,
    ) -> Result<RemoteUser, SessionError> {
        let url = self.endpoint(USER_INFORMATION_PATH)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(&UserInformationRequest { email })
            .send()
            .await?;

        if !response.status().is_success() {
            // Error bodies are best-effort: use the server's message if the
            // envelope parses, otherwise fall back to the generic one.
            let message = response
                .text()
                .await
                .ok()
                .and_then(|raw| serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&raw).ok())
                .and_then(|env| env.api_status_message);
            return Err(profile_error(message));
        }

        let envelope: ApiEnvelope<UserInformationData> =
            Self::read_json(response, USER_INFORMATION_PATH).await?;
        if envelope.is_failure() {
            return Err(profile_error(envelope.api_status_message));
        }
        envelope
            .data
            .map(|d| d.user)
            .ok_or_else(|| profile_error(envelope.api_status_message))
    }

    /// Notifies the server that the session is ending.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnexpectedStatus`] on a non-2xx status.
    /// - [`SessionError::Network`] on transport failure.
    pub async fn logout(&self, access_token: &str) -> Result<(), SessionError> {
        let url = self.endpoint(LOGOUT_PATH)?;
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }

    /// Fetches the daily sales window described by `query`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnexpectedStatus`] on a non-2xx status.
    /// - [`SessionError::Api`] when the envelope reports `ApiStatus: false`.
    /// - [`SessionError::Network`] on transport failure.
    /// - [`SessionError::Deserialize`] if the body is not the sales envelope.
    pub async fn daily_sales_overview(
        &self,
        access_token: &str,
        query: &DailySalesQuery,
    ) -> Result<Vec<RemoteDailySales>, SessionError> {
        let url = self.endpoint(DAILY_SALES_PATH)?;
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(access_token)
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let envelope: ApiEnvelope<DailySalesOverviewData> =
            Self::read_json(response, DAILY_SALES_PATH).await?;
        if envelope.is_failure() {
            return Err(SessionError::Api(
                envelope
                    .api_status_message
                    .unwrap_or_else(|| "daily sales overview failed".to_owned()),
            ));
        }
        Ok(envelope.data.map(|d| d.items).unwrap_or_default())
    }

    /// Joins an endpoint path under the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, SessionError> {
        self.base_url
            .join(path)
            .map_err(|e| SessionError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, SessionError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SessionError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

fn profile_error(message: Option<String>) -> SessionError {
    SessionError::ProfileFetch(
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| PROFILE_FETCH_FAILED.to_owned()),
    )
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
