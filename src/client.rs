//! Anti-spam REST API client

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::model::{
    Credentials, Email, EmailCreate, Health, Mailboxes, SpamCheck, SpamCheckRequest, Token,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Header carrying the per-user API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Typed client for the anti-spam API.
///
/// Each method makes exactly one HTTP attempt. Authenticated methods
/// take the API key explicitly; the client holds no session state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured `reqwest::Client` (proxy, timeouts, ...).
    #[must_use]
    pub const fn with_client(config: ApiConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Exchange credentials for a token
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] when the server rejects the credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<Token> {
        let token: Token = self
            .json(Method::POST, "/login", Some(credentials), None, "Login failed")
            .await?;
        info!("Logged in as {}", credentials.email);
        Ok(token)
    }

    /// Register a new account and receive its token
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] when the email is already registered.
    pub async fn signup(&self, credentials: &Credentials) -> Result<Token> {
        let token: Token = self
            .json(Method::POST, "/signup", Some(credentials), None, "Signup failed")
            .await?;
        info!("Registered {}", credentials.email);
        Ok(token)
    }

    /// Send an email; the server classifies and stores it
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] (e.g. 404 for an unknown recipient) or
    /// [`Error::SessionExpired`].
    pub async fn send_email(&self, email: &EmailCreate, api_key: Option<&str>) -> Result<Email> {
        self.json(
            Method::POST,
            "/send-email",
            Some(email),
            api_key,
            "Failed to send email",
        )
        .await
    }

    /// Emails sent by the key's owner
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    pub async fn sent_emails(&self, api_key: Option<&str>) -> Result<Vec<Email>> {
        self.json::<(), _>(
            Method::GET,
            "/emails/sent",
            None,
            api_key,
            "Failed to fetch sent emails",
        )
        .await
    }

    /// Emails received by the key's owner
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    pub async fn received_emails(&self, api_key: Option<&str>) -> Result<Vec<Email>> {
        self.json::<(), _>(
            Method::GET,
            "/emails/received",
            None,
            api_key,
            "Failed to fetch received emails",
        )
        .await
    }

    /// Received emails classified as spam
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    pub async fn spam_emails(&self, api_key: Option<&str>) -> Result<Vec<Email>> {
        self.json::<(), _>(
            Method::GET,
            "/emails/spam",
            None,
            api_key,
            "Failed to fetch spam emails",
        )
        .await
    }

    /// Fetch sent, received and spam concurrently.
    ///
    /// # Errors
    ///
    /// Fails with the first error any of the three requests returns.
    pub async fn mailboxes(&self, api_key: Option<&str>) -> Result<Mailboxes> {
        let (sent, received, spam) = futures::try_join!(
            self.sent_emails(api_key),
            self.received_emails(api_key),
            self.spam_emails(api_key),
        )?;
        info!(
            "Fetched {} sent, {} received, {} spam",
            sent.len(),
            received.len(),
            spam.len()
        );
        Ok(Mailboxes {
            sent,
            received,
            spam,
        })
    }

    /// Reclassify an email as spam
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mark_as_spam(&self, email_id: i64, api_key: Option<&str>) -> Result<()> {
        let path = format!("/emails/{email_id}/mark-spam");
        self.empty(&path, api_key, "Failed to mark email as spam")
            .await
    }

    /// Reclassify an email as legitimate
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mark_as_not_spam(&self, email_id: i64, api_key: Option<&str>) -> Result<()> {
        let path = format!("/emails/{email_id}/mark-not-spam");
        self.empty(&path, api_key, "Failed to mark email as not spam")
            .await
    }

    /// Classify a message without storing it
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not parse.
    pub async fn check_email(
        &self,
        request: &SpamCheckRequest,
        api_key: Option<&str>,
    ) -> Result<SpamCheck> {
        self.json(
            Method::POST,
            "/check-email",
            Some(request),
            api_key,
            "Failed to check email",
        )
        .await
    }

    /// Server liveness probe
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or unhealthy.
    pub async fn health(&self) -> Result<Health> {
        self.json::<(), _>(Method::GET, "/health", None, None, "Health check failed")
            .await
    }

    // -- private helpers --

    async fn json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        api_key: Option<&str>,
        context: &str,
    ) -> Result<T> {
        let mut request = self.request(method, path)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(request, api_key, context).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn empty(&self, path: &str, api_key: Option<&str>, context: &str) -> Result<()> {
        let request = self.request(Method::POST, path)?;
        self.send(request, api_key, context).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.config.endpoint(path)?;
        debug!("{} {}", method, url);
        Ok(self.http.request(method, url))
    }

    /// Send once and turn non-2xx responses into typed errors.
    async fn send(
        &self,
        request: RequestBuilder,
        api_key: Option<&str>,
        context: &str,
    ) -> Result<Response> {
        let request = match api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let rejected = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);
        if rejected && api_key.is_some() {
            warn!("API key rejected: {}", context);
            return Err(Error::SessionExpired);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match error_detail(&body) {
            Some(detail) => format!("{context}: {detail}"),
            None => context.to_string(),
        };
        warn!("{} ({})", message, status);
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull the human-readable `detail` out of an error body.
///
/// FastAPI sends either a string or a list of validation errors with a
/// `msg` each.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}
