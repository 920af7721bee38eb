//! HTTP client for a running Tillbook server
//!
//! GET requests are wrapped in [`with_backoff`]; anything that writes goes out
//! exactly once.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Dashboard;
use crate::retry::{with_backoff, RetryPolicy};

/// Session cookie name shared with the server
pub const SESSION_COOKIE: &str = "tillbook_session";

pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
    retry: RetryPolicy,
}

/// Retry transport failures and server errors; client errors are final
fn is_retryable(err: &Error) -> bool {
    match err {
        Error::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
        Error::Remote { status, .. } => *status >= 500,
        _ => false,
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("tillbook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            http,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| status.to_string());
            return Err(Error::Remote {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    /// GET a JSON resource, retrying with backoff
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let url = url.as_str();
        with_backoff(self.retry, is_retryable, move || async move {
            debug!(url = %url, "GET");
            let response = self.authorize(self.http.get(url)).send().await?;
            Self::read_response(response).await
        })
        .await
    }

    /// POST a JSON body once
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self.authorize(self.http.post(&url)).json(body).send().await?;
        Self::read_response(response).await
    }

    /// Log in and keep the session token for later requests
    pub async fn login(&mut self, login: &str, password: &str) -> Result<()> {
        #[derive(serde::Deserialize)]
        struct LoginResponse {
            token: String,
        }

        let body = serde_json::json!({ "login": login, "password": password });
        let response: LoginResponse = self.post_json("/auth/login", &body).await?;
        self.token = Some(response.token);
        Ok(())
    }

    pub async fn dashboard(&self, year: i32, month: Option<u32>) -> Result<Dashboard> {
        let path = match month {
            Some(m) => format!("/dashboard?year={}&month={}", year, m),
            None => format!("/dashboard?year={}", year),
        };
        self.get_json(&path).await
    }
}
