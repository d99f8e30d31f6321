use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateShopRequest, NotificationsResponse, RemoteNotification, Shop, UpdateProfile,
    UserProfile,
};

const INITIAL_BACKOFF_MS: u64 = 200;
const MAX_BACKOFF_MS: u64 = 5_000;

/// The backend operations the client core depends on.
#[async_trait]
pub trait ShopMunimApi: Send + Sync {
    /// `GET /me`
    async fn get_me(&self) -> AppResult<UserProfile>;

    /// `PATCH /profile`
    async fn update_profile(&self, update: UpdateProfile) -> AppResult<UserProfile>;

    /// `GET /notifications`
    async fn list_notifications(&self) -> AppResult<Vec<RemoteNotification>>;

    /// `POST /shops`
    async fn create_shop(&self, request: CreateShopRequest) -> AppResult<Shop>;
}

/// reqwest-backed implementation of [`ShopMunimApi`].
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    max_retries: u32,
}

impl HttpApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
            max_retries: config.max_retries.max(1),
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.api_url(endpoint));
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send an idempotent request, retrying 429/5xx replies and connect/timeout
    /// errors with exponential backoff. A numeric `Retry-After` header overrides the
    /// computed delay.
    async fn send_with_backoff<F>(&self, make_request: F) -> AppResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        for attempt in 1..=self.max_retries {
            let last_attempt = attempt >= self.max_retries;

            match make_request().send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let transient =
                        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                    if !transient || last_attempt {
                        return Ok(resp);
                    }

                    let wait_ms = resp
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .map(|secs| secs * 1_000)
                        .unwrap_or(backoff_ms);

                    tracing::warn!(
                        "Transient API error (status: {}). Retrying in {}ms (attempt {}/{})",
                        status,
                        wait_ms,
                        attempt,
                        self.max_retries
                    );
                    tokio::time::sleep(Duration::from_millis(wait_ms)).await;
                }
                Err(e) => {
                    let err = AppError::from(e);
                    if last_attempt || !err.is_transient() {
                        return Err(err);
                    }
                    tracing::warn!(
                        "HTTP request failed: {}. Retrying in {}ms (attempt {}/{})",
                        err,
                        backoff_ms,
                        attempt,
                        self.max_retries
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
            }

            backoff_ms = std::cmp::min(backoff_ms * 2, MAX_BACKOFF_MS);
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "exhausted {} request attempts",
            self.max_retries
        )))
    }

    /// Turn a response into `T`, or into an [`AppError`] for non-2xx statuses.
    async fn parse_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!("API responded with {}: {}", status, body);
            return Err(AppError::from_response(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| AppError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ShopMunimApi for HttpApiClient {
    async fn get_me(&self) -> AppResult<UserProfile> {
        let response = self
            .send_with_backoff(|| self.request(Method::GET, "/me"))
            .await?;
        Self::parse_json(response).await
    }

    async fn update_profile(&self, update: UpdateProfile) -> AppResult<UserProfile> {
        tracing::debug!(?update, "PATCH /profile");
        let response = self
            .request(Method::PATCH, "/profile")
            .json(&update)
            .send()
            .await?;
        Self::parse_json(response).await
    }

    async fn list_notifications(&self) -> AppResult<Vec<RemoteNotification>> {
        let response = self
            .send_with_backoff(|| self.request(Method::GET, "/notifications"))
            .await?;
        let parsed: NotificationsResponse = Self::parse_json(response).await?;
        Ok(parsed.into_vec())
    }

    async fn create_shop(&self, request: CreateShopRequest) -> AppResult<Shop> {
        tracing::debug!(name = %request.name, category = %request.category, "POST /shops");
        let response = self
            .request(Method::POST, "/shops")
            .json(&request)
            .send()
            .await?;
        Self::parse_json(response).await
    }
}
