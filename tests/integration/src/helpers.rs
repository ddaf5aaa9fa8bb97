//! Test helpers for integration tests
//!
//! Spawns a test server on an ephemeral port and wraps `reqwest` for the
//! calls the tests make. Each `Client` keeps its own cookie store, so each
//! one is a distinct anonymous voter.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use viewpoints_api::{create_app, create_app_state};
use viewpoints_common::{AppConfig, IdentityTokenService};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    tokens: IdentityTokenService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let tokens =
            IdentityTokenService::new(&config.auth.jwt_secret, config.auth.jwt_issuer.clone());

        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            client: new_client()?,
            tokens,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Identity-provider token for `user_id`
    pub fn token_for(&self, user_id: &str) -> Result<String> {
        Ok(self.tokens.issue(user_id, 300)?)
    }

    /// A fresh client with an empty cookie jar (another anonymous voter)
    pub fn anonymous_client(&self) -> Result<Client> {
        new_client()
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.get(self.url(path)).bearer_auth(token)).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        send(self.client.post(self.url(path)).json(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<Response> {
        send(self.client.post(self.url(path))).await
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(self.client.post(self.url(path)).bearer_auth(token).json(body)).await
    }

    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(self.client.put(self.url(path)).bearer_auth(token).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        send(self.client.delete(self.url(path))).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.delete(self.url(path)).bearer_auth(token)).await
    }
}

fn new_client() -> Result<Client> {
    Ok(Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(10))
        .build()?)
}

async fn send(request: RequestBuilder) -> Result<Response> {
    Ok(request.send().await?)
}

/// Configuration from the environment, with test-friendly defaults for
/// everything but `DATABASE_URL`
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_lookup(|key| {
        std::env::var(key).ok().or_else(|| {
            let fallback = match key {
                "API_PORT" => "0",
                "AUTH_JWT_SECRET" => "integration-test-secret",
                "RATE_LIMIT_REQUESTS_PER_SECOND" => "10000",
                "RATE_LIMIT_BURST" => "10000",
                _ => return None,
            };
            Some(fallback.to_string())
        })
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    Ok(config)
}

/// Check whether the test environment is available
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Error code of an error response
pub async fn error_code(response: Response) -> Result<String> {
    let body: serde_json::Value = response.json().await?;
    Ok(body["error"]["code"].as_str().unwrap_or_default().to_string())
}
