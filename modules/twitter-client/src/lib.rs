pub mod error;
pub mod types;

pub use error::{Result, TwitterError};
pub use types::{IdsPage, TokenResponse, TwitterUser};

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

const BASE_URL: &str = "https://api.twitter.com";

/// Maximum page size accepted by `followers/ids` and `friends/ids`.
const IDS_PAGE_SIZE: usize = 5000;

/// Length of a rate-limit window when the API omits `x-rate-limit-reset`.
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(15 * 60);

pub struct TwitterClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl TwitterClient {
    /// Exchange consumer credentials for an app-only bearer token.
    pub async fn connect(api_key: &str, secret: &str) -> Result<Self> {
        Self::connect_to(BASE_URL, api_key, secret).await
    }

    pub async fn connect_to(base_url: &str, api_key: &str, secret: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let resp = client
            .post(format!("{}/oauth2/token", base_url))
            .basic_auth(api_key, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TwitterError::Auth(format!("status {}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse = read_json(resp).await?;
        if !token.token_type.eq_ignore_ascii_case("bearer") {
            return Err(TwitterError::Auth(format!(
                "unexpected token type: {}",
                token.token_type
            )));
        }
        tracing::info!("Obtained app-only bearer token");

        Ok(Self {
            client,
            base_url,
            bearer_token: token.access_token,
        })
    }

    /// IDs of accounts following `screen_name`, at most `limit` of them, in API order.
    pub async fn followers_ids(&self, screen_name: &str, limit: usize) -> Result<Vec<u64>> {
        self.collect_ids(
            "/1.1/followers/ids.json",
            ("screen_name", screen_name.to_string()),
            limit,
        )
        .await
    }

    /// IDs of accounts `user_id` follows ("friends"), at most `limit` of them.
    pub async fn friends_ids(&self, user_id: u64, limit: usize) -> Result<Vec<u64>> {
        self.collect_ids("/1.1/friends/ids.json", ("user_id", user_id.to_string()), limit)
            .await
    }

    /// Look up a single user. Returns `Ok(None)` if the account does not exist.
    pub async fn user(&self, user_id: u64) -> Result<Option<TwitterUser>> {
        let query = [("user_id", user_id.to_string())];
        match self.get("/1.1/users/show.json", &query).await {
            Ok(resp) => {
                let user: TwitterUser = read_json(resp).await?;
                Ok(Some(user))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Walk the cursor chain of an ids endpoint until exhausted or `limit` is reached.
    async fn collect_ids(
        &self,
        path: &str,
        key: (&str, String),
        limit: usize,
    ) -> Result<Vec<u64>> {
        let mut ids = Vec::new();
        let mut cursor: i64 = -1;

        while ids.len() < limit {
            let query = [
                (key.0, key.1.clone()),
                ("cursor", cursor.to_string()),
                ("count", IDS_PAGE_SIZE.to_string()),
                ("stringify_ids", "false".to_string()),
            ];
            let resp = self.get(path, &query).await?;
            let page: IdsPage = read_json(resp).await?;
            let more = take_page(&mut ids, &page, limit);

            tracing::debug!(path, key = %key.1, fetched = ids.len(), "Fetched ids page");
            if !more {
                break;
            }
            cursor = page.next_cursor;
        }

        Ok(ids)
    }

    /// GET with bearer auth. Blocks and retries while the endpoint is rate limited.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        loop {
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.bearer_token)
                .query(query)
                .send()
                .await?;

            let status = resp.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let reset = resp
                    .headers()
                    .get("x-rate-limit-reset")
                    .and_then(|v| v.to_str().ok());
                let wait = rate_limit_wait(reset, Utc::now());
                tracing::warn!(
                    path,
                    wait_secs = wait.as_secs(),
                    "Rate limited, waiting for window reset"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(TwitterError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            return Ok(resp);
        }
    }
}

/// Decode a success body. A malformed body is a `Parse` error, not a `Network` one.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Append at most `limit - ids.len()` ids from `page`. Returns whether another page is wanted.
fn take_page(ids: &mut Vec<u64>, page: &IdsPage, limit: usize) -> bool {
    let remaining = limit.saturating_sub(ids.len());
    ids.extend(page.ids.iter().copied().take(remaining));
    ids.len() < limit && !page.is_last()
}

/// How long to sleep given the `x-rate-limit-reset` header (epoch seconds).
///
/// Waits one second past the reset, never less than one second in total.
pub fn rate_limit_wait(reset_header: Option<&str>, now: DateTime<Utc>) -> Duration {
    let Some(reset) = reset_header.and_then(|v| v.trim().parse::<i64>().ok()) else {
        return DEFAULT_RATE_LIMIT_WAIT;
    };
    let secs = reset - now.timestamp() + 1;
    Duration::from_secs(secs.max(1) as u64)
}
