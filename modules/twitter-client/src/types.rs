use serde::{Deserialize, Serialize};

/// Response from `POST /oauth2/token` (app-only auth).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
}

/// One cursored page from `followers/ids` or `friends/ids`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdsPage {
    pub ids: Vec<u64>,
    #[serde(default)]
    pub next_cursor: i64,
    #[serde(default)]
    pub previous_cursor: i64,
}

impl IdsPage {
    /// The API signals the last page with a zero cursor.
    pub fn is_last(&self) -> bool {
        self.next_cursor == 0
    }
}

/// A user object from `users/show`.
///
/// Only the fields the pipeline reads are typed; everything else the API
/// returns is kept in `extra` so it round-trips to output unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterUser {
    pub id: u64,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
