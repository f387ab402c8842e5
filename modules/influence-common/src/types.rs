use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized account handle: `@`-stripped and lowercased.
///
/// Handles are only query keys and rule text. They can change when an
/// account renames, so nothing is ever aggregated by handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Normalize one line of free text into a handle.
    ///
    /// Takes the first whitespace-delimited token and strips any leading `@`.
    /// Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.split_whitespace().next()?;
        let bare = token.trim_start_matches('@');
        if bare.is_empty() {
            return None;
        }
        Some(Self(bare.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable numeric account id. The aggregation key for both passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub u64);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Identity {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Account metadata as returned by the relation source.
/// Fields the pipeline doesn't read are carried through in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Identity,
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

impl UserRecord {
    pub fn new(id: impl Into<Identity>, screen_name: &str, followers_count: u64) -> Self {
        Self {
            id: id.into(),
            screen_name: screen_name.to_string(),
            name: String::new(),
            location: None,
            followers_count,
            description: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// An account that follows one or more seed handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub id: Identity,
    /// Distinct seed handles this account follows. Only used for ranking.
    pub engagement_count: usize,
}

/// An account followed by one or more listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Influencer {
    pub id: Identity,
    pub civic_listeners: usize,
}

/// One line of the expanded-set output: the user record plus its scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerRecord {
    #[serde(flatten)]
    pub user: UserRecord,
    pub civic_listeners: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub civic_odds_ratio: Option<f64>,
}
