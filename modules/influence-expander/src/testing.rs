// Test mock for the RelationFetcher seam.
//
// MockFetcher answers from HashMaps and records every call, so tests can
// assert both results and the exact fetch sequence. Unregistered keys
// return Err, mirroring an API failure for that key.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use influence_common::{Handle, Identity, UserRecord};

use crate::traits::RelationFetcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCall {
    Followers(String),
    Followees(Identity),
    Metadata(Identity),
}

/// HashMap-based relation fetcher.
/// Builder pattern: `.on_followers()`, `.on_followees()`, `.on_user()`, `.on_missing_user()`.
#[derive(Default)]
pub struct MockFetcher {
    followers: HashMap<String, Vec<Identity>>,
    followees: HashMap<Identity, Vec<Identity>>,
    users: HashMap<Identity, Option<UserRecord>>,
    calls: Mutex<Vec<FetchCall>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_followers(mut self, handle: &str, ids: &[u64]) -> Self {
        self.followers
            .insert(handle.to_lowercase(), ids.iter().copied().map(Identity).collect());
        self
    }

    pub fn on_followees(mut self, id: u64, ids: &[u64]) -> Self {
        self.followees
            .insert(Identity(id), ids.iter().copied().map(Identity).collect());
        self
    }

    pub fn on_user(mut self, user: UserRecord) -> Self {
        self.users.insert(user.id, Some(user));
        self
    }

    /// Register an id whose lookup succeeds but finds no account.
    pub fn on_missing_user(mut self, id: u64) -> Self {
        self.users.insert(Identity(id), None);
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: FetchCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl RelationFetcher for MockFetcher {
    async fn followers_of(&self, handle: &Handle) -> Result<Vec<Identity>> {
        self.record(FetchCall::Followers(handle.as_str().to_string()));
        self.followers
            .get(handle.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("MockFetcher: no followers registered for {handle}"))
    }

    async fn followees_of(&self, id: Identity) -> Result<Vec<Identity>> {
        self.record(FetchCall::Followees(id));
        self.followees
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("MockFetcher: no followees registered for {id}"))
    }

    async fn metadata_of(&self, id: Identity) -> Result<Option<UserRecord>> {
        self.record(FetchCall::Metadata(id));
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("MockFetcher: no user registered for {id}"))
    }
}

/// A user record with the given follower count and a derived screen name.
pub fn user(id: u64, followers_count: u64) -> UserRecord {
    UserRecord::new(id, &format!("acct{id}"), followers_count)
}
