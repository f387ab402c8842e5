// RelationFetcher is the only seam between the expansion passes and the
// social graph. TwitterFetcher adapts TwitterClient to it; MockFetcher in
// `testing` stands in for it with no network.

use anyhow::Result;
use async_trait::async_trait;

use influence_common::{Handle, Identity, UserRecord};
use twitter_client::{TwitterClient, TwitterUser};

#[async_trait]
pub trait RelationFetcher: Send + Sync {
    /// Accounts following `handle`, in source order, bounded by the fetcher's cap.
    async fn followers_of(&self, handle: &Handle) -> Result<Vec<Identity>>;

    /// Accounts `id` follows, in source order, bounded by the fetcher's cap.
    async fn followees_of(&self, id: Identity) -> Result<Vec<Identity>>;

    /// Metadata for `id`, or `None` if the account doesn't exist.
    async fn metadata_of(&self, id: Identity) -> Result<Option<UserRecord>>;
}

/// Twitter-backed fetcher. Follower and friend lists are truncated to the
/// configured caps to bound the number of pages requested.
pub struct TwitterFetcher {
    client: TwitterClient,
    max_followers: usize,
    max_friends: usize,
}

impl TwitterFetcher {
    pub fn new(client: TwitterClient, max_followers: usize, max_friends: usize) -> Self {
        Self {
            client,
            max_followers,
            max_friends,
        }
    }
}

#[async_trait]
impl RelationFetcher for TwitterFetcher {
    async fn followers_of(&self, handle: &Handle) -> Result<Vec<Identity>> {
        let ids = self
            .client
            .followers_ids(handle.as_str(), self.max_followers)
            .await?;
        Ok(ids.into_iter().map(Identity).collect())
    }

    async fn followees_of(&self, id: Identity) -> Result<Vec<Identity>> {
        let ids = self.client.friends_ids(id.0, self.max_friends).await?;
        Ok(ids.into_iter().map(Identity).collect())
    }

    async fn metadata_of(&self, id: Identity) -> Result<Option<UserRecord>> {
        Ok(self.client.user(id.0).await?.map(user_record))
    }
}

fn user_record(user: TwitterUser) -> UserRecord {
    UserRecord {
        id: Identity(user.id),
        screen_name: user.screen_name,
        name: user.name,
        location: user.location,
        followers_count: user.followers_count,
        description: user.description,
        extra: user.extra,
    }
}
