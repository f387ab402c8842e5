//! Two-pass influencer expansion.
//!
//! Pass 1 finds the accounts that follow the most seed handles (listeners).
//! Pass 2 finds the accounts those listeners follow most (influencer
//! candidates). Candidates are then scored against the whole population and
//! filtered by odds ratio.

use std::fmt;

use tracing::{info, warn};

use influence_common::{
    ExpansionConfig, Handle, Identity, Influencer, InfluencerRecord, Listener,
};

use crate::tally::Tally;
use crate::traits::RelationFetcher;

/// Result of one ranking pass.
#[derive(Debug, Clone)]
pub struct Pass<T> {
    pub kept: Vec<T>,
    /// Distinct accounts seen before truncation.
    pub observed: usize,
    /// Keys whose relation fetch failed and were treated as empty.
    pub fetch_failures: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Scoring {
    pub records: Vec<InfluencerRecord>,
    pub metadata_failures: usize,
    pub missing: usize,
    pub below_threshold: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ExpansionStats {
    pub seeds: usize,
    pub raw_listeners: usize,
    pub listeners: usize,
    pub max_engagement: usize,
    pub raw_influencers: usize,
    pub candidates: usize,
    pub max_civic_listeners: usize,
    pub fetch_failures: usize,
    pub metadata_failures: usize,
    pub emitted: usize,
}

impl fmt::Display for ExpansionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seeds={} listeners={}/{} (max engagement {}) candidates={}/{} (max listeners {}) \
             fetch_failures={} metadata_failures={} emitted={}",
            self.seeds,
            self.listeners,
            self.raw_listeners,
            self.max_engagement,
            self.candidates,
            self.raw_influencers,
            self.max_civic_listeners,
            self.fetch_failures,
            self.metadata_failures,
            self.emitted,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Expansion {
    pub records: Vec<InfluencerRecord>,
    pub stats: ExpansionStats,
}

/// Odds that a listener follows the account, over the odds that a random
/// member of the population does.
///
/// `None` when the account has no followers, or when either odds term is
/// undefined for the configured population sizes.
pub fn civic_odds_ratio(
    civic_listeners: usize,
    followers_count: u64,
    config: &ExpansionConfig,
) -> Option<f64> {
    if followers_count == 0 {
        return None;
    }
    let listeners = civic_listeners as f64;
    let followers = followers_count as f64;

    let civic_rest = config.influencer_set_size as f64 + 1.0 - listeners;
    let general_rest = config.num_total_users - followers;
    if civic_rest <= 0.0 || general_rest <= 0.0 {
        return None;
    }

    let civic_odds = listeners / civic_rest;
    let general_odds = followers / general_rest;
    Some(civic_odds / general_odds)
}

pub struct GraphExpander<F> {
    fetcher: F,
    config: ExpansionConfig,
}

impl<F: RelationFetcher> GraphExpander<F> {
    pub fn new(fetcher: F, config: ExpansionConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Pass 1: rank followers of the seed handles by how many seeds they follow.
    pub async fn discover_listeners(&self, seeds: &[Handle]) -> Pass<Listener> {
        let mut tally: Tally<Identity, &Handle> = Tally::new();
        let mut fetch_failures = 0;

        for handle in seeds {
            match self.fetcher.followers_of(handle).await {
                Ok(followers) => {
                    for id in followers {
                        tally.add(id, handle);
                    }
                }
                Err(e) => {
                    warn!(handle = %handle, error = %e, "Can't get followers");
                    fetch_failures += 1;
                }
            }
        }

        let observed = tally.len();
        let kept: Vec<Listener> = tally
            .top(self.config.listener_set_size)
            .into_iter()
            .map(|(id, engagement_count)| Listener {
                id,
                engagement_count,
            })
            .collect();

        info!(
            observed,
            kept = kept.len(),
            most_engaged = kept.first().map_or(0, |l| l.engagement_count),
            "Listener set ranked"
        );

        Pass {
            kept,
            observed,
            fetch_failures,
        }
    }

    /// Pass 2: rank followees of the listeners by how many listeners follow them.
    pub async fn discover_influencers(&self, listeners: &[Listener]) -> Pass<Influencer> {
        let mut tally: Tally<Identity, Identity> = Tally::new();
        let mut fetch_failures = 0;

        for listener in listeners {
            match self.fetcher.followees_of(listener.id).await {
                Ok(followees) => {
                    for id in followees {
                        tally.add(id, listener.id);
                    }
                }
                Err(e) => {
                    warn!(id = %listener.id, error = %e, "Can't get followees");
                    fetch_failures += 1;
                }
            }
        }

        let observed = tally.len();
        let kept: Vec<Influencer> = tally
            .top(self.config.influencer_set_size)
            .into_iter()
            .map(|(id, civic_listeners)| Influencer {
                id,
                civic_listeners,
            })
            .collect();

        info!(
            observed,
            kept = kept.len(),
            most_influential = kept.first().map_or(0, |i| i.civic_listeners),
            "Influencer candidates ranked"
        );

        Pass {
            kept,
            observed,
            fetch_failures,
        }
    }

    /// Fetch metadata for each candidate, score it, and keep those at or
    /// above the minimum odds ratio. Candidate order is preserved.
    pub async fn score_influencers(&self, candidates: &[Influencer]) -> Scoring {
        let mut scoring = Scoring::default();

        for candidate in candidates {
            let user = match self.fetcher.metadata_of(candidate.id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    warn!(id = %candidate.id, "No user data");
                    scoring.missing += 1;
                    continue;
                }
                Err(e) => {
                    warn!(id = %candidate.id, error = %e, "Can't get user data");
                    scoring.metadata_failures += 1;
                    continue;
                }
            };

            let ratio = civic_odds_ratio(
                candidate.civic_listeners,
                user.followers_count,
                &self.config,
            );
            match ratio {
                Some(r) if r >= self.config.min_civic_odds_ratio => {
                    scoring.records.push(InfluencerRecord {
                        user,
                        civic_listeners: candidate.civic_listeners,
                        civic_odds_ratio: Some(r),
                    });
                }
                _ => scoring.below_threshold += 1,
            }
        }

        info!(
            emitted = scoring.records.len(),
            below_threshold = scoring.below_threshold,
            missing = scoring.missing,
            failures = scoring.metadata_failures,
            "Influencers scored"
        );
        scoring
    }

    /// Run both passes and scoring over a seed set.
    pub async fn expand(&self, seeds: &[Handle]) -> Expansion {
        info!(seeds = seeds.len(), "Determining civic listener set");
        let listeners = self.discover_listeners(seeds).await;

        info!(listeners = listeners.kept.len(), "Determining followees of civic listener set");
        let influencers = self.discover_influencers(&listeners.kept).await;

        info!(candidates = influencers.kept.len(), "Getting user metadata");
        let scoring = self.score_influencers(&influencers.kept).await;

        let stats = ExpansionStats {
            seeds: seeds.len(),
            raw_listeners: listeners.observed,
            listeners: listeners.kept.len(),
            max_engagement: listeners.kept.first().map_or(0, |l| l.engagement_count),
            raw_influencers: influencers.observed,
            candidates: influencers.kept.len(),
            max_civic_listeners: influencers.kept.first().map_or(0, |i| i.civic_listeners),
            fetch_failures: listeners.fetch_failures + influencers.fetch_failures,
            metadata_failures: scoring.metadata_failures,
            emitted: scoring.records.len(),
        };

        Expansion {
            records: scoring.records,
            stats,
        }
    }
}
