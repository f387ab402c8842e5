//! End-to-end expansion runs against MockFetcher. No network.

use influence_common::{parse_seed_set, ExpansionConfig, Identity};
use influence_expander::testing::{user, FetchCall, MockFetcher};
use influence_expander::GraphExpander;

fn small_config() -> ExpansionConfig {
    ExpansionConfig {
        listener_set_size: 3,
        influencer_set_size: 3,
        num_total_users: 1e6,
        min_civic_odds_ratio: 10.0,
        ..ExpansionConfig::default()
    }
}

// Seeds a, b, c. Account 1 follows all three, 2 follows two, 3/4/5 one each.
// Listeners 1, 2, 3 follow 100 (x3), 101 (x2), 102 and 103 (x1).
fn city_graph() -> MockFetcher {
    MockFetcher::new()
        .on_followers("a", &[1, 2, 3])
        .on_followers("b", &[1, 2, 4])
        .on_followers("c", &[1, 5])
        .on_followees(1, &[100, 101, 102])
        .on_followees(2, &[100, 101])
        .on_followees(3, &[100, 103])
        .on_user(user(100, 1_000))
        .on_user(user(101, 0))
}

#[tokio::test]
async fn listeners_ranked_by_seed_engagement() {
    let expander = GraphExpander::new(city_graph(), small_config());
    let seeds = parse_seed_set("@A\nb\nc\n");

    let pass = expander.discover_listeners(&seeds).await;
    let ranked: Vec<(u64, usize)> = pass
        .kept
        .iter()
        .map(|l| (l.id.0, l.engagement_count))
        .collect();

    assert_eq!(pass.observed, 5);
    // 3 ties with 4 and 5 but was seen first
    assert_eq!(ranked, vec![(1, 3), (2, 2), (3, 1)]);
}

#[tokio::test]
async fn full_run_scores_and_filters() {
    let expander = GraphExpander::new(city_graph(), small_config());
    let seeds = parse_seed_set("a\nb\nc\n");

    let expansion = expander.expand(&seeds).await;

    let ids: Vec<Identity> = expansion.records.iter().map(|r| r.user.id).collect();
    assert_eq!(ids, vec![Identity(100)]);

    let record = &expansion.records[0];
    assert_eq!(record.civic_listeners, 3);
    let expected = (3.0 / (3.0 + 1.0 - 3.0)) / (1_000.0 / (1e6 - 1_000.0));
    assert_eq!(record.civic_odds_ratio, Some(expected));

    let stats = &expansion.stats;
    assert_eq!(stats.seeds, 3);
    assert_eq!(stats.raw_listeners, 5);
    assert_eq!(stats.listeners, 3);
    assert_eq!(stats.max_engagement, 3);
    assert_eq!(stats.raw_influencers, 4);
    assert_eq!(stats.candidates, 3);
    assert_eq!(stats.max_civic_listeners, 3);
    assert_eq!(stats.fetch_failures, 0);
    // 102 has no registered user
    assert_eq!(stats.metadata_failures, 1);
    assert_eq!(stats.emitted, 1);
}

#[tokio::test]
async fn fetches_run_sequentially_pass_by_pass() {
    let expander = GraphExpander::new(city_graph(), small_config());
    let seeds = parse_seed_set("a\nb\nc\n");
    expander.expand(&seeds).await;

    let calls = expander.fetcher().calls();
    assert_eq!(
        calls,
        vec![
            FetchCall::Followers("a".into()),
            FetchCall::Followers("b".into()),
            FetchCall::Followers("c".into()),
            FetchCall::Followees(Identity(1)),
            FetchCall::Followees(Identity(2)),
            FetchCall::Followees(Identity(3)),
            FetchCall::Metadata(Identity(100)),
            FetchCall::Metadata(Identity(101)),
            FetchCall::Metadata(Identity(102)),
        ]
    );
}

#[tokio::test]
async fn zero_follower_account_never_emitted() {
    let fetcher = MockFetcher::new()
        .on_followers("seed", &[7])
        .on_followees(7, &[70])
        .on_user(user(70, 0));
    let expander = GraphExpander::new(fetcher, small_config());

    let expansion = expander.expand(&parse_seed_set("seed")).await;
    assert!(expansion.records.is_empty());
    assert_eq!(expansion.stats.candidates, 1);
}

#[tokio::test]
async fn globally_popular_account_fails_relevance() {
    // Followed by every listener, but also by most of the population.
    let fetcher = MockFetcher::new()
        .on_followers("seed", &[1, 2])
        .on_followees(1, &[500])
        .on_followees(2, &[500])
        .on_user(user(500, 900_000));
    let expander = GraphExpander::new(fetcher, small_config());

    let listeners = expander.discover_listeners(&parse_seed_set("seed")).await;
    let influencers = expander.discover_influencers(&listeners.kept).await;
    assert_eq!(influencers.kept[0].civic_listeners, 2);

    let scoring = expander.score_influencers(&influencers.kept).await;
    assert!(scoring.records.is_empty());
    assert_eq!(scoring.below_threshold, 1);
}

#[tokio::test]
async fn failed_fetches_degrade_to_empty() {
    let fetcher = MockFetcher::new()
        .on_followers("a", &[1])
        .on_followees(1, &[100])
        .on_missing_user(100);
    let expander = GraphExpander::new(fetcher, small_config());

    // "ghost" has no registered followers
    let expansion = expander.expand(&parse_seed_set("ghost\na")).await;
    assert_eq!(expansion.stats.fetch_failures, 1);
    assert_eq!(expansion.stats.listeners, 1);
    assert_eq!(expansion.stats.candidates, 1);
    assert_eq!(expansion.stats.metadata_failures, 0);
    assert!(expansion.records.is_empty());
}

#[tokio::test]
async fn empty_seed_set_yields_nothing() {
    let expander = GraphExpander::new(MockFetcher::new(), small_config());
    let expansion = expander.expand(&[]).await;
    assert!(expansion.records.is_empty());
    assert_eq!(expansion.stats.raw_listeners, 0);
    assert!(expander.fetcher().calls().is_empty());
}

#[tokio::test]
async fn listener_cap_limits_second_pass() {
    let fetcher = MockFetcher::new()
        .on_followers("a", &[1, 2, 3, 4, 5])
        .on_followees(1, &[10])
        .on_followees(2, &[10]);
    let config = ExpansionConfig {
        listener_set_size: 2,
        ..small_config()
    };
    let expander = GraphExpander::new(fetcher, config);

    let listeners = expander.discover_listeners(&parse_seed_set("a")).await;
    assert_eq!(listeners.observed, 5);
    let influencers = expander.discover_influencers(&listeners.kept).await;
    assert_eq!(influencers.fetch_failures, 0);
    assert_eq!(influencers.kept.len(), 1);
    assert_eq!(influencers.kept[0].civic_listeners, 2);
}
