//! PowerTrack rule payloads that track tweets from, at, and retweeting a
//! list of handles.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use influence_common::{InfluencerRecord, RulesConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub value: String,
    pub tag: String,
}

/// One `/rules` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleUpdate {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    From,
    Mention,
    RetweetsOf,
}

impl Clause {
    const ALL: [Clause; 3] = [Clause::From, Clause::Mention, Clause::RetweetsOf];

    fn term(self, handle: &str) -> String {
        match self {
            Clause::From => format!("from:{handle}"),
            Clause::Mention => format!("@{handle}"),
            Clause::RetweetsOf => format!("retweets_of:{handle}"),
        }
    }

    fn tag_prefix(self) -> &'static str {
        match self {
            Clause::From => "from",
            Clause::Mention => "at",
            Clause::RetweetsOf => "retweets_of",
        }
    }
}

/// Chunk `handles` positionally and build one three-rule update per chunk.
pub fn handles_to_rules<S: AsRef<str>>(
    handles: &[S],
    ruleset_name: &str,
    config: &RulesConfig,
) -> Vec<RuleUpdate> {
    let chunk_size = config.handles_per_rule.max(1);

    handles
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, chunk)| RuleUpdate {
            rules: Clause::ALL
                .iter()
                .map(|&clause| {
                    let value = chunk
                        .iter()
                        .map(|h| clause.term(h.as_ref()))
                        .collect::<Vec<_>>()
                        .join(" OR ");
                    let tag = format!("{}_{}_{}", clause.tag_prefix(), ruleset_name, index);
                    if value.len() > config.max_rule_chars {
                        warn!(
                            tag = %tag,
                            chars = value.len(),
                            limit = config.max_rule_chars,
                            "Rule value exceeds payload limit"
                        );
                    }
                    Rule { value, tag }
                })
                .collect(),
        })
        .collect()
}

/// Build rules for the screen names of an expanded set, in record order.
pub fn generate_rules(
    records: &[InfluencerRecord],
    ruleset_name: &str,
    config: &RulesConfig,
) -> Vec<RuleUpdate> {
    let handles: Vec<&str> = records
        .iter()
        .map(|r| r.user.screen_name.as_str())
        .collect();
    handles_to_rules(&handles, ruleset_name, config)
}

/// `seed_sets/boston_seed_set.txt` → `boston_seed_set`.
pub fn ruleset_name_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default()
        .to_string()
}
