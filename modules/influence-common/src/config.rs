use crate::error::InfluenceError;

pub const TWITTER_API_KEY: &str = "TWITTER_API_KEY";
pub const TWITTER_SECRET: &str = "TWITTER_SECRET";

/// Secrets loaded from environment variables.
/// Tunables live in the TOML [`FileConfig`](crate::FileConfig).
#[derive(Debug, Clone)]
pub struct Config {
    pub twitter_api_key: String,
    pub twitter_secret: String,
}

impl Config {
    /// Load credentials from the environment (and `.env`, if present).
    /// Fails if either credential is missing or empty.
    pub fn from_env() -> Result<Self, InfluenceError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, InfluenceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    InfluenceError::Config(format!("{key} environment variable is required"))
                })
        };

        Ok(Self {
            twitter_api_key: required(TWITTER_API_KEY)?,
            twitter_secret: required(TWITTER_SECRET)?,
        })
    }

    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().take(4).map(char::len_utf8).sum::<usize>();
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  {}: {}", TWITTER_API_KEY, preview(&self.twitter_api_key));
        tracing::info!("  {}: {}", TWITTER_SECRET, preview(&self.twitter_secret));
    }
}
