pub mod config;
pub mod error;
pub mod file_config;
pub mod seed;
pub mod types;

pub use config::Config;
pub use error::InfluenceError;
pub use file_config::{
    load_config, load_config_or_default, ExpansionConfig, ExportConfig, FileConfig, RulesConfig,
};
pub use seed::{parse_seed_set, read_seed_set};
pub use types::{Handle, Identity, Influencer, InfluencerRecord, Listener, UserRecord};
