use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfluenceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<serde_json::Error> for InfluenceError {
    fn from(err: serde_json::Error) -> Self {
        InfluenceError::Parse(err.to_string())
    }
}
