use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelperError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Unknown input source: {0}")]
    UnknownSource(String),
    #[error("Registry error: {0}")]
    Registry(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Invalid validator spec: {0}")]
    ValidatorSpec(String),
}

pub type Result<T> = std::result::Result<T, HelperError>;

// Helper conversions
impl From<::config::ConfigError> for HelperError {
    fn from(e: ::config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for HelperError {
    fn from(e: serde_json::Error) -> Self { Self::Registry(e.to_string()) }
}
