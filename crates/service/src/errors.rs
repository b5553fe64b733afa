use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("configuration error: {0}")]
    Config(#[from] configs::ConfigError),
    #[error("invalid api key header: {0}")]
    InvalidKey(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("supabase returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum ExplanationError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("reply contains no JSON object")]
    NoJson,
    #[error("reply is not a valid explanation: {0}")]
    Parse(#[from] serde_json::Error),
}
