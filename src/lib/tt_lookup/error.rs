//! Errors raised at the fallible edges of the tool: transport, filesystem and config.
//! The catalog store and the schedule pipeline never return these to their callers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request to the timetable failed or returned an unreadable body
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// The timetable URL could not be built from the configured base
    #[error("URL error: {0}")]
    Url(String),
}

impl From<figment::Error> for LookupError {
    fn from(err: figment::Error) -> Self {
        LookupError::Config(Box::new(err))
    }
}
