use thiserror::Error;

pub type Result<T> = std::result::Result<T, E2eError>;

#[derive(Debug, Error)]
pub enum E2eError {
    #[error("timeout after {ms}ms waiting for: {condition}")]
    Timeout { ms: u64, condition: String },

    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("navigation failed: {url}")]
    Navigation {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("javascript evaluation failed: {0}")]
    JsEval(String),

    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("browser operation failed: {0}")]
    Browser(String),

    #[error("no browser session: {0}")]
    NoSession(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl E2eError {
    pub fn timeout(duration: std::time::Duration, condition: impl Into<String>) -> Self {
        E2eError::Timeout {
            ms: duration.as_millis() as u64,
            condition: condition.into(),
        }
    }

    /// Lookups are wait-based, so a missing element and an expired wait are
    /// the same failure from a caller's point of view.
    pub fn is_timeout(&self) -> bool {
        match self {
            E2eError::Timeout { .. } | E2eError::ElementNotFound { .. } => true,
            E2eError::Browser(msg) => msg.contains("Timeout"),
            _ => false,
        }
    }
}
