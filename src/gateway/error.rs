use thiserror::Error;

/// Errors from the hosted data gateway client
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Gateway error ({status}): {message}")]
    Backend {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Failed to decode gateway response: {0}")]
    Decode(String),

    #[error("Expected exactly one row from {relation}, got {count}")]
    RowCount { relation: String, count: usize },

    #[error("No active session")]
    MissingSession,

    #[error("Refusing unfiltered {op} on {relation}")]
    UnfilteredWrite { op: &'static str, relation: String },

    #[error("{0}")]
    Logical(String),

    #[error("Service role credential not configured")]
    NotConfigured,
}

impl GatewayError {
    /// True when the backend rejected the request because the column is not
    /// part of the relation: SQLSTATE 42703, or the "column ... does not
    /// exist" message some deployments report without a code.
    pub fn is_undefined_column(&self) -> bool {
        match self {
            GatewayError::Backend { code, message, .. } => {
                if code.as_deref() == Some("42703") {
                    return true;
                }
                let msg = message.to_lowercase();
                msg.contains("column") && msg.contains("does not exist")
            }
            _ => false,
        }
    }
}
