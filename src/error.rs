use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpsError {
    #[error("customer '{0}' not found")]
    CustomerNotFound(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid location '{0}': expected latitude,longitude")]
    InvalidLocation(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("not logged in: run `opsdesk login <name>` to open {0}")]
    NotLoggedIn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // Remote API errors
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification used when turning a failure into a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, DNS, timeout or body decoding failure
    Transport,
    /// HTTP 401 from the API
    Unauthorized,
    /// Any other non-2xx response
    Rejected,
    /// Failure that never reached the network
    Local,
}

impl OpsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OpsError::Http(_) => ErrorKind::Transport,
            OpsError::Unauthorized(_) => ErrorKind::Unauthorized,
            OpsError::Rejected { .. } => ErrorKind::Rejected,
            _ => ErrorKind::Local,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}

pub type Result<T> = std::result::Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            OpsError::Unauthorized("expired".to_string()).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            OpsError::Rejected {
                status: 422,
                message: "bad phone".to_string()
            }
            .kind(),
            ErrorKind::Rejected
        );
        assert_eq!(
            OpsError::InvalidNumber("abc".to_string()).kind(),
            ErrorKind::Local
        );
        assert!(OpsError::Unauthorized(String::new()).is_unauthorized());
        assert!(!OpsError::Other("x".to_string()).is_unauthorized());
    }

    #[test]
    fn test_rejected_message() {
        let err = OpsError::Rejected {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "request rejected (500): boom");
    }
}
