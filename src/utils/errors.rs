use thiserror::Error;

/// Main error type for Secretary
#[derive(Error, Debug)]
pub enum SecretaryError {
    /// The backend could not be reached, or the connection dropped
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a body that is not the expected JSON
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Non-2xx status whose body is not the JSON envelope
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl From<reqwest::Error> for SecretaryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SecretaryError::Decode(err.to_string())
        } else if err.is_timeout() {
            SecretaryError::Transport("timeout".to_string())
        } else {
            SecretaryError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SecretaryError {
    fn from(err: serde_json::Error) -> Self {
        SecretaryError::Decode(err.to_string())
    }
}

impl SecretaryError {
    /// Whether the failure happened before a usable reply existed
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SecretaryError::Transport(_) | SecretaryError::Decode(_) | SecretaryError::Status { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_is_bare_detail() {
        let err = SecretaryError::Transport("timeout".to_string());
        assert_eq!(err.to_string(), "timeout");
        assert!(err.is_transport());
    }

    #[test]
    fn test_status_display() {
        let err = SecretaryError::Status {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_json_error_is_decode() {
        let err: SecretaryError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert!(matches!(err, SecretaryError::Decode(_)));
        assert!(!SecretaryError::Config("x".into()).is_transport());
    }
}
