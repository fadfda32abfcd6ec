use thiserror::Error;

/// Shown when the parser rejects a request without saying why.
pub const REMOTE_FALLBACK_MESSAGE: &str = "Произошла ошибка при парсинге URL.";

/// Shown when no usable response arrived at all.
pub const TRANSPORT_MESSAGE: &str = "Произошла непредвиденная ошибка.";

/// Errors from talking to the remote parsing service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure: no response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status. `message` is the `error`
    /// field of a JSON body, when there was one.
    #[error("parser returned HTTP {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Remote {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid parser base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("an archive needs at least one product")]
    EmptyArchive,
}

/// Why a submission ended in the error state.
///
/// `Display` is the human-readable message the orchestrator stores in
/// [`crate::ParseState::Error`]. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The normalized URL is not on a supported site.
    #[error("{message}")]
    InvalidUrl { message: String },

    /// The parser rejected the URL.
    #[error("{message}")]
    Remote { message: String },

    #[error("{}", TRANSPORT_MESSAGE)]
    Transport,

    /// A newer submission was issued before this one resolved. Its outcome
    /// was not committed to the orchestrator state.
    #[error("request {request} was superseded by a newer submission")]
    Superseded { request: u64 },
}

impl From<ClientError> for SubmitError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Remote {
                message: Some(message),
                ..
            } => SubmitError::Remote { message },
            ClientError::Remote { message: None, .. } => SubmitError::Remote {
                message: REMOTE_FALLBACK_MESSAGE.to_string(),
            },
            ClientError::Http(_)
            | ClientError::Deserialize { .. }
            | ClientError::InvalidBaseUrl { .. }
            | ClientError::EmptyArchive => SubmitError::Transport,
        }
    }
}
