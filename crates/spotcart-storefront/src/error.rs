use thiserror::Error;

/// Errors returned by the storefront cart client and purchase flow.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The cart endpoint answered with a non-success status. `message` is the
    /// server's `description`, or a generic message when it sent none.
    #[error("{message}")]
    CartRejected { status: u16, message: String },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid store URL \"{store_url}\": {reason}")]
    InvalidStoreUrl { store_url: String, reason: String },
}

impl StorefrontError {
    /// Text shown to the shopper in the blocking notice.
    #[must_use]
    pub fn notice_message(&self) -> String {
        match self {
            StorefrontError::CartRejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
