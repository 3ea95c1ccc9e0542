//! Error taxonomy for the ranking pipeline.
//!
//! Every failure is fatal: nothing in the pipeline retries or recovers, so
//! each variant carries enough context (the URL or selector involved) to be
//! reported to the operator as-is.

/// Errors that abort a ranking run.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    /// The request could not be sent or its body could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// A response body was not the JSON shape we expected.
    #[error("malformed JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// An HTML page lacked an element the pipeline depends on.
    #[error("no element matching '{selector}' in {url}")]
    MissingElement { url: String, selector: String },

    /// A configured CSS selector did not parse.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A configured or discovered URL did not parse.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl RankingError {
    /// Whether the failure came from the network layer rather than the data.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}
