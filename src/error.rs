use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while talking to Chzzk or resolving its content
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure: DNS, connect, timeout, body read
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status whose body wasn't a decodable envelope
    #[error("HTTP {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("Unable to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed envelope without any content
    #[error("No content found for {0}")]
    NotFound(String),

    #[error("Unresolvable content reference `{input}`")]
    Unresolvable {
        input: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Invalid HLS playlist from {url}: {reason}")]
    Playlist { url: String, reason: String },
}

impl Error {
    /// Whether the request never produced a response to look at
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
