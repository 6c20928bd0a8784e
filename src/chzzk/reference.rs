use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static LIVE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?chzzk\.naver\.com/live/([0-9A-Za-z]+)/?(?:[?#].*)?$")
        .expect("static regex is valid")
});
static VIDEO_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?chzzk\.naver\.com/video/(\d+)/?(?:[?#].*)?$")
        .expect("static regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Live,
    Video,
}

/// Identifies a channel's live broadcast or a single video
///
/// The [`Display`](fmt::Display) form is the opaque token handed to hosts and
/// [`FromStr`] turns it back. Encoding is byte-stable, so hosts may use the token as a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentReference {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub id: String,
}

impl ContentReference {
    pub fn live(channel_id: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Live,
            id: channel_id.into(),
        }
    }

    pub fn video(video_number: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Video,
            id: video_number.into(),
        }
    }

    /// Opaque token for this reference
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parses a token produced by [`ContentReference::encode`]
    ///
    /// # Errors
    /// [`Error::Unresolvable`] when the token isn't a serialized reference
    pub fn decode(token: &str) -> Result<Self> {
        token.parse()
    }

    /// Accepts either a token or a public `chzzk.naver.com` live / video URL
    ///
    /// # Errors
    /// [`Error::Unresolvable`] when the input is neither
    pub fn from_url(input: &str) -> Result<Self> {
        let input = input.trim();

        if let Some(id) = LIVE_URL_REGEX.captures(input).and_then(|c| c.get(1)) {
            return Ok(Self::live(id.as_str()));
        }
        if let Some(no) = VIDEO_URL_REGEX.captures(input).and_then(|c| c.get(1)) {
            return Ok(Self::video(no.as_str()));
        }

        input.parse()
    }
}

impl fmt::Display for ContentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&token)
    }
}

impl FromStr for ContentReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Unresolvable {
            input: s.to_string(),
            source: Some(e),
        })
    }
}
