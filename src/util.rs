use std::time::Duration;

/// Shortens a string to at most `max_chars` characters, ending it with `...` when cut
#[must_use]
pub fn truncate_string(string: &str, max_chars: usize) -> String {
    if string.chars().count() <= max_chars {
        return string.to_string();
    }

    let kept: String = string.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// HTTP client shared by every request
///
/// Headers are attached per request since credentials may change between calls.
///
/// # Panics
/// When the TLS backend can't be initialized
#[must_use]
pub fn init_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Unable to build HTTP client")
}
