use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

pub const DEFAULT_API_BASE: &str = "https://api.chzzk.naver.com";
pub const DEFAULT_VOD_BASE: &str = "https://apis.naver.com/rmcnmv/rmcnmv";

/// Page size used by both search endpoints
pub const SEARCH_PAGE_SIZE: u32 = 12;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Deserializes a field which the API fills with different shapes
///
/// Anything that doesn't decode as `T` becomes `None` instead of failing the whole body
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserializes `null` as an empty list
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[must_use]
pub fn parse_date_time(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), DATE_TIME_FORMAT).ok()
}

/// Year of a `publishDate`-style timestamp, tolerating a bare date prefix
#[must_use]
pub fn year_of(input: &str) -> Option<i32> {
    parse_date_time(input)
        .map(|d| d.year())
        .or_else(|| input.get(..4)?.parse().ok())
}

/// Fills the `{type}` size placeholder of Chzzk image URLs
#[must_use]
pub fn sized_image(url: &str, size: &str) -> String {
    url.replace("{type}", size)
}

/// `None` for missing and whitespace-only values
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
