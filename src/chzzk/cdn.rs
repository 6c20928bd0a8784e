use m3u8_rs::MasterPlaylist;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    chzzk::{api::ChzzkClient, playback::MediaLink},
    error::{Error, Result},
};

/// One rendition listed by an HLS master playlist
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub uri: String,
    pub bandwidth: u64,
    pub resolution: Option<String>,
    pub height: Option<u64>,
    pub frame_rate: Option<f64>,
    pub codecs: Option<String>,
}

/// Fetches the master playlist behind a resolved link and lists its renditions
///
/// Uses the link's own headers, the same way a player would.
///
/// # Errors
/// On network failure or when the body isn't a master playlist
#[instrument(skip(client, link), fields(url = %link.url))]
pub async fn probe_variants(client: &ChzzkClient, link: &MediaLink) -> Result<Vec<Variant>> {
    let req = ChzzkClient::with_headers(client.http().get(&link.url), &link.headers);
    let transport = |source| Error::Transport {
        url: link.url.clone(),
        source,
    };

    let res = req.send().await.map_err(transport)?;
    let status = res.status();
    if !status.is_success() {
        return Err(Error::Status {
            status,
            url: link.url.clone(),
        });
    }
    let body = res.text().await.map_err(transport)?;

    let playlist = parse_master_playlist(&link.url, &body)?;
    let variants = variants_of(&playlist);
    info!(
        "Available qualities: {}",
        variants
            .iter()
            .map(|v| v.resolution.as_deref().unwrap_or("Unknown resolution"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(variants)
}

/// # Errors
/// [`Error::Playlist`] when `body` isn't an HLS master playlist
pub fn parse_master_playlist(url: &str, body: &str) -> Result<MasterPlaylist> {
    m3u8_rs::parse_master_playlist_res(body.as_bytes()).map_err(|e| Error::Playlist {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[must_use]
pub fn variants_of(playlist: &MasterPlaylist) -> Vec<Variant> {
    playlist
        .variants
        .iter()
        .filter(|v| !v.is_i_frame)
        .map(|v| Variant {
            uri: v.uri.clone(),
            bandwidth: v.bandwidth,
            resolution: v.resolution.map(|r| r.to_string()),
            height: v.resolution.map(|r| r.height),
            frame_rate: v.frame_rate,
            codecs: v.codecs.clone(),
        })
        .collect()
}
