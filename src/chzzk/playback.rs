use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    chzzk::{
        structs::{ExternalVodStream, LiveDetail, PlaybackManifest, VideoDetail},
        utils::non_blank,
    },
    credentials::Headers,
};

pub const SOURCE_NAME: &str = "Chzzk";
pub const REPLAY_LABEL: &str = "Replay";
pub const VOD_LABEL: &str = "VOD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkType {
    #[serde(rename = "HLS-manifest")]
    HlsManifest,
}

/// A directly playable stream, with the headers a player needs to fetch it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaLink {
    pub source_name: String,
    pub label: String,
    pub url: String,
    pub headers: Headers,
    /// Vertical resolution, `None` when unknown
    pub quality: Option<u32>,
    pub link_type: LinkType,
}

impl MediaLink {
    fn hls(label: &str, url: &str, headers: &Headers) -> Self {
        Self {
            source_name: SOURCE_NAME.to_string(),
            label: label.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            quality: None,
            link_type: LinkType::HlsManifest,
        }
    }
}

/// What to do for a video after looking at its detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoPlayback {
    /// Replay of a finished broadcast; final, no VOD lookup follows
    Replay(Vec<MediaLink>),
    /// Regular VOD served by the external provider
    External { video_id: String, play_key: String },
    Unavailable,
}

fn decode_manifest(raw: &str, what: &str) -> Option<PlaybackManifest> {
    serde_json::from_str(raw)
        .inspect_err(|e| warn!("Ignoring undecodable {what} manifest: {e}"))
        .ok()
}

/// Links of an ongoing broadcast
///
/// A missing or broken `livePlaybackJson` is "nothing to play", not an error.
#[must_use]
pub fn live_links(detail: &LiveDetail, headers: &Headers) -> Vec<MediaLink> {
    let Some(raw) = non_blank(detail.playback_manifest_json.as_deref()) else {
        debug!("Live detail has no playback manifest");
        return Vec::new();
    };
    let Some(manifest) = decode_manifest(raw, "live") else {
        return Vec::new();
    };

    manifest
        .preferred_entries()
        .iter()
        .filter(|entry| entry.is_hls())
        .filter_map(|entry| entry.path.as_deref())
        .map(|path| MediaLink::hls(SOURCE_NAME, path, headers))
        .collect()
}

/// Decides between the replay and VOD paths of a video
#[must_use]
pub fn video_playback(detail: &VideoDetail, headers: &Headers) -> VideoPlayback {
    if let Some(raw) = non_blank(detail.replay_manifest_json.as_deref()) {
        let links = decode_manifest(raw, "replay")
            .map(|manifest| {
                manifest
                    .media_entries
                    .iter()
                    .filter_map(|entry| entry.path.as_deref())
                    .map(|path| MediaLink::hls(REPLAY_LABEL, path, headers))
                    .collect()
            })
            .unwrap_or_default();
        return VideoPlayback::Replay(links);
    }

    match (non_blank(detail.video_id.as_deref()), non_blank(detail.play_key.as_deref())) {
        (Some(video_id), Some(play_key)) => VideoPlayback::External {
            video_id: video_id.to_string(),
            play_key: play_key.to_string(),
        },
        _ => VideoPlayback::Unavailable,
    }
}

/// HLS links out of the external VOD provider's stream list
#[must_use]
pub fn vod_links(streams: &[ExternalVodStream], headers: &Headers) -> Vec<MediaLink> {
    streams
        .iter()
        .flat_map(|stream| &stream.keys)
        .filter(|key| key.kind.as_deref() == Some("hls"))
        .filter_map(|key| non_blank(key.value.as_deref()))
        .map(|value| MediaLink::hls(VOD_LABEL, value, headers))
        .collect()
}
