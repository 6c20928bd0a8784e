use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::chzzk::utils::{lenient, null_as_empty, sized_image};

/// Outer wrapper of every Chzzk API response
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Envelope<T> {
    pub code: i64,
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: String,
    pub channel_image_url: Option<String>,
    #[serde(rename = "verifiedMark")]
    pub verified: Option<bool>,
}

/// `liveId` comes back as either a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiveId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDetail {
    #[serde(default, deserialize_with = "lenient")]
    pub live_id: Option<LiveId>,
    #[serde(rename = "liveTitle")]
    pub title: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "liveImageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "defaultThumbnailImageUrl")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "concurrentUserCount")]
    pub concurrent_viewers: Option<u64>,
    #[serde(rename = "openDate")]
    pub opened_at: Option<String>,
    #[serde(rename = "adult")]
    pub is_adult: Option<bool>,
    pub category_type: Option<String>,
    #[serde(rename = "liveCategory")]
    pub category: Option<String>,
    #[serde(rename = "liveCategoryValue")]
    pub category_value: Option<String>,
    pub channel: Option<ChannelInfo>,
    /// JSON document encoded as a string
    #[serde(rename = "livePlaybackJson")]
    pub playback_manifest_json: Option<String>,
}

impl LiveDetail {
    /// Live preview image at the requested size, falling back to the default thumbnail
    #[must_use]
    pub fn poster_url(&self, size: &str) -> Option<String> {
        self.image_url
            .as_deref()
            .map(|url| sized_image(url, size))
            .or_else(|| self.thumbnail_url.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    #[serde(rename = "videoNo")]
    pub video_number: Option<u64>,
    pub video_id: Option<String>,
    #[serde(rename = "videoTitle")]
    pub title: Option<String>,
    pub video_type: Option<String>,
    #[serde(rename = "publishDate")]
    pub published_at: Option<String>,
    #[serde(rename = "thumbnailImageUrl")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "duration")]
    pub duration_seconds: Option<u64>,
    #[serde(rename = "readCount")]
    pub view_count: Option<u64>,
    #[serde(rename = "adult")]
    pub is_adult: Option<bool>,
    pub channel: Option<ChannelInfo>,
    #[serde(rename = "videoCategoryValue")]
    pub category_value: Option<String>,
    /// Key for the external VOD provider
    #[serde(rename = "inKey")]
    pub play_key: Option<String>,
    /// Present for replays of a finished broadcast; JSON encoded as a string
    #[serde(rename = "liveRewindPlaybackJson")]
    pub replay_manifest_json: Option<String>,
}

/// Decoded `livePlaybackJson` / `liveRewindPlaybackJson`
///
/// `hls` wins over `media` whenever it has any entries; the two are never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackManifest {
    #[serde(rename = "media", default, deserialize_with = "null_as_empty")]
    pub media_entries: Vec<MediaEntry>,
    #[serde(rename = "hls", default, deserialize_with = "null_as_empty")]
    pub hls_entries: Vec<MediaEntry>,
}

impl PlaybackManifest {
    /// The list that should be consulted for playback
    #[must_use]
    pub fn preferred_entries(&self) -> &[MediaEntry] {
        if self.hls_entries.is_empty() {
            &self.media_entries
        } else {
            &self.hls_entries
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEntry {
    pub media_id: Option<String>,
    pub protocol: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "encodingTrack", default, deserialize_with = "null_as_empty")]
    pub encoding_tracks: Vec<EncodingTrack>,
}

impl MediaEntry {
    /// HLS by protocol or by playlist extension
    #[must_use]
    pub fn is_hls(&self) -> bool {
        self.protocol.as_deref() == Some("HLS")
            || self.path.as_deref().is_some_and(|p| p.ends_with(".m3u8"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingTrack {
    pub encoding_track_id: Option<String>,
    pub video_profile: Option<String>,
    pub audio_profile: Option<String>,
    pub video_codec: Option<String>,
    pub video_width: Option<u32>,
    pub video_height: Option<u32>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub size: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub live: Option<LiveDetail>,
    pub video: Option<VideoDetail>,
    pub channel: Option<ChannelInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub following_list: Vec<FollowingItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingItem {
    pub channel_id: String,
    pub channel: Option<ChannelInfo>,
    pub streamer: Option<StreamerInfo>,
    pub live_info: Option<LiveDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamerInfo {
    #[serde(default)]
    pub open_live: bool,
}

/// Body of the external VOD play endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExternalVodPayload {
    Wrapped {
        #[serde(default, deserialize_with = "null_as_empty")]
        streams: Vec<ExternalVodStream>,
    },
    Bare(Vec<ExternalVodStream>),
}

impl ExternalVodPayload {
    #[must_use]
    pub fn into_streams(self) -> Vec<ExternalVodStream> {
        match self {
            Self::Wrapped { streams } | Self::Bare(streams) => streams,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalVodStream {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keys: Vec<ExternalVodKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalVodKey {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_without_content() {
        let env: Envelope<LiveDetail> =
            serde_json::from_value(json!({ "code": 404, "message": "no channel" })).unwrap();
        assert_eq!(env.code, 404);
        assert!(env.content.is_none());

        let env: Envelope<LiveDetail> =
            serde_json::from_value(json!({ "code": 200, "content": null })).unwrap();
        assert!(env.content.is_none());
    }

    #[test]
    fn envelope_with_wrong_content_shape_is_absent() {
        let env: Envelope<FollowingList> =
            serde_json::from_value(json!({ "code": 200, "content": "nope" })).unwrap();
        assert!(env.content.is_none());
    }

    #[test]
    fn live_id_union() {
        let live: LiveDetail = serde_json::from_value(json!({ "liveId": 1234 })).unwrap();
        assert_eq!(live.live_id, Some(LiveId::Number(1234)));

        let live: LiveDetail = serde_json::from_value(json!({ "liveId": "abc" })).unwrap();
        assert_eq!(live.live_id, Some(LiveId::Text("abc".to_string())));

        let live: LiveDetail = serde_json::from_value(json!({ "liveId": { "x": 1 } })).unwrap();
        assert_eq!(live.live_id, None);
    }

    #[test]
    fn live_detail_fields() {
        let body = indoc! {r#"
            {
                "liveId": 99,
                "liveTitle": "Morning stream",
                "status": "OPEN",
                "liveImageUrl": "https://livecloud/{type}.jpg",
                "concurrentUserCount": 512,
                "openDate": "2024-05-01 09:00:00",
                "adult": false,
                "liveCategoryValue": "Just Chatting",
                "channel": {
                    "channelId": "c0ffee",
                    "channelName": "Streamer",
                    "channelImageUrl": null,
                    "verifiedMark": true
                },
                "livePlaybackJson": "{\"media\":[]}"
            }
        "#};
        let live: LiveDetail = serde_json::from_str(body).unwrap();

        assert_eq!(live.title.as_deref(), Some("Morning stream"));
        assert_eq!(live.concurrent_viewers, Some(512));
        assert_eq!(live.channel.as_ref().unwrap().verified, Some(true));
        assert_eq!(
            live.poster_url("480").as_deref(),
            Some("https://livecloud/480.jpg")
        );
        assert_eq!(live.playback_manifest_json.as_deref(), Some(r#"{"media":[]}"#));
    }

    #[test]
    fn poster_falls_back_to_default_thumbnail() {
        let live = LiveDetail {
            thumbnail_url: Some("https://thumb.jpg".to_string()),
            ..LiveDetail::default()
        };
        assert_eq!(live.poster_url("480").as_deref(), Some("https://thumb.jpg"));
    }

    #[test]
    fn manifest_prefers_hls_entries() {
        let manifest: PlaybackManifest = serde_json::from_value(json!({
            "media": [{ "path": "https://m/a.m3u8" }],
            "hls": [{ "path": "https://h/a.m3u8" }]
        }))
        .unwrap();
        assert_eq!(
            manifest.preferred_entries()[0].path.as_deref(),
            Some("https://h/a.m3u8")
        );

        let manifest: PlaybackManifest = serde_json::from_value(json!({
            "media": [{ "path": "https://m/a.m3u8" }],
            "hls": []
        }))
        .unwrap();
        assert_eq!(
            manifest.preferred_entries()[0].path.as_deref(),
            Some("https://m/a.m3u8")
        );
    }

    #[test]
    fn hls_detection() {
        let entry = |protocol: Option<&str>, path: Option<&str>| MediaEntry {
            protocol: protocol.map(str::to_string),
            path: path.map(str::to_string),
            ..MediaEntry::default()
        };

        assert!(entry(Some("HLS"), Some("x")).is_hls());
        assert!(!entry(Some("RTMP"), Some("y.mp4")).is_hls());
        assert!(entry(None, Some("z.m3u8")).is_hls());
        assert!(!entry(None, None).is_hls());
    }

    #[test]
    fn encoding_tracks_decode() {
        let entry: MediaEntry = serde_json::from_value(json!({
            "mediaId": "HLS",
            "protocol": "HLS",
            "path": "https://x/hls_playlist.m3u8",
            "encodingTrack": [
                { "encodingTrackId": "1080p", "videoCodec": "H264", "videoWidth": 1920, "videoHeight": 1080 },
                { "encodingTrackId": "alow.stream", "audioProfile": "AAC" }
            ]
        }))
        .unwrap();
        assert_eq!(entry.encoding_tracks.len(), 2);
        assert_eq!(entry.encoding_tracks[0].video_height, Some(1080));
    }

    #[test]
    fn external_vod_shapes() {
        let wrapped: ExternalVodPayload = serde_json::from_value(json!({
            "streams": [{ "type": "HLS", "keys": [{ "type": "hls", "value": "https://v/a.m3u8" }] }]
        }))
        .unwrap();
        assert_eq!(wrapped.into_streams()[0].keys.len(), 1);

        let bare: ExternalVodPayload = serde_json::from_value(json!([
            { "type": "HLS", "keys": null }
        ]))
        .unwrap();
        let streams = bare.into_streams();
        assert_eq!(streams.len(), 1);
        assert!(streams[0].keys.is_empty());
    }

    #[test]
    fn following_list_decodes() {
        let list: FollowingList = serde_json::from_value(json!({
            "totalCount": 2,
            "followingList": [
                { "channelId": "a", "streamer": { "openLive": true }, "liveInfo": { "liveTitle": "on" } },
                { "channelId": "b", "streamer": { "openLive": false }, "liveInfo": null }
            ]
        }))
        .unwrap();
        assert_eq!(list.total_count, 2);
        assert!(list.following_list[0].streamer.as_ref().unwrap().open_live);
        assert!(list.following_list[1].live_info.is_none());
    }
}
