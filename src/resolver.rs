//! The four operations a host catalog needs: followed lives, search, detail and links

use futures_util::future::join;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    chzzk::{
        ChzzkClient, ContentKind, ContentReference, MediaLink,
        cdn::{self, Variant},
        playback::{self, VideoPlayback},
        structs::{Envelope, FollowingList, LiveDetail, SearchPage, VideoDetail},
        utils::{SEARCH_PAGE_SIZE, year_of},
    },
    credentials::Headers,
    error::{Error, Result},
};

const UNKNOWN_TITLE: &str = "Unknown";
const CATALOG_POSTER_SIZE: &str = "480";
const DETAIL_POSTER_SIZE: &str = "1080";

/// A live broadcast or video as listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub title: String,
    pub reference: ContentReference,
    pub poster_url: Option<String>,
    pub poster_headers: Headers,
    pub year: Option<i32>,
}

impl CatalogEntry {
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.reference.kind
    }

    fn live(live: &LiveDetail, channel_id: &str, headers: &Headers) -> Self {
        Self {
            title: live.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            reference: ContentReference::live(channel_id),
            poster_url: live.poster_url(CATALOG_POSTER_SIZE),
            poster_headers: headers.clone(),
            year: None,
        }
    }

    fn video(video: &VideoDetail, video_number: u64, headers: &Headers) -> Self {
        Self {
            title: video.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            reference: ContentReference::video(video_number.to_string()),
            poster_url: video.thumbnail_url.clone(),
            poster_headers: headers.clone(),
            year: video.published_at.as_deref().and_then(year_of),
        }
    }
}

/// Full metadata of a single live broadcast or video
#[derive(Debug, Clone)]
pub enum DetailRecord {
    Live {
        reference: ContentReference,
        detail: LiveDetail,
    },
    Video {
        reference: ContentReference,
        detail: VideoDetail,
    },
}

impl DetailRecord {
    #[must_use]
    pub const fn reference(&self) -> &ContentReference {
        match self {
            Self::Live { reference, .. } | Self::Video { reference, .. } => reference,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        let title = match self {
            Self::Live { detail, .. } => detail.title.as_deref(),
            Self::Video { detail, .. } => detail.title.as_deref(),
        };
        title.unwrap_or(UNKNOWN_TITLE)
    }

    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        match self {
            Self::Live { detail, .. } => detail.poster_url(DETAIL_POSTER_SIZE),
            Self::Video { detail, .. } => detail.thumbnail_url.clone(),
        }
    }

    /// Channel name for lives, category for videos
    #[must_use]
    pub fn plot(&self) -> Option<&str> {
        match self {
            Self::Live { detail, .. } => detail.channel.as_ref().map(|c| c.channel_name.as_str()),
            Self::Video { detail, .. } => detail.category_value.as_deref(),
        }
    }

    /// Category, plus `19+` for adult lives
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        match self {
            Self::Live { detail, .. } => detail
                .category_value
                .iter()
                .cloned()
                .chain((detail.is_adult == Some(true)).then(|| "19+".to_string()))
                .collect(),
            Self::Video { detail, .. } => detail.category_value.iter().cloned().collect(),
        }
    }

    #[must_use]
    pub fn duration_minutes(&self) -> Option<u64> {
        match self {
            Self::Live { .. } => None,
            Self::Video { detail, .. } => detail.duration_seconds.map(|s| s / 60),
        }
    }
}

/// Stateless entry point; every call reads credentials and talks to the API afresh
#[derive(Debug, Clone)]
pub struct Resolver {
    client: ChzzkClient,
}

impl Resolver {
    #[must_use]
    pub const fn new(client: ChzzkClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &ChzzkClient {
        &self.client
    }

    /// Currently live channels the logged in user follows
    ///
    /// Empty when logged out or when anything goes wrong.
    #[instrument(skip(self))]
    pub async fn list_followed_live(&self) -> Vec<CatalogEntry> {
        if !self.client.credentials().current_credentials().is_authenticated() {
            debug!("No credentials, skipping followed channels");
            return Vec::new();
        }

        let list = match self.client.fetch_following_live().await {
            Ok(Envelope {
                content: Some(list),
                ..
            }) => list,
            Ok(env) => {
                warn!(code = env.code, message = ?env.message, "Following list has no content");
                return Vec::new();
            }
            Err(e) => {
                warn!("Unable to fetch followed channels: {e}");
                return Vec::new();
            }
        };

        let headers = self.client.credentials().request_headers();
        let entries = following_entries(list, &headers);
        info!("{} followed channels are live", entries.len());
        entries
    }

    /// Searches lives and videos; `page` starts at 1
    ///
    /// Both searches are independent: one failing leaves the other's results intact.
    /// Lives come first, each half in API order.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, page: u32) -> Vec<CatalogEntry> {
        let offset = page.saturating_sub(1).saturating_mul(SEARCH_PAGE_SIZE);

        let (lives, videos) = join(
            self.client.search_lives(query, offset, SEARCH_PAGE_SIZE),
            self.client.search_videos(query, offset, SEARCH_PAGE_SIZE),
        )
        .await;

        let headers = self.client.credentials().request_headers();
        let mut entries = page_or_empty(lives, "live")
            .map(|page| live_search_entries(page, &headers))
            .unwrap_or_default();
        entries.extend(
            page_or_empty(videos, "video")
                .map(|page| video_search_entries(page, &headers))
                .unwrap_or_default(),
        );

        debug!("Search returned {} entries", entries.len());
        entries
    }

    /// # Errors
    /// [`Error::NotFound`] when the API has no such content, or the fetch error itself
    #[instrument(skip(self, reference), fields(reference = %reference))]
    pub async fn load_detail(&self, reference: &ContentReference) -> Result<DetailRecord> {
        let record = match reference.kind {
            ContentKind::Live => {
                let envelope = self.client.fetch_live_detail(&reference.id).await?;
                DetailRecord::Live {
                    reference: reference.clone(),
                    detail: require_content(envelope, reference)?,
                }
            }
            ContentKind::Video => {
                let envelope = self.client.fetch_video_detail(&reference.id).await?;
                DetailRecord::Video {
                    reference: reference.clone(),
                    detail: require_content(envelope, reference)?,
                }
            }
        };
        Ok(record)
    }

    /// Playable links for a reference
    ///
    /// `Ok(vec![])` means the content exists (or couldn't be reached) but has nothing to play.
    ///
    /// # Errors
    /// When the detail response can't be decoded or holds no content
    #[instrument(skip(self, reference), fields(reference = %reference))]
    pub async fn resolve_links(&self, reference: &ContentReference) -> Result<Vec<MediaLink>> {
        let headers = self.client.credentials().request_headers();

        let links = match reference.kind {
            ContentKind::Live => {
                let fetched = self.client.fetch_live_detail(&reference.id).await;
                let Some(detail) = identify(fetched, reference)? else {
                    return Ok(Vec::new());
                };
                playback::live_links(&detail, &headers)
            }
            ContentKind::Video => {
                let fetched = self.client.fetch_video_detail(&reference.id).await;
                let Some(detail) = identify(fetched, reference)? else {
                    return Ok(Vec::new());
                };
                self.video_links(&detail, &headers).await
            }
        };

        info!("Resolved {} links", links.len());
        Ok(links)
    }

    async fn video_links(&self, detail: &VideoDetail, headers: &Headers) -> Vec<MediaLink> {
        match playback::video_playback(detail, headers) {
            VideoPlayback::Replay(links) => links,
            VideoPlayback::External { video_id, play_key } => {
                match self.client.fetch_external_vod(&video_id, &play_key).await {
                    Ok(streams) => playback::vod_links(&streams, headers),
                    Err(e) => {
                        warn!("Unable to fetch external VOD streams: {e}");
                        Vec::new()
                    }
                }
            }
            VideoPlayback::Unavailable => {
                debug!("Video has neither a replay manifest nor a VOD key");
                Vec::new()
            }
        }
    }

    /// Renditions behind a resolved link
    ///
    /// # Errors
    /// On network failure or when the link isn't a master playlist
    pub async fn probe_variants(&self, link: &MediaLink) -> Result<Vec<Variant>> {
        cdn::probe_variants(&self.client, link).await
    }
}

fn require_content<T>(envelope: Envelope<T>, reference: &ContentReference) -> Result<T> {
    envelope
        .content
        .ok_or_else(|| Error::NotFound(reference.to_string()))
}

/// Network failures are "nothing to play"; a response that doesn't identify
/// the content is an error
fn identify<T>(
    fetched: Result<Envelope<T>>,
    reference: &ContentReference,
) -> Result<Option<T>> {
    match fetched {
        Ok(envelope) => require_content(envelope, reference).map(Some),
        Err(e) if e.is_transport() => {
            warn!("Unable to reach Chzzk for {reference}: {e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn page_or_empty(result: Result<Envelope<SearchPage>>, what: &str) -> Option<SearchPage> {
    match result {
        Ok(env) => env.content,
        Err(e) => {
            warn!("{what} search failed: {e}");
            None
        }
    }
}

fn following_entries(list: FollowingList, headers: &Headers) -> Vec<CatalogEntry> {
    list.following_list
        .iter()
        .filter_map(|item| {
            let live = item.live_info.as_ref()?;
            Some(CatalogEntry::live(live, &item.channel_id, headers))
        })
        .collect()
}

fn live_search_entries(page: SearchPage, headers: &Headers) -> Vec<CatalogEntry> {
    page.data
        .iter()
        .filter_map(|item| {
            let live = item.live.as_ref()?;
            let channel = item.channel.as_ref().or(live.channel.as_ref())?;
            Some(CatalogEntry::live(live, &channel.channel_id, headers))
        })
        .collect()
}

fn video_search_entries(page: SearchPage, headers: &Headers) -> Vec<CatalogEntry> {
    page.data
        .iter()
        .filter_map(|item| {
            let video = item.video.as_ref()?;
            Some(CatalogEntry::video(video, video.video_number?, headers))
        })
        .collect()
}
