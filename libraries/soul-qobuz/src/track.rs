//! Tracks.

use crate::album::Album;
use crate::artist::Artist;
use crate::error::{QobuzError, Result};
use crate::ids::{CatalogItem, Identified, ItemId};
use crate::transport::{items, parse, Params, Transport};
use crate::types::{AudioFormat, Page};
use serde::Deserialize;
use serde_json::Value;
use std::cell::OnceCell;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TrackItem {
    id: ItemId,
    playlist_track_id: Option<i64>,
    title: Option<String>,
    album: Option<Value>,
    duration: Option<u32>,
    media_number: Option<u32>,
    track_number: Option<u32>,
    performers: Option<String>,
    performer: Option<Performer>,
    maximum_bit_depth: Option<u32>,
    maximum_sampling_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Performer {
    id: Option<ItemId>,
}

/// A track from the Qobuz catalog.
#[derive(Debug, Clone)]
pub struct Track {
    id: ItemId,
    playlist_track_id: Option<i64>,
    title: String,
    album: Album,
    duration: Option<u32>,
    media_number: Option<u32>,
    track_number: Option<u32>,
    performers: Option<Vec<String>>,
    performer_id: Option<ItemId>,
    maximum_format: AudioFormat,
    artist: OnceCell<Artist>,
}

impl Track {
    /// Build a track from JSON that carries its album as a nested object.
    pub fn from_json(value: &Value) -> Result<Self> {
        Self::build(value, None)
    }

    /// Build a track whose album is already known; any nested album in
    /// `value` is ignored.
    pub fn with_album(value: &Value, album: Album) -> Result<Self> {
        Self::build(value, Some(album))
    }

    fn build(value: &Value, album: Option<Album>) -> Result<Self> {
        let item: TrackItem = parse(value, "track")?;

        let album = match album {
            Some(album) => album,
            None => {
                let nested = item
                    .album
                    .ok_or_else(|| QobuzError::missing("track", "album"))?;
                Album::from_json(&nested)?
            }
        };

        Ok(Self {
            id: item.id,
            playlist_track_id: item.playlist_track_id,
            title: item.title.unwrap_or_default(),
            album,
            duration: item.duration,
            media_number: item.media_number,
            track_number: item.track_number,
            performers: parse_performers(item.performers.as_deref()),
            performer_id: item.performer.and_then(|p| p.id),
            maximum_format: AudioFormat::best_for(
                item.maximum_bit_depth.unwrap_or(0),
                item.maximum_sampling_rate.unwrap_or(0.0),
            ),
            artist: OnceCell::new(),
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Position id inside a playlist; only set for tracks listed from one.
    pub fn playlist_track_id(&self) -> Option<i64> {
        self.playlist_track_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn album(&self) -> &Album {
        &self.album
    }

    /// Duration in seconds.
    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    pub fn media_number(&self) -> Option<u32> {
        self.media_number
    }

    pub fn track_number(&self) -> Option<u32> {
        self.track_number
    }

    pub fn performers(&self) -> Option<&[String]> {
        self.performers.as_deref()
    }

    pub fn performer_id(&self) -> Option<&ItemId> {
        self.performer_id.as_ref()
    }

    /// Best stream format available for this track.
    pub fn maximum_format(&self) -> AudioFormat {
        self.maximum_format
    }

    /// The main performer, looked up with `artist/get` on first call.
    ///
    /// Tracks without a performer id resolve to [`Artist::unknown`] without
    /// touching the network.
    pub fn artist(&self, api: &dyn Transport, token: Option<&str>) -> Result<&Artist> {
        if let Some(artist) = self.artist.get() {
            return Ok(artist);
        }

        let artist = match &self.performer_id {
            Some(id) => {
                debug!(track_id = %self.id, performer_id = %id, "Resolving track artist");
                Artist::from_id(api, id.clone(), token)?
            }
            None => Artist::unknown(),
        };

        Ok(self.artist.get_or_init(|| artist))
    }

    /// Look up a track by id.
    pub fn from_id(api: &dyn Transport, id: impl Into<ItemId>, token: Option<&str>) -> Result<Self> {
        Self::from_json(&Self::from_id_raw(api, id, token)?)
    }

    pub fn from_id_raw(
        api: &dyn Transport,
        id: impl Into<ItemId>,
        token: Option<&str>,
    ) -> Result<Value> {
        api.request(
            "track/get",
            &Params::new().with("track_id", id.into()).with_token(token),
        )
    }

    /// Search tracks.
    pub fn search(
        api: &dyn Transport,
        query: &str,
        page: Page,
        token: Option<&str>,
    ) -> Result<Vec<Self>> {
        let response = Self::search_raw(api, query, page, token)?;
        items(&response, "tracks")?.iter().map(Self::from_json).collect()
    }

    pub fn search_raw(
        api: &dyn Transport,
        query: &str,
        page: Page,
        token: Option<&str>,
    ) -> Result<Value> {
        api.request(
            "track/search",
            &Params::new()
                .with("query", query)
                .with("offset", page.offset)
                .with("limit", page.limit)
                .with_token(token),
        )
    }
}

/// Split the `performers` credit line into names.
///
/// Line breaks are dropped before splitting on `" - "`; an absent or empty
/// line yields `None`.
fn parse_performers(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    Some(cleaned.split(" - ").map(str::to_string).collect())
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.album == other.album
            && self.performer_id == other.performer_id
    }
}

impl Identified for Track {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl CatalogItem for Track {
    fn kind(&self) -> &'static str {
        "track"
    }
}
