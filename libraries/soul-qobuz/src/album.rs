//! Albums and their lazily fetched track listing.

use crate::artist::Artist;
use crate::error::{QobuzError, Result};
use crate::ids::{CatalogItem, Identified, ItemId};
use crate::track::Track;
use crate::transport::{items, parse, Params, Transport};
use crate::types::{FeaturedType, Page};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::OnceCell;
use tracing::debug;

/// Cover art URLs for an album.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct AlbumImages {
    pub small: Option<String>,
    pub thumbnail: Option<String>,
    pub large: Option<String>,
    pub back: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumItem {
    id: ItemId,
    title: Option<String>,
    version: Option<String>,
    image: Option<AlbumImages>,
    tracks_count: Option<u32>,
    media_count: Option<u32>,
    released_at: Option<i64>,
    artist: Option<Value>,
    genre: Option<Genre>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: Option<String>,
}

/// An album from the Qobuz catalog.
///
/// The track listing is not part of most payloads; [`Album::tracks`]
/// fetches it on first use and keeps it for the lifetime of the value.
#[derive(Debug, Clone)]
pub struct Album {
    id: ItemId,
    title: String,
    version: Option<String>,
    images: Option<AlbumImages>,
    tracks_count: Option<u32>,
    media_count: Option<u32>,
    released_at: Option<i64>,
    artist: Artist,
    genre: String,
    tracks: OnceCell<Vec<Track>>,
}

impl Album {
    /// Build an album from its JSON representation.
    ///
    /// Fails with [`QobuzError::MissingField`] when the nested artist or the
    /// genre name is absent.
    pub fn from_json(value: &Value) -> Result<Self> {
        let item: AlbumItem = parse(value, "album")?;

        let artist = item
            .artist
            .ok_or_else(|| QobuzError::missing("album", "artist"))?;
        let artist = Artist::from_json(&artist)?;
        let genre = item
            .genre
            .and_then(|g| g.name)
            .ok_or_else(|| QobuzError::missing("album", "genre.name"))?;

        Ok(Self {
            id: item.id,
            title: item.title.unwrap_or_default(),
            version: item.version,
            images: item.image,
            tracks_count: item.tracks_count,
            media_count: item.media_count,
            released_at: item.released_at,
            artist,
            genre,
            tracks: OnceCell::new(),
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn images(&self) -> Option<&AlbumImages> {
        self.images.as_ref()
    }

    pub fn tracks_count(&self) -> Option<u32> {
        self.tracks_count
    }

    pub fn media_count(&self) -> Option<u32> {
        self.media_count
    }

    /// Release date as a unix timestamp.
    pub fn released_at(&self) -> Option<i64> {
        self.released_at
    }

    pub fn artist(&self) -> &Artist {
        &self.artist
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Tracks of the album, fetched with `album/get` on first call.
    ///
    /// Every track carries a copy of this album taken before the listing
    /// resolved, not its own nested album. The copy compares equal to this
    /// album but has an empty track cache: calling `tracks` through
    /// `track.album()` issues its own `album/get`.
    pub fn tracks(&self, api: &dyn Transport, token: Option<&str>) -> Result<&[Track]> {
        if let Some(tracks) = self.tracks.get() {
            return Ok(tracks);
        }

        debug!(album_id = %self.id, "Resolving album tracks");
        let response = Self::from_id_raw(api, self.id.clone(), token)?;
        let tracks = items(&response, "tracks")?
            .iter()
            .map(|t| Track::with_album(t, self.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.tracks.get_or_init(|| tracks))
    }

    /// Whether [`Album::tracks`] has already been resolved.
    pub fn tracks_resolved(&self) -> bool {
        self.tracks.get().is_some()
    }

    /// Look up an album by id.
    pub fn from_id(api: &dyn Transport, id: impl Into<ItemId>, token: Option<&str>) -> Result<Self> {
        Self::from_json(&Self::from_id_raw(api, id, token)?)
    }

    pub fn from_id_raw(
        api: &dyn Transport,
        id: impl Into<ItemId>,
        token: Option<&str>,
    ) -> Result<Value> {
        api.request(
            "album/get",
            &Params::new().with("album_id", id.into()).with_token(token),
        )
    }

    /// One of the curated album lists.
    pub fn get_featured(
        api: &dyn Transport,
        kind: FeaturedType,
        page: Page,
        token: Option<&str>,
    ) -> Result<Vec<Self>> {
        let response = Self::get_featured_raw(api, kind, page, token)?;
        items(&response, "albums")?.iter().map(Self::from_json).collect()
    }

    pub fn get_featured_raw(
        api: &dyn Transport,
        kind: FeaturedType,
        page: Page,
        token: Option<&str>,
    ) -> Result<Value> {
        api.request(
            "album/getFeatured",
            &Params::new()
                .with("type", kind)
                .with("offset", page.offset)
                .with("limit", page.limit)
                .with_token(token),
        )
    }

    /// Search albums.
    pub fn search(
        api: &dyn Transport,
        query: &str,
        page: Page,
        token: Option<&str>,
    ) -> Result<Vec<Self>> {
        let response = Self::search_raw(api, query, page, token)?;
        items(&response, "albums")?.iter().map(Self::from_json).collect()
    }

    pub fn search_raw(
        api: &dyn Transport,
        query: &str,
        page: Page,
        token: Option<&str>,
    ) -> Result<Value> {
        api.request(
            "album/search",
            &Params::new()
                .with("query", query)
                .with("offset", page.offset)
                .with("limit", page.limit)
                .with_token(token),
        )
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.tracks_count == other.tracks_count
            && self.released_at == other.released_at
            && self.artist == other.artist
    }
}

impl Identified for Album {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl CatalogItem for Album {
    fn kind(&self) -> &'static str {
        "album"
    }
}
