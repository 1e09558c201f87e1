//! Playlists and batched track mutation.

use crate::batch::{batch_size, chunk};
use crate::error::{QobuzError, Result};
use crate::ids::{join, normalize, normalize_by, CatalogItem, Identified, Ids, ItemId};
use crate::track::Track;
use crate::transport::{items, parse, Params, Transport};
use crate::types::Page;
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroUsize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    id: ItemId,
    name: Option<String>,
    description: Option<String>,
    duration: Option<u64>,
    is_public: Option<bool>,
    is_collaborative: Option<bool>,
    tracks_count: Option<u32>,
    updated_at: Option<i64>,
}

/// A playlist from the Qobuz catalog.
///
/// Private playlists and every mutation need the owner's token.
#[derive(Debug, Clone)]
pub struct Playlist {
    id: ItemId,
    name: String,
    description: Option<String>,
    duration: Option<u64>,
    public: bool,
    collaborative: bool,
    tracks_count: Option<u32>,
    updated_at: Option<i64>,
}

impl Playlist {
    /// Build a playlist from its JSON representation.
    pub fn from_json(value: &Value) -> Result<Self> {
        let item: PlaylistItem = parse(value, "playlist")?;

        Ok(Self {
            id: item.id,
            name: item.name.unwrap_or_default(),
            description: item.description,
            duration: item.duration,
            public: item.is_public.unwrap_or(false),
            collaborative: item.is_collaborative.unwrap_or(false),
            tracks_count: item.tracks_count,
            updated_at: item.updated_at,
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> Option<u64> {
        self.duration
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn is_collaborative(&self) -> bool {
        self.collaborative
    }

    pub fn tracks_count(&self) -> Option<u32> {
        self.tracks_count
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }

    /// Tracks of the playlist. Each carries its `playlist_track_id`.
    pub fn get_tracks(
        &self,
        api: &dyn Transport,
        page: Page,
        token: Option<&str>,
    ) -> Result<Vec<Track>> {
        let response = self.get_tracks_raw(api, page, token)?;
        items(&response, "tracks")?.iter().map(Track::from_json).collect()
    }

    pub fn get_tracks_raw(
        &self,
        api: &dyn Transport,
        page: Page,
        token: Option<&str>,
    ) -> Result<Value> {
        api.request(
            "playlist/get",
            &Params::new()
                .with("playlist_id", &self.id)
                .with("extra", "tracks")
                .with("limit", page.limit)
                .with("offset", page.offset)
                .with_token(token),
        )
    }

    /// Append tracks, at most `max_per_request` ids per request.
    ///
    /// Entities contribute their track id. Chunks are sent in order and a
    /// failing chunk stops the rest; earlier chunks stay applied.
    pub fn add_tracks(
        &self,
        api: &dyn Transport,
        tracks: Ids<'_, Track>,
        token: &str,
        max_per_request: usize,
    ) -> Result<()> {
        let size = batch_size(max_per_request)?;
        let ids = normalize(Some(tracks));
        self.send_chunks(api, "playlist/addTracks", "track_ids", &ids, token, size)
    }

    /// Remove tracks, at most `max_per_request` ids per request.
    ///
    /// Entities contribute their `playlist_track_id`, so they must come from
    /// [`Playlist::get_tracks`]; raw ids are taken to be playlist track ids.
    pub fn del_tracks(
        &self,
        api: &dyn Transport,
        tracks: Ids<'_, Track>,
        token: &str,
        max_per_request: usize,
    ) -> Result<()> {
        let size = batch_size(max_per_request)?;
        let ids = normalize_by(Some(tracks), |track| {
            track
                .playlist_track_id()
                .map(ItemId::Int)
                .ok_or_else(|| QobuzError::missing("track", "playlist_track_id"))
        })?;
        self.send_chunks(
            api,
            "playlist/deleteTracks",
            "playlist_track_ids",
            &ids,
            token,
            size,
        )
    }

    fn send_chunks(
        &self,
        api: &dyn Transport,
        endpoint: &str,
        param: &str,
        ids: &[ItemId],
        token: &str,
        size: NonZeroUsize,
    ) -> Result<()> {
        let chunks = chunk(ids, size);
        let total = chunks.len();

        for (index, ids) in chunks.into_iter().enumerate() {
            debug!(
                playlist_id = %self.id,
                endpoint = %endpoint,
                chunk = index + 1,
                total = total,
                ids = ids.len(),
                "Sending playlist chunk"
            );
            api.request(
                endpoint,
                &Params::new()
                    .with("playlist_id", &self.id)
                    .with(param, join(ids))
                    .with_token(Some(token)),
            )?;
        }

        Ok(())
    }

    /// Look up a playlist by id.
    pub fn from_id(api: &dyn Transport, id: impl Into<ItemId>, token: Option<&str>) -> Result<Self> {
        Self::from_json(&Self::from_id_raw(api, id, token)?)
    }

    pub fn from_id_raw(
        api: &dyn Transport,
        id: impl Into<ItemId>,
        token: Option<&str>,
    ) -> Result<Value> {
        api.request(
            "playlist/get",
            &Params::new().with("playlist_id", id.into()).with_token(token),
        )
    }

    /// Search public playlists.
    pub fn search(
        api: &dyn Transport,
        query: &str,
        page: Page,
        token: Option<&str>,
    ) -> Result<Vec<Self>> {
        let response = Self::search_raw(api, query, page, token)?;
        items(&response, "playlists")?.iter().map(Self::from_json).collect()
    }

    pub fn search_raw(
        api: &dyn Transport,
        query: &str,
        page: Page,
        token: Option<&str>,
    ) -> Result<Value> {
        api.request(
            "playlist/search",
            &Params::new()
                .with("query", query)
                .with("limit", page.limit)
                .with("offset", page.offset)
                .with_token(token),
        )
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name && self.description == other.description
    }
}

impl Identified for Playlist {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl CatalogItem for Playlist {
    fn kind(&self) -> &'static str {
        "playlist"
    }
}

impl From<&Playlist> for ItemId {
    fn from(playlist: &Playlist) -> Self {
        playlist.id.clone()
    }
}
