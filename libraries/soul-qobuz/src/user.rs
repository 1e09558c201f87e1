//! The logged-in user and user-scoped operations.

use crate::album::Album;
use crate::artist::Artist;
use crate::batch::{batch_size, pack, DEFAULT_BATCH_SIZE};
use crate::error::Result;
use crate::http::md5_hex;
use crate::ids::{normalize, CatalogItem, Ids, ItemId};
use crate::playlist::Playlist;
use crate::track::Track;
use crate::transport::{items, parse, status_is, Params, Transport};
use crate::types::{AudioFormat, FavoriteType, FileIntent, Page, PlaylistFilter};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user_auth_token: String,
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    id: ItemId,
    credential: IdOnly,
    device: IdOnly,
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: ItemId,
}

/// Items to add to or remove from favorites, grouped by type.
#[derive(Debug, Default)]
pub struct FavoriteItems<'a> {
    pub artists: Option<Ids<'a, Artist>>,
    pub albums: Option<Ids<'a, Album>>,
    pub tracks: Option<Ids<'a, Track>>,
}

impl<'a> FavoriteItems<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artists(mut self, artists: impl Into<Ids<'a, Artist>>) -> Self {
        self.artists = Some(artists.into());
        self
    }

    pub fn albums(mut self, albums: impl Into<Ids<'a, Album>>) -> Self {
        self.albums = Some(albums.into());
        self
    }

    pub fn tracks(mut self, tracks: impl Into<Ids<'a, Track>>) -> Self {
        self.tracks = Some(tracks.into());
        self
    }
}

/// The user's favorites, as returned by [`User::favorites_get`].
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub tracks: Vec<Track>,
}

/// An authenticated Qobuz user.
///
/// Holds the session token that user-scoped requests need; entity methods
/// take it explicitly via [`User::auth_token`].
#[derive(Debug, Clone)]
pub struct User {
    username: String,
    auth_token: String,
    id: ItemId,
    credential_id: ItemId,
    device_id: ItemId,
}

impl User {
    /// Log in with username (or e-mail) and password.
    ///
    /// The password is sent as its MD5 hex digest. A random device id is
    /// generated when none is given.
    pub fn login(
        api: &dyn Transport,
        username: &str,
        password: &str,
        device_manufacturer_id: Option<&str>,
    ) -> Result<Self> {
        let device_manufacturer_id = device_manufacturer_id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        debug!(username = %username, "Attempting login");
        let response = api.request(
            "user/login",
            &Params::new()
                .with("username", username)
                .with("password", md5_hex(password))
                .with("device_manufacturer_id", device_manufacturer_id),
        )?;
        let login: LoginResponse = parse(&response, "login")?;

        info!(username = %username, user_id = %login.user.id, "Login successful");

        Ok(Self {
            username: username.to_string(),
            auth_token: login.user_auth_token,
            id: login.user.id,
            credential_id: login.user.credential.id,
            device_id: login.user.device.id,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn credential_id(&self) -> &ItemId {
        &self.credential_id
    }

    pub fn device_id(&self) -> &ItemId {
        &self.device_id
    }

    fn token(&self) -> Option<&str> {
        Some(self.auth_token.as_str())
    }

    /// Ask for a password reset e-mail.
    pub fn reset_password(api: &dyn Transport, username: &str) -> Result<bool> {
        let response = api.request(
            "user/resetPassword",
            &Params::new().with("username", username),
        )?;
        Ok(status_is(&response, "success"))
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Add artists, albums and tracks to favorites.
    ///
    /// Ids are packed into requests of at most [`DEFAULT_BATCH_SIZE`]; the
    /// first request that reports failure stops the rest and yields `false`.
    pub fn favorites_add(&self, api: &dyn Transport, items: FavoriteItems<'_>) -> Result<bool> {
        self.send_favorites(api, "favorite/create", items)
    }

    /// Remove artists, albums and tracks from favorites.
    pub fn favorites_del(&self, api: &dyn Transport, items: FavoriteItems<'_>) -> Result<bool> {
        self.send_favorites(api, "favorite/delete", items)
    }

    fn send_favorites(
        &self,
        api: &dyn Transport,
        endpoint: &str,
        items: FavoriteItems<'_>,
    ) -> Result<bool> {
        let artists = normalize(items.artists);
        let albums = normalize(items.albums);
        let tracks = normalize(items.tracks);
        let groups = pack(&artists, &albums, &tracks, batch_size(DEFAULT_BATCH_SIZE)?);

        for (index, group) in groups.iter().enumerate() {
            debug!(
                endpoint = %endpoint,
                group = index + 1,
                total = groups.len(),
                ids = group.len(),
                "Sending favorites group"
            );
            let response = api.request(
                endpoint,
                &group.apply(Params::new().with_token(self.token())),
            )?;

            if !status_is(&response, "success") {
                warn!(
                    endpoint = %endpoint,
                    group = index + 1,
                    "Favorites request reported failure, skipping remaining groups"
                );
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Whether `item` is among the user's favorites.
    pub fn favorites_status(&self, api: &dyn Transport, item: &dyn CatalogItem) -> Result<bool> {
        let response = api.request(
            "favorite/status",
            &Params::new()
                .with("item", item.item_id())
                .with("type", item.kind())
                .with_token(self.token()),
        )?;

        Ok(status_is(&response, "true") || response.get("status") == Some(&Value::Bool(true)))
    }

    /// Favorites of one type, or of every type when `kind` is `None`.
    pub fn favorites_get(
        &self,
        api: &dyn Transport,
        kind: Option<FavoriteType>,
        page: Page,
    ) -> Result<Favorites> {
        let response = self.favorites_get_raw(api, kind, page)?;
        let wants = |wanted: FavoriteType| kind.is_none() || kind == Some(wanted);

        let mut favorites = Favorites::default();
        if wants(FavoriteType::Artists) {
            favorites.artists = items(&response, "artists")?
                .iter()
                .map(Artist::from_json)
                .collect::<Result<_>>()?;
        }
        if wants(FavoriteType::Albums) {
            favorites.albums = items(&response, "albums")?
                .iter()
                .map(Album::from_json)
                .collect::<Result<_>>()?;
        }
        if wants(FavoriteType::Tracks) {
            favorites.tracks = items(&response, "tracks")?
                .iter()
                .map(Track::from_json)
                .collect::<Result<_>>()?;
        }

        Ok(favorites)
    }

    pub fn favorites_get_raw(
        &self,
        api: &dyn Transport,
        kind: Option<FavoriteType>,
        page: Page,
    ) -> Result<Value> {
        api.request(
            "favorite/getUserFavorites",
            &Params::new()
                .with_opt("type", kind)
                .with("limit", page.limit)
                .with("offset", page.offset)
                .with_token(self.token()),
        )
    }

    // =========================================================================
    // Playlists
    // =========================================================================

    /// The user's playlists.
    pub fn playlists_get(
        &self,
        api: &dyn Transport,
        filter: PlaylistFilter,
        page: Page,
    ) -> Result<Vec<Playlist>> {
        let response = self.playlists_get_raw(api, filter, page)?;
        items(&response, "playlists")?
            .iter()
            .map(Playlist::from_json)
            .collect()
    }

    pub fn playlists_get_raw(
        &self,
        api: &dyn Transport,
        filter: PlaylistFilter,
        page: Page,
    ) -> Result<Value> {
        api.request(
            "playlist/getUserPlaylists",
            &Params::new()
                .with("filter", filter)
                .with("limit", page.limit)
                .with("offset", page.offset)
                .with_token(self.token()),
        )
    }

    /// Create a playlist owned by this user.
    pub fn playlist_create(
        &self,
        api: &dyn Transport,
        name: &str,
        description: Option<&str>,
        is_public: bool,
        is_collaborative: bool,
    ) -> Result<Playlist> {
        let response = api.request(
            "playlist/create",
            &Params::new()
                .with("name", name)
                .with_opt("description", description)
                .with("is_public", u8::from(is_public))
                .with("is_collaborative", u8::from(is_collaborative))
                .with_token(self.token()),
        )?;
        let playlist = Playlist::from_json(&response)?;

        info!(playlist_id = %playlist.id(), name = %name, "Created playlist");
        Ok(playlist)
    }

    /// Delete a playlist, given as a [`Playlist`] or its id.
    pub fn playlist_delete(&self, api: &dyn Transport, playlist: impl Into<ItemId>) -> Result<bool> {
        let playlist_id = playlist.into();
        let response = api.request(
            "playlist/delete",
            &Params::new()
                .with("playlist_id", &playlist_id)
                .with_token(self.token()),
        )?;

        let deleted = status_is(&response, "success");
        info!(playlist_id = %playlist_id, deleted = deleted, "Deleted playlist");
        Ok(deleted)
    }

    // =========================================================================
    // Streaming
    // =========================================================================

    /// Signed URL of a track's audio file.
    pub fn get_file_url(
        &self,
        api: &dyn Transport,
        track_id: impl Into<ItemId>,
        format: Option<AudioFormat>,
        intent: Option<FileIntent>,
    ) -> Result<Option<String>> {
        let response = api.request(
            "track/getFileUrl",
            &Params::new()
                .with("track_id", track_id.into())
                .with_opt("format_id", format.map(AudioFormat::format_id))
                .with_opt("intent", intent)
                .with_token(self.token())
                .signed(),
        )?;

        Ok(response
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}
