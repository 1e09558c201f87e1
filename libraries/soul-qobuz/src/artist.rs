//! Artists.

use crate::album::Album;
use crate::error::Result;
use crate::ids::{CatalogItem, Identified, ItemId};
use crate::track::Track;
use crate::transport::{items, parse, Params, Transport};
use crate::types::Page;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ArtistItem {
    id: ItemId,
    name: Option<String>,
    picture: Option<String>,
    slug: Option<String>,
    albums_count: Option<u32>,
    biography: Option<Biography>,
}

#[derive(Debug, Deserialize)]
struct Biography {
    summary: Option<String>,
}

/// An artist from the Qobuz catalog.
#[derive(Debug, Clone)]
pub struct Artist {
    id: ItemId,
    name: String,
    picture: Option<String>,
    slug: String,
    albums_count: u32,
    biography: Option<String>,
}

impl Artist {
    /// Build an artist from its JSON representation.
    pub fn from_json(value: &Value) -> Result<Self> {
        let item: ArtistItem = parse(value, "artist")?;

        Ok(Self {
            id: item.id,
            name: item.name.unwrap_or_default(),
            picture: item.picture,
            slug: item.slug.unwrap_or_default(),
            albums_count: item.albums_count.unwrap_or_default(),
            biography: item.biography.and_then(|b| b.summary),
        })
    }

    /// Placeholder for tracks without a performer: id -1, empty name, slug
    /// and picture, no albums.
    pub fn unknown() -> Self {
        Self {
            id: ItemId::Int(-1),
            name: String::new(),
            picture: Some(String::new()),
            slug: String::new(),
            albums_count: 0,
            biography: None,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn albums_count(&self) -> u32 {
        self.albums_count
    }

    pub fn biography(&self) -> Option<&str> {
        self.biography.as_deref()
    }

    /// Tracks by this artist.
    pub fn get_all_tracks(&self, api: &dyn Transport, page: Page) -> Result<Vec<Track>> {
        let response = self.get_extra(api, "tracks", page)?;
        items(&response, "tracks")?.iter().map(Track::from_json).collect()
    }

    /// Albums by this artist.
    pub fn get_all_albums(&self, api: &dyn Transport, page: Page) -> Result<Vec<Album>> {
        let response = self.get_extra(api, "albums", page)?;
        items(&response, "albums")?.iter().map(Album::from_json).collect()
    }

    fn get_extra(&self, api: &dyn Transport, extra: &str, page: Page) -> Result<Value> {
        debug!(artist_id = %self.id, extra = %extra, "Fetching artist listing");
        api.request(
            "artist/get",
            &Params::new()
                .with("artist_id", &self.id)
                .with("extra", extra)
                .with("offset", page.offset)
                .with("limit", page.limit),
        )
    }

    /// Look up an artist by id.
    pub fn from_id(api: &dyn Transport, id: impl Into<ItemId>, token: Option<&str>) -> Result<Self> {
        Self::from_json(&Self::from_id_raw(api, id, token)?)
    }

    pub fn from_id_raw(
        api: &dyn Transport,
        id: impl Into<ItemId>,
        token: Option<&str>,
    ) -> Result<Value> {
        api.request(
            "artist/get",
            &Params::new().with("artist_id", id.into()).with_token(token),
        )
    }

    /// Search artists by name.
    pub fn search(api: &dyn Transport, query: &str, page: Page) -> Result<Vec<Self>> {
        let response = Self::search_raw(api, query, page)?;
        items(&response, "artists")?.iter().map(Self::from_json).collect()
    }

    pub fn search_raw(api: &dyn Transport, query: &str, page: Page) -> Result<Value> {
        api.request(
            "artist/search",
            &Params::new()
                .with("query", query)
                .with("limit", page.limit)
                .with("offset", page.offset),
        )
    }
}

impl PartialEq for Artist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.picture == other.picture
            && self.slug == other.slug
            && self.albums_count == other.albums_count
    }
}

impl Identified for Artist {
    fn item_id(&self) -> &ItemId {
        &self.id
    }
}

impl CatalogItem for Artist {
    fn kind(&self) -> &'static str {
        "artist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QobuzError;
    use crate::transport::MockTransport;
    use serde_json::json;

    #[test]
    fn test_from_json_reads_biography_summary() {
        let artist = Artist::from_json(&json!({
            "id": 38895,
            "name": "Talk Talk",
            "picture": null,
            "slug": "talk-talk",
            "albums_count": 21,
            "biography": {"summary": "English band", "content": "..."}
        }))
        .unwrap();

        assert_eq!(artist.id(), &ItemId::Int(38895));
        assert_eq!(artist.name(), "Talk Talk");
        assert_eq!(artist.biography(), Some("English band"));
        assert_eq!(artist.kind(), "artist");
    }

    #[test]
    fn test_missing_optional_fields() {
        let artist = Artist::from_json(&json!({"id": 7})).unwrap();
        assert_eq!(artist.name(), "");
        assert_eq!(artist.albums_count(), 0);
        assert!(artist.biography().is_none());
        assert!(artist.picture().is_none());
    }

    #[test]
    fn test_payload_without_id_is_not_a_transport_error() {
        let err = Artist::from_json(&json!({"name": "No Id"})).unwrap_err();
        assert!(matches!(
            err,
            QobuzError::InvalidPayload { entity: "artist", .. }
        ));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_unknown_placeholder() {
        let artist = Artist::unknown();
        assert_eq!(artist.id(), &ItemId::Int(-1));
        assert_eq!(artist.name(), "");
        assert_eq!(artist.slug(), "");
        assert_eq!(artist.picture(), Some(""));
        assert_eq!(artist.albums_count(), 0);
    }

    #[test]
    fn test_equality_ignores_biography() {
        let a = Artist::from_json(&json!({"id": 1, "name": "A", "biography": {"summary": "x"}}))
            .unwrap();
        let b = Artist::from_json(&json!({"id": 1, "name": "A"})).unwrap();
        let c = Artist::from_json(&json!({"id": 1, "name": "B"})).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_get_all_albums_requests_extra() {
        let mut api = MockTransport::new();
        api.expect_request()
            .withf(|endpoint, params| {
                endpoint == "artist/get"
                    && params.get("extra") == Some("albums")
                    && params.get("artist_id") == Some("7")
                    && params.get("limit") == Some("10")
            })
            .times(1)
            .returning(|_, _| {
                Ok(json!({"albums": {"items": [{
                    "id": "abc",
                    "title": "Spirit of Eden",
                    "artist": {"id": 7, "name": "Talk Talk"},
                    "genre": {"name": "Rock"}
                }]}}))
            });

        let artist = Artist::from_json(&json!({"id": 7})).unwrap();
        let albums = artist.get_all_albums(&api, Page::new(10, 0)).unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].title(), "Spirit of Eden");
    }
}
