//! Catalog identifiers and the normalization of id collections.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog identifier.
///
/// Qobuz uses integers for artists, tracks and playlists and strings for
/// albums (e.g. `"0060253780968"`); both travel the wire as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{id}"),
            ItemId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<i32> for ItemId {
    fn from(id: i32) -> Self {
        ItemId::Int(i64::from(id))
    }
}

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        ItemId::Int(i64::from(id))
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Str(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        ItemId::Str(id)
    }
}

/// Anything that carries a catalog id.
pub trait Identified {
    fn item_id(&self) -> &ItemId;
}

/// A catalog entity that can be favorited or looked up by type.
pub trait CatalogItem: Identified {
    /// Wire name of the entity type (`"album"`, `"artist"`, ...).
    fn kind(&self) -> &'static str;
}

/// A collection of ids supplied either as raw identifiers or as entities.
///
/// The two forms cannot be mixed.
#[derive(Debug, Clone)]
pub enum Ids<'a, E> {
    Raw(Vec<ItemId>),
    Entities(&'a [E]),
}

impl<'a, E> Ids<'a, E> {
    /// Raw ids from anything convertible to [`ItemId`].
    pub fn raw<I: Into<ItemId>>(ids: impl IntoIterator<Item = I>) -> Self {
        Ids::Raw(ids.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Ids::Raw(ids) => ids.len(),
            Ids::Entities(entities) => entities.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a, E> From<&'a [E]> for Ids<'a, E> {
    fn from(entities: &'a [E]) -> Self {
        Ids::Entities(entities)
    }
}

impl<'a, E> From<&'a Vec<E>> for Ids<'a, E> {
    fn from(entities: &'a Vec<E>) -> Self {
        Ids::Entities(entities.as_slice())
    }
}

/// Flatten an optional id collection into scalar ids, in order.
pub fn normalize<E: Identified>(ids: Option<Ids<'_, E>>) -> Vec<ItemId> {
    match ids {
        None => Vec::new(),
        Some(Ids::Raw(ids)) => ids,
        Some(Ids::Entities(entities)) => entities.iter().map(|e| e.item_id().clone()).collect(),
    }
}

/// Like [`normalize`], but entities are mapped through `key`, which may fail
/// when the entity lacks the id being asked for.
pub fn normalize_by<E>(
    ids: Option<Ids<'_, E>>,
    key: impl FnMut(&E) -> Result<ItemId>,
) -> Result<Vec<ItemId>> {
    match ids {
        None => Ok(Vec::new()),
        Some(Ids::Raw(ids)) => Ok(ids),
        Some(Ids::Entities(entities)) => entities.iter().map(key).collect(),
    }
}

/// Join ids into the comma-separated form batch endpoints expect.
pub fn join(ids: &[ItemId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QobuzError;

    struct Thing(ItemId);

    impl Identified for Thing {
        fn item_id(&self) -> &ItemId {
            &self.0
        }
    }

    #[test]
    fn test_normalize_absent_and_empty() {
        assert!(normalize::<Thing>(None).is_empty());
        assert!(normalize::<Thing>(Some(Ids::Raw(vec![]))).is_empty());
        assert!(normalize::<Thing>(Some(Ids::Entities(&[]))).is_empty());
    }

    #[test]
    fn test_normalize_entities_keeps_order() {
        let things = vec![Thing(ItemId::Int(5)), Thing(ItemId::Int(9))];
        assert_eq!(
            normalize(Some(Ids::from(&things))),
            vec![ItemId::Int(5), ItemId::Int(9)]
        );
    }

    #[test]
    fn test_normalize_raw_passthrough() {
        let ids: Ids<'_, Thing> = Ids::raw([3i64, 4]);
        assert_eq!(normalize(Some(ids)), vec![ItemId::Int(3), ItemId::Int(4)]);

        let ids: Ids<'_, Thing> = Ids::raw(["0060253780968"]);
        assert_eq!(
            normalize(Some(ids)),
            vec![ItemId::Str("0060253780968".into())]
        );
    }

    #[test]
    fn test_normalize_by_propagates_key_error() {
        let things = vec![Thing(ItemId::Int(1)), Thing(ItemId::Int(2))];
        let result = normalize_by(Some(Ids::from(&things)), |t| match &t.0 {
            ItemId::Int(2) => Err(QobuzError::missing("track", "playlist_track_id")),
            id => Ok(id.clone()),
        });
        assert!(matches!(result, Err(QobuzError::MissingField { .. })));
    }

    #[test]
    fn test_join_and_deserialize() {
        let ids: Vec<ItemId> = serde_json::from_str(r#"[1, "abc", 3]"#).unwrap();
        assert_eq!(join(&ids), "1,abc,3");
        assert_eq!(join(&[]), "");
    }
}
