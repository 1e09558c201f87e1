//! Splitting id collections into bounded-size requests.
//!
//! Mutating endpoints put their ids in the query string, so large requests
//! are split into groups of at most [`DEFAULT_BATCH_SIZE`] ids (or a
//! caller-chosen size) and sent one after another.

use crate::error::{QobuzError, Result};
use crate::ids::{join, ItemId};
use crate::transport::Params;
use std::num::NonZeroUsize;

/// Maximum number of ids sent in one request unless the caller says otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Validate a per-request size.
pub fn batch_size(size: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(size).ok_or(QobuzError::InvalidBatchSize)
}

/// Split `items` into consecutive chunks of `size`; only the last may be
/// shorter.
pub fn chunk<T>(items: &[T], size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(size.get()).collect()
}

/// Id categories a favorites request can carry, in packing priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Artists,
    Albums,
    Tracks,
}

impl Category {
    /// Query parameter the category's ids are sent under.
    pub fn param_name(self) -> &'static str {
        match self {
            Category::Artists => "artist_ids",
            Category::Albums => "album_ids",
            Category::Tracks => "track_ids",
        }
    }
}

/// One request's worth of ids, possibly spanning several categories.
///
/// Only categories that contributed ids are present, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchGroup {
    entries: Vec<(Category, Vec<ItemId>)>,
}

impl BatchGroup {
    /// Total number of ids across all categories.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, ids)| ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, category: Category) -> Option<&[ItemId]> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, ids)| ids.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    /// Write every category as a comma-joined parameter.
    pub fn apply(&self, mut params: Params) -> Params {
        for (category, ids) in &self.entries {
            params.insert(category.param_name(), join(ids));
        }
        params
    }

    fn push(&mut self, category: Category, ids: &[ItemId]) {
        self.entries.push((category, ids.to_vec()));
    }
}

/// Pack artists, albums and tracks into groups of at most `size` ids.
///
/// Categories are drained greedily in that order. A group is closed as soon
/// as it holds exactly `size` ids, and packing resumes with whatever is left
/// of the current category. A trailing partial group is kept; three empty
/// inputs produce no groups.
pub fn pack(
    artists: &[ItemId],
    albums: &[ItemId],
    tracks: &[ItemId],
    size: NonZeroUsize,
) -> Vec<BatchGroup> {
    let size = size.get();
    let mut groups = Vec::new();
    let mut current = BatchGroup::default();

    for (category, mut remaining) in [
        (Category::Artists, artists),
        (Category::Albums, albums),
        (Category::Tracks, tracks),
    ] {
        while !remaining.is_empty() {
            let room = size - current.len();
            let (taken, rest) = remaining.split_at(room.min(remaining.len()));
            current.push(category, taken);
            remaining = rest;

            if current.len() == size {
                groups.push(std::mem::take(&mut current));
            }
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::RangeInclusive<i64>) -> Vec<ItemId> {
        range.map(ItemId::Int).collect()
    }

    fn n(size: usize) -> NonZeroUsize {
        NonZeroUsize::new(size).unwrap()
    }

    #[test]
    fn test_batch_size_rejects_zero() {
        assert!(matches!(batch_size(0), Err(QobuzError::InvalidBatchSize)));
        assert_eq!(batch_size(50).unwrap().get(), 50);
    }

    #[test]
    fn test_chunk_keeps_remainder() {
        let items: Vec<u32> = (0..7).collect();
        let chunks = chunk(&items, n(3));
        assert_eq!(chunks, vec![&[0, 1, 2][..], &[3, 4, 5][..], &[6][..]]);
    }

    #[test]
    fn test_chunk_exact_multiple_and_empty() {
        let items: Vec<u32> = (0..6).collect();
        assert_eq!(chunk(&items, n(3)).len(), 2);
        assert!(chunk::<u32>(&[], n(3)).is_empty());
    }

    #[test]
    fn test_chunk_concatenation_reproduces_input() {
        let items: Vec<u32> = (0..103).collect();
        for size in 1..=20 {
            let chunks = chunk(&items, n(size));
            assert_eq!(chunks.concat(), items);
            let (last, full) = chunks.split_last().unwrap();
            assert!(full.iter().all(|c| c.len() == size));
            let expected_last = if items.len() % size == 0 { size } else { items.len() % size };
            assert_eq!(last.len(), expected_last);
        }
    }

    #[test]
    fn test_pack_spills_into_next_category() {
        let groups = pack(&ids(1..=60), &[], &ids(7..=8), n(50));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].get(Category::Artists), Some(&ids(1..=50)[..]));
        assert_eq!(groups[0].categories().count(), 1);
        assert_eq!(groups[1].get(Category::Artists), Some(&ids(51..=60)[..]));
        assert_eq!(groups[1].get(Category::Albums), None);
        assert_eq!(groups[1].get(Category::Tracks), Some(&ids(7..=8)[..]));
    }

    #[test]
    fn test_pack_closes_group_at_exact_budget() {
        let groups = pack(&ids(1..=30), &ids(31..=50), &ids(51..=55), n(50));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 50);
        assert_eq!(
            groups[0].categories().collect::<Vec<_>>(),
            vec![Category::Artists, Category::Albums]
        );
        assert_eq!(groups[1].categories().collect::<Vec<_>>(), vec![Category::Tracks]);
    }

    #[test]
    fn test_pack_category_split_across_groups() {
        let groups = pack(&[], &ids(1..=120), &ids(200..=210), n(50));

        let lens: Vec<_> = groups.iter().map(BatchGroup::len).collect();
        assert_eq!(lens, vec![50, 50, 31]);
        assert_eq!(groups[2].get(Category::Albums), Some(&ids(101..=120)[..]));
        assert_eq!(groups[2].get(Category::Tracks), Some(&ids(200..=210)[..]));
    }

    #[test]
    fn test_pack_empty_inputs_produce_nothing() {
        assert!(pack(&[], &[], &[], n(50)).is_empty());
    }

    #[test]
    fn test_pack_preserves_every_id_once() {
        let artists = ids(1..=17);
        let albums = ids(100..=140);
        let tracks = ids(500..=533);

        for size in 1..=25 {
            let groups = pack(&artists, &albums, &tracks, n(size));
            assert!(groups.iter().all(|g| g.len() <= size && !g.is_empty()));

            for (category, expected) in [
                (Category::Artists, &artists),
                (Category::Albums, &albums),
                (Category::Tracks, &tracks),
            ] {
                let flattened: Vec<ItemId> = groups
                    .iter()
                    .filter_map(|g| g.get(category))
                    .flatten()
                    .cloned()
                    .collect();
                assert_eq!(&flattened, expected);
            }
        }
    }

    #[test]
    fn test_apply_writes_comma_joined_params() {
        let groups = pack(&ids(1..=2), &[], &ids(9..=9), n(50));
        let params = groups[0].apply(Params::new().with("user_auth_token", "tok"));

        assert_eq!(params.get("artist_ids"), Some("1,2"));
        assert_eq!(params.get("track_ids"), Some("9"));
        assert_eq!(params.get("album_ids"), None);
        assert_eq!(params.get("user_auth_token"), Some("tok"));
    }
}
