//! Small value types shared by the catalog operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pagination for listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Number of elements returned per request
    pub limit: u32,
    /// Offset from which to obtain `limit` elements
    pub offset: u32,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

// =============================================================================
// Audio Formats
// =============================================================================

/// Stream formats, identified on the wire by their numeric format id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// MP3 320
    Mp3,
    /// FLAC Lossless
    Flac,
    /// FLAC Hi-Res 24 bit =< 96kHz
    HiRes,
    /// FLAC Hi-Res 24 bit >96 kHz & =< 192 kHz
    HiResHsr,
}

impl AudioFormat {
    pub fn format_id(self) -> u32 {
        match self {
            AudioFormat::Mp3 => 5,
            AudioFormat::Flac => 6,
            AudioFormat::HiRes => 7,
            AudioFormat::HiResHsr => 27,
        }
    }

    /// Best format a track can be streamed in, given its maximum bit depth
    /// and sampling rate (kHz).
    pub fn best_for(bit_depth: u32, sampling_rate_khz: f64) -> Self {
        if bit_depth < 24 {
            AudioFormat::Flac
        } else if sampling_rate_khz <= 96.0 {
            AudioFormat::HiRes
        } else {
            AudioFormat::HiResHsr
        }
    }
}

// =============================================================================
// Request Enumerations
// =============================================================================

/// Featured album lists served by `album/getFeatured`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeaturedType {
    MostStreamed,
    BestSellers,
    #[default]
    NewReleases,
    PressAwards,
    EditorPicks,
    MostFeatured,
    NewReleasesFull,
    RecentReleases,
    IdealDiscography,
    Qobuzissims,
    AlbumOfTheWeek,
    ReReleaseOfTheWeek,
}

impl FeaturedType {
    pub fn as_str(self) -> &'static str {
        match self {
            FeaturedType::MostStreamed => "most-streamed",
            FeaturedType::BestSellers => "best-sellers",
            FeaturedType::NewReleases => "new-releases",
            FeaturedType::PressAwards => "press-awards",
            FeaturedType::EditorPicks => "editor-picks",
            FeaturedType::MostFeatured => "most-featured",
            FeaturedType::NewReleasesFull => "new-releases-full",
            FeaturedType::RecentReleases => "recent-releases",
            FeaturedType::IdealDiscography => "ideal-discography",
            FeaturedType::Qobuzissims => "qobuzissims",
            FeaturedType::AlbumOfTheWeek => "album-of-the-week",
            FeaturedType::ReReleaseOfTheWeek => "re-release-of-the-week",
        }
    }
}

impl fmt::Display for FeaturedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the application will use a file URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIntent {
    Stream,
    Import,
    Download,
}

impl fmt::Display for FileIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileIntent::Stream => "stream",
            FileIntent::Import => "import",
            FileIntent::Download => "download",
        })
    }
}

/// Favorite listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteType {
    Artists,
    Albums,
    Tracks,
}

impl fmt::Display for FavoriteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FavoriteType::Artists => "artists",
            FavoriteType::Albums => "albums",
            FavoriteType::Tracks => "tracks",
        })
    }
}

/// Which of the user's playlists to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaylistFilter {
    #[default]
    Owner,
    Subscriber,
}

impl fmt::Display for PlaylistFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlaylistFilter::Owner => "owner",
            PlaylistFilter::Subscriber => "subscriber",
        })
    }
}
