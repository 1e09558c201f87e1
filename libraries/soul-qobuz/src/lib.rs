//! Soul Player Qobuz Client
//!
//! Typed object model over the Qobuz catalog API.
//!
//! # Features
//!
//! - **Entities**: `Album`, `Artist`, `Track` and `Playlist` built from API
//!   payloads, with album tracks and track artists fetched lazily
//! - **Batching**: playlist edits and favorites are split into bounded-size
//!   requests sent strictly in order
//! - **Transport**: a synchronous [`Transport`] seam with a blocking HTTP
//!   implementation that signs requests when needed
//!
//! # Example
//!
//! ```ignore
//! use soul_qobuz::{Album, ClientConfig, HttpTransport, Page, User};
//!
//! let api = HttpTransport::new(ClientConfig::load(None)?)?;
//! let user = User::login(&api, "user@example.com", "password", None)?;
//!
//! let albums = Album::search(&api, "spirit of eden", Page::default(), Some(user.auth_token()))?;
//! for track in albums[0].tracks(&api, Some(user.auth_token()))? {
//!     println!("{} - {}", track.track_number().unwrap_or_default(), track.title());
//! }
//! ```

mod album;
mod artist;
mod batch;
mod config;
mod error;
mod http;
mod ids;
mod playlist;
mod track;
mod transport;
mod types;
mod user;

pub use album::{Album, AlbumImages};
pub use artist::Artist;
pub use batch::{batch_size, chunk, pack, BatchGroup, Category, DEFAULT_BATCH_SIZE};
pub use config::ClientConfig;
pub use error::{QobuzError, Result};
pub use http::{request_signature, HttpTransport};
pub use ids::{join, normalize, normalize_by, CatalogItem, Identified, Ids, ItemId};
pub use playlist::Playlist;
pub use track::Track;
pub use transport::{Params, Transport, USER_AUTH_TOKEN};
pub use types::{AudioFormat, FavoriteType, FeaturedType, FileIntent, Page, PlaylistFilter};
pub use user::{FavoriteItems, Favorites, User};
