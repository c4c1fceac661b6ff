pub mod client;
pub mod collection;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod refresh;
pub mod resolver;
pub mod selector;
pub mod store;
pub mod tracklist;

// Re-export commonly used items
pub use client::{CatalogClient, ReleaseDetail};
pub use collection::{CollectionDocument, CollectionStore};
pub use config::Config;
pub use error::{Error, Result, UpstreamError};
pub use models::{Album, FALLBACK_IMAGE, ImageCandidate, ImageKind, ImageType, ReleaseId, ResolvedImages};
pub use normalize::{heal_missing_local, normalize_album};
pub use refresh::{RefreshOutcome, RefreshStatus, refresh_album_images};
pub use resolver::ImageResolver;
pub use selector::{Selection, looks_like_back, select};
pub use store::ImageStore;
pub use tracklist::{RetryPolicy, fetch_tracklist};
