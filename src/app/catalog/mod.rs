//! Catalog entities and snapshot storage
//!
//! - `models`: raw `Comic`, `Episode` and `HostTable` as delivered by a source
//! - `normalize`: display-text transforms
//! - `view`: the `ComicView` decorator applying normalization on read
//! - `store`: the `CatalogStore` holding swap-on-replace snapshots

pub mod models;
pub mod normalize;
pub mod store;
pub mod view;

pub use models::{Comic, Episode, HostTable};
pub use normalize::{Identity, TextNormalizer, UnicodeEscapes};
pub use store::{CatalogSnapshot, CatalogStore, ComicList, StoreStats};
pub use view::ComicView;
