//! Query cache and mutation-driven invalidation
//!
//! List views read through a [`QueryCache`] keyed by [`QueryKey`]. Writes go
//! through [`QueryCache::mutate`], and a successful write marks the keys its
//! [`MutationKind`] depends on as stale. There is no local patching and no
//! retry; concurrent writes are not serialised, the last invalidation wins.

mod cache;
mod key;
mod view;

pub use cache::QueryCache;
pub use key::{InvalidationTable, MutationKind, QueryKey};
pub use view::ViewHandle;
