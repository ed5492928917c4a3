//! Furns admin client library
//!
//! A Rust client for the Furns portfolio catalog backend, providing the
//! admin console's data layer (typed resources, a query cache with
//! mutation-driven invalidation, list pages and draft editors) and the
//! public storefront renderer.

pub mod config;
pub mod editor;
pub mod error;
pub mod fetch;
pub mod models;
pub mod notify;
pub mod pages;
pub mod query;
pub mod resources;
pub mod site;

pub use crate::config::ClientOptions;
pub use crate::error::{Error, Result};
pub use crate::query::QueryCache;
pub use crate::resources::AdminClient;

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::editor::{CategoryEditor, ProductEditor};
    pub use crate::error::{Error, Result};
    pub use crate::models::{Blog, Category, Image, Product};
    pub use crate::notify::{Confirm, LogNotifier, Notifier};
    pub use crate::query::{MutationKind, QueryCache, QueryKey};
    pub use crate::resources::{AdminClient, UploadFile};
    pub use crate::site::{SiteOptions, StaticPage, Storefront};
}
