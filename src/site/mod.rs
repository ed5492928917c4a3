//! Public storefront renderer.
//!
//! Fetches published catalog data and writes it into a pre-built page:
//! category filter buttons, the product grid and the single-product detail
//! view. The page is reached only through the [`Dom`] trait; [`StaticPage`]
//! is the in-memory implementation used for static rendering.

mod dom;
mod storefront;
pub mod templates;

pub use dom::{Dom, ImageSlot, StaticPage};
pub use storefront::{
    Location, SiteOptions, Storefront, DETAIL_DESCRIPTION_SELECTORS, DETAIL_FEATURE_SELECTORS,
    DETAIL_IMAGE_SELECTORS, DETAIL_TITLE_SELECTORS, FILTER_SELECTORS, GRID_SELECTORS,
};
pub use templates::AssetPaths;
