use log::{error, info, warn};
use url::Url;

use super::dom::Dom;
use super::templates::{self, AssetPaths};
use crate::config::ClientOptions;
use crate::editor::derive_slug;
use crate::error::Result;
use crate::fetch::HttpClient;
use crate::models::{Category, Product};
use crate::resources::Collection;

pub const GRID_SELECTORS: &str = ".product-items-grid, .products-grid, .product-wrapper";
pub const FILTER_SELECTORS: &str = ".category-filter, .product-filter";
pub const DETAIL_IMAGE_SELECTORS: &str = ".product-large-image img, .product-thumbs img";
pub const DETAIL_TITLE_SELECTORS: &str = ".product-title h1, .product-details h1";
pub const DETAIL_DESCRIPTION_SELECTORS: &str = ".product-description, .product-content p";
pub const DETAIL_FEATURE_SELECTORS: &str = ".product-features, .pro-details-feature";

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Storefront settings on top of the client options
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub placeholder_image: String,
    pub product_page: String,
    pub site_name: String,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            placeholder_image: "assets/images/placeholder-product.png".to_string(),
            product_page: "single-product.html".to_string(),
            site_name: "Furns Portfolio".to_string(),
        }
    }
}

impl SiteOptions {
    pub fn with_placeholder_image(mut self, value: &str) -> Self {
        self.placeholder_image = value.to_string();
        self
    }

    pub fn with_product_page(mut self, value: &str) -> Self {
        self.product_page = value.to_string();
        self
    }

    pub fn with_site_name(mut self, value: &str) -> Self {
        self.site_name = value.to_string();
        self
    }
}

/// Current page address as the browser reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    /// Parse an absolute URL, or a path with an optional query string
    pub fn parse(raw: &str) -> Result<Self> {
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse("http://localhost/")?.join(raw)?
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
        })
    }

    /// First value of `name` in the query string
    pub fn param(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Whether `product` belongs to the category a filter button names.
/// Buttons carry slugs while products carry names, so both are accepted.
fn in_category(product: &Product, filter: &str) -> bool {
    product.category.eq_ignore_ascii_case(filter)
        || derive_slug(&product.category) == filter.to_lowercase()
}

/// Read-only storefront pipeline that renders published catalog data into
/// a page through the [`Dom`] seam. Every step degrades to an empty or
/// error state instead of failing.
#[derive(Debug, Clone)]
pub struct Storefront {
    http: HttpClient,
    paths: AssetPaths,
    options: SiteOptions,
}

impl Storefront {
    pub fn new(client_options: &ClientOptions, options: SiteOptions) -> Result<Self> {
        let http = HttpClient::new(client_options)?;
        let paths = AssetPaths {
            origin: client_options.backend_url.clone(),
            placeholder_image: options.placeholder_image.clone(),
            product_page: options.product_page.clone(),
        };
        Ok(Self {
            http,
            paths,
            options,
        })
    }

    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    fn products(&self) -> Collection<Product> {
        Collection::new(self.http.clone())
    }

    fn categories(&self) -> Collection<Category> {
        Collection::new(self.http.clone())
    }

    /// All categories, or none if the backend is unreachable
    pub async fn load_categories(&self) -> Vec<Category> {
        match self.categories().list().await {
            Ok(categories) => {
                info!("loaded {} categories", categories.len());
                categories
            }
            Err(e) => {
                warn!("error loading categories: {}", e);
                Vec::new()
            }
        }
    }

    /// Active products, optionally limited to one category. `"all"` means no filter.
    pub async fn load_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        let filter = category.filter(|c| !c.is_empty() && *c != "all");
        let products = self.products().list().await?;
        let products: Vec<Product> = products
            .into_iter()
            .filter(|p| filter.map_or(true, |f| in_category(p, f)))
            .filter(Product::is_active)
            .collect();
        info!(
            "loaded {} products ({})",
            products.len(),
            filter.unwrap_or("all")
        );
        Ok(products)
    }

    /// Write the grid. Returns whether a grid container was found.
    pub fn render_products(&self, dom: &mut dyn Dom, products: &[Product]) -> bool {
        let html = templates::product_grid(products, &self.paths);
        if !dom.set_inner_html(GRID_SELECTORS, &html) {
            warn!("product grid container not found");
            return false;
        }
        true
    }

    /// Write the filter buttons with `active` (a slug) selected.
    pub fn render_categories(
        &self,
        dom: &mut dyn Dom,
        categories: &[Category],
        active: Option<&str>,
    ) -> bool {
        let html = templates::category_filter(categories, active);
        if !dom.set_inner_html(FILTER_SELECTORS, &html) {
            warn!("category filter container not found");
            return false;
        }
        true
    }

    fn render_error(&self, dom: &mut dyn Dom) {
        dom.set_inner_html(GRID_SELECTORS, &templates::error_state());
    }

    /// A filter button was clicked: mark it active and re-run the product
    /// load and render scoped to that category.
    pub async fn select_category(
        &self,
        dom: &mut dyn Dom,
        categories: &[Category],
        category: &str,
    ) {
        let active = Some(category).filter(|c| *c != "all");
        self.render_categories(dom, categories, active);
        match self.load_products(active).await {
            Ok(products) => {
                self.render_products(dom, &products);
            }
            Err(e) => {
                error!("error loading products for {}: {}", category, e);
                self.render_error(dom);
            }
        }
    }

    /// Page load: filters, then the full grid, then the detail view when
    /// the location is the product page. Returns the loaded categories so
    /// later filter clicks can re-render the buttons.
    pub async fn initialize(&self, dom: &mut dyn Dom, location: &Location) -> Vec<Category> {
        let categories = self.load_categories().await;
        self.render_categories(dom, &categories, None);

        match self.load_products(None).await {
            Ok(products) => {
                self.render_products(dom, &products);
            }
            Err(e) => {
                error!("error initializing storefront: {}", e);
                self.render_error(dom);
            }
        }

        if location.path.contains(&self.options.product_page) {
            self.render_single_product(dom, location).await;
        }
        categories
    }

    /// Patch the detail page for the product named by `?id=`.
    /// Returns whether a product was rendered. A product that cannot be
    /// loaded leaves "Product not found" in the title.
    pub async fn render_single_product(&self, dom: &mut dyn Dom, location: &Location) -> bool {
        let Some(id) = location.param("id").filter(|id| !id.is_empty()) else {
            warn!("no product id in location");
            return false;
        };

        let product = match self.products().get(&id).await {
            Ok(product) => product,
            Err(e) => {
                error!("error loading product {}: {}", id, e);
                dom.set_text(DETAIL_TITLE_SELECTORS, PRODUCT_NOT_FOUND);
                return false;
            }
        };

        dom.set_title(&format!("{} - {}", product.name, self.options.site_name));

        let slots = dom.image_count(DETAIL_IMAGE_SELECTORS);
        for (index, image) in product.images.iter().take(slots).enumerate() {
            let src = self.paths.image_url(image);
            dom.set_image(DETAIL_IMAGE_SELECTORS, index, &src, &product.name);
        }

        dom.set_text(DETAIL_TITLE_SELECTORS, &product.name);
        dom.set_text(DETAIL_DESCRIPTION_SELECTORS, &product.description);

        if !product.features.is_empty() {
            dom.set_inner_html(
                DETAIL_FEATURE_SELECTORS,
                &templates::feature_list(&product.features),
            );
        }

        info!("rendered product {}", product.id);
        true
    }
}
