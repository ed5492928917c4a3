//! Markup fragments for the storefront. Every interpolated value is escaped.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::models::{Category, Product};

const FEATURE_PREVIEW: usize = 3;
const DEFAULT_FEATURES: &str = "Premium Quality";

/// Where the storefront finds uploaded assets and its own pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    /// Origin serving `/uploads`, e.g. `http://localhost:8001`
    pub origin: String,
    /// Shown when a product has no images
    pub placeholder_image: String,
    /// Detail page products link to
    pub product_page: String,
}

impl AssetPaths {
    /// Absolute image URL. Absolute URLs pass through, rooted paths are
    /// joined to the origin, bare file names live under `/uploads`.
    pub fn image_url(&self, image: &str) -> String {
        let origin = self.origin.trim_end_matches('/');
        if image.starts_with("http://") || image.starts_with("https://") {
            image.to_string()
        } else if image.starts_with('/') {
            format!("{}{}", origin, image)
        } else {
            format!("{}/uploads/{}", origin, image)
        }
    }

    /// First image of a product, or the placeholder
    pub fn cover_image(&self, product: &Product) -> String {
        match product.images.iter().find(|i| !i.trim().is_empty()) {
            Some(image) => self.image_url(image),
            None => self.placeholder_image.clone(),
        }
    }

    pub fn product_link(&self, product: &Product) -> String {
        format!(
            "{}?id={}",
            self.product_page,
            url::form_urlencoded::byte_serialize(product.id.as_bytes()).collect::<String>()
        )
    }
}

/// First few features joined, or a stock phrase
pub fn features_summary(product: &Product) -> String {
    if product.features.is_empty() {
        return DEFAULT_FEATURES.to_string();
    }
    product
        .features
        .iter()
        .take(FEATURE_PREVIEW)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn product_card(product: &Product, paths: &AssetPaths) -> String {
    let image = paths.cover_image(product);
    let link = paths.product_link(product);
    let flag = if product.featured {
        r#"<span class="product-flag">Featured</span>"#
    } else {
        ""
    };

    format!(
        r#"<div class="col-lg-4 col-md-6 col-sm-6 col-xs-6 mb-30">
    <div class="product-item">
        <div class="product-img">
            <a href="{link}">
                <img class="default-img" src="{image}" alt="{alt}" />
                <img class="hover-img" src="{image}" alt="{alt}" />
            </a>
            {flag}
        </div>
        <div class="product-content">
            <div class="product-content-wrap">
                <h4><a href="{link}">{name}</a></h4>
                <p class="product-features">{features}</p>
                <div class="product-action">
                    <a href="{link}" class="view-details btn btn-primary">View Details</a>
                </div>
            </div>
        </div>
    </div>
</div>"#,
        link = attr(&link),
        image = attr(&image),
        alt = attr(&product.name),
        flag = flag,
        name = text(&product.name),
        features = text(&features_summary(product)),
    )
}

pub fn empty_state() -> String {
    r#"<div class="col-12">
    <div class="text-center py-5">
        <h4>No products found</h4>
        <p class="text-muted">Try adjusting your filter criteria</p>
    </div>
</div>"#
        .to_string()
}

pub fn error_state() -> String {
    r#"<div class="col-12">
    <div class="alert alert-warning text-center">
        <h4>Unable to load products</h4>
        <p>Please check your connection and try again.</p>
    </div>
</div>"#
        .to_string()
}

/// The whole grid; an explicit empty state when there is nothing to show.
pub fn product_grid(products: &[Product], paths: &AssetPaths) -> String {
    if products.is_empty() {
        return empty_state();
    }
    products
        .iter()
        .map(|p| product_card(p, paths))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Filter buttons: "All Products" plus one per category, keyed by slug.
/// `active` is the selected slug; `None` selects "all".
pub fn category_filter(categories: &[Category], active: Option<&str>) -> String {
    let button = |slug: &str, label: &str, is_active: bool| {
        format!(
            r#"<button class="filter-btn{}" data-category="{}">{}</button>"#,
            if is_active { " active" } else { "" },
            attr(slug),
            text(label)
        )
    };

    let mut buttons = vec![button("all", "All Products", active.is_none())];
    buttons.extend(
        categories
            .iter()
            .map(|c| button(&c.slug, &c.name, active == Some(c.slug.as_str()))),
    );
    buttons.join("\n")
}

pub fn feature_list(features: &[String]) -> String {
    let items: String = features
        .iter()
        .map(|f| format!(r#"<li><i class="fa fa-check"></i> {}</li>"#, text(f)))
        .collect();
    format!("<ul>{}</ul>", items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductStatus;

    fn paths() -> AssetPaths {
        AssetPaths {
            origin: "http://localhost:8001".into(),
            placeholder_image: "assets/images/placeholder-product.png".into(),
            product_page: "single-product.html".into(),
        }
    }

    fn product(images: Vec<&str>, features: Vec<&str>) -> Product {
        Product {
            id: "p 1".into(),
            name: "Sofa <Deluxe>".into(),
            description: "Soft".into(),
            category: "Lounge".into(),
            images: images.into_iter().map(String::from).collect(),
            features: features.into_iter().map(String::from).collect(),
            featured: true,
            status: ProductStatus::Active,
            meta_tags: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn image_urls_resolve_against_origin() {
        let paths = paths();
        assert_eq!(paths.image_url("/uploads/a.png"), "http://localhost:8001/uploads/a.png");
        assert_eq!(paths.image_url("a.png"), "http://localhost:8001/uploads/a.png");
        assert_eq!(paths.image_url("https://cdn.x/a.png"), "https://cdn.x/a.png");
    }

    #[test]
    fn missing_images_use_placeholder() {
        let card = product_card(&product(vec![], vec![]), &paths());
        assert!(card.contains(r#"src="assets/images/placeholder-product.png""#));
        assert!(!card.contains(r#"src="""#));
        assert!(card.contains("Premium Quality"));
    }

    #[test]
    fn card_escapes_and_links() {
        let card = product_card(&product(vec!["/uploads/a.png"], vec!["a", "b", "c", "d"]), &paths());
        assert!(card.contains("Sofa &lt;Deluxe&gt;"));
        assert!(card.contains(r#"href="single-product.html?id=p+1""#));
        assert!(card.contains("a, b, c</p>"));
        assert!(card.contains("product-flag"));
    }

    #[test]
    fn empty_grid_shows_message() {
        assert!(product_grid(&[], &paths()).contains("No products found"));
    }

    #[test]
    fn filter_marks_active_button() {
        let categories = vec![Category {
            id: "c1".into(),
            name: "Outdoor".into(),
            slug: "outdoor".into(),
            description: None,
            keywords: vec![],
            meta_tags: None,
            created_at: None,
        }];
        let all = category_filter(&categories, None);
        assert!(all.contains(r#"<button class="filter-btn active" data-category="all">"#));

        let outdoor = category_filter(&categories, Some("outdoor"));
        assert!(outdoor.contains(r#"<button class="filter-btn active" data-category="outdoor">Outdoor</button>"#));
        assert!(outdoor.contains(r#"<button class="filter-btn" data-category="all">"#));
    }
}
