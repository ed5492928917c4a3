use std::collections::BTreeMap;

/// The handful of DOM operations the storefront needs.
///
/// Selectors are groups in `querySelector` form: comma-separated
/// alternatives, the first alternative present on the page wins.
/// Image operations span every alternative in order, like `querySelectorAll`.
pub trait Dom {
    /// Replace the markup inside the first matching element
    fn set_inner_html(&mut self, selectors: &str, html: &str) -> bool;

    /// Replace the text inside the first matching element
    fn set_text(&mut self, selectors: &str, text: &str) -> bool;

    /// Number of `img` elements matching the group
    fn image_count(&self, selectors: &str) -> usize;

    fn set_image(&mut self, selectors: &str, index: usize, src: &str, alt: &str) -> bool;

    fn set_title(&mut self, title: &str);
}

fn alternatives(selectors: &str) -> impl Iterator<Item = &str> {
    selectors.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSlot {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default)]
struct Region {
    slot: String,
    html: Option<String>,
    images: Vec<ImageSlot>,
}

/// In-memory page made of named regions.
///
/// Each region is registered under one selector and bound to a slot name.
/// [`StaticPage::render_into`] writes region contents into an HTML template
/// at `<!-- furns:SLOT -->` markers; image sources go to
/// `<!-- furns:SLOT-N -->` and the title to `<!-- furns:title -->`.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    regions: BTreeMap<String, Region>,
    title: Option<String>,
    writes: usize,
}

impl StaticPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a markup region
    pub fn with_region(mut self, selector: &str, slot: &str) -> Self {
        self.regions.insert(
            selector.to_string(),
            Region {
                slot: slot.to_string(),
                ..Region::default()
            },
        );
        self
    }

    /// Register `count` images under one selector
    pub fn with_images(mut self, selector: &str, slot: &str, count: usize) -> Self {
        self.regions.insert(
            selector.to_string(),
            Region {
                slot: slot.to_string(),
                html: None,
                images: vec![ImageSlot::default(); count],
            },
        );
        self
    }

    /// The standard storefront layout: product grid, category filter and
    /// the single-product detail regions.
    pub fn storefront() -> Self {
        Self::new()
            .with_region(".product-items-grid", "products")
            .with_region(".category-filter", "filters")
            .with_region(".product-title h1", "product-title")
            .with_region(".product-description", "product-description")
            .with_region(".pro-details-feature", "product-features")
            .with_images(".product-large-image img", "product-image", 1)
            .with_images(".product-thumbs img", "product-thumb", 4)
    }

    fn first_match<'a>(&self, selectors: &'a str) -> Option<&'a str> {
        alternatives(selectors)
            .find(|alt| self.regions.contains_key(*alt))
    }

    fn image_slots_mut(&mut self, selectors: &str) -> Vec<&mut ImageSlot> {
        let wanted: Vec<&str> = alternatives(selectors).collect();
        let mut slots = Vec::new();
        // walk in selector order so indices match the group
        let mut by_selector: BTreeMap<&str, &mut Region> = self
            .regions
            .iter_mut()
            .filter(|(key, _)| wanted.contains(&key.as_str()))
            .map(|(key, region)| (key.as_str(), region))
            .collect();
        for alt in &wanted {
            if let Some(region) = by_selector.remove(alt) {
                slots.extend(region.images.iter_mut());
            }
        }
        slots
    }

    /// Current markup of the region registered under `selector`
    pub fn html(&self, selector: &str) -> Option<&str> {
        self.regions.get(selector)?.html.as_deref()
    }

    pub fn images(&self, selector: &str) -> &[ImageSlot] {
        self.regions
            .get(selector)
            .map(|r| r.images.as_slice())
            .unwrap_or(&[])
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Number of DOM writes performed so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Fill the slot markers of `template` with the page's current state.
    /// Markers for regions that were never written are left in place.
    pub fn render_into(&self, template: &str) -> String {
        let mut out = template.to_string();
        if let Some(title) = &self.title {
            out = out.replace("<!-- furns:title -->", &html_escape::encode_text(title));
        }
        for region in self.regions.values() {
            if let Some(html) = &region.html {
                out = out.replace(&format!("<!-- furns:{} -->", region.slot), html);
            }
            for (i, image) in region.images.iter().enumerate() {
                if !image.src.is_empty() {
                    out = out.replace(
                        &format!("<!-- furns:{}-{} -->", region.slot, i),
                        &html_escape::encode_double_quoted_attribute(&image.src),
                    );
                }
            }
        }
        out
    }
}

impl Dom for StaticPage {
    fn set_inner_html(&mut self, selectors: &str, html: &str) -> bool {
        let Some(key) = self.first_match(selectors).map(str::to_string) else {
            return false;
        };
        if let Some(region) = self.regions.get_mut(&key) {
            region.html = Some(html.to_string());
            self.writes += 1;
            return true;
        }
        false
    }

    fn set_text(&mut self, selectors: &str, text: &str) -> bool {
        let escaped = html_escape::encode_text(text).to_string();
        self.set_inner_html(selectors, &escaped)
    }

    fn image_count(&self, selectors: &str) -> usize {
        alternatives(selectors)
            .filter_map(|alt| self.regions.get(alt))
            .map(|r| r.images.len())
            .sum()
    }

    fn set_image(&mut self, selectors: &str, index: usize, src: &str, alt: &str) -> bool {
        let updated = match self.image_slots_mut(selectors).into_iter().nth(index) {
            Some(slot) => {
                slot.src = src.to_string();
                slot.alt = alt.to_string();
                true
            }
            None => false,
        };
        if updated {
            self.writes += 1;
        }
        updated
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
        self.writes += 1;
    }
}
