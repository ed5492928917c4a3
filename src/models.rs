//! Catalog records exchanged with the backend.
//!
//! Records are passed through verbatim: every field other than `id` falls
//! back to a default when the backend omits it, and unknown fields are
//! ignored. Timestamps stay in the backend's string form and are only parsed
//! for display.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// SEO metadata carried on products, categories and posts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetaTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Category *name*, not an id. Renaming a category does not update it.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_tags: Option<MetaTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Calendar date the product was created, if the backend sent a readable timestamp
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_timestamp).map(|t| t.date())
    }
}

/// Write payload for `POST /products` and `PUT /products/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub category: String,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub featured: bool,
    pub status: ProductStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_tags: Option<MetaTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Write payload for `POST /categories` and `PUT /categories/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Published,
    Draft,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Blog {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: BlogStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_tags: Option<MetaTags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Blog {
    const SUMMARY_CHARS: usize = 100;

    /// The excerpt, or the start of the content when there is none.
    pub fn summary(&self) -> String {
        match self.excerpt.as_deref() {
            Some(excerpt) if !excerpt.is_empty() => excerpt.to_string(),
            _ => {
                let head: String = self.content.chars().take(Self::SUMMARY_CHARS).collect();
                format!("{}...", head)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    #[serde(default)]
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub original_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

/// Body returned by delete endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Parse a backend timestamp. Accepts RFC 3339 as well as the naive
/// ISO form the backend writes for UTC times.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_tolerates_sparse_records() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Armchair",
            "unknown_field": 12
        }))
        .unwrap();

        assert_eq!(product.name, "Armchair");
        assert!(product.images.is_empty());
        assert_eq!(product.status, ProductStatus::Active);
        assert!(!product.featured);
    }

    #[test]
    fn product_input_serializes_status_lowercase() {
        let input = ProductInput {
            name: "Stool".into(),
            status: ProductStatus::Inactive,
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["status"], "inactive");
        assert_eq!(value["images"], json!([]));
    }

    #[test]
    fn blog_summary_falls_back_to_content() {
        let mut blog: Blog = serde_json::from_value(json!({
            "id": "b1",
            "title": "Care tips",
            "content": "x".repeat(150),
            "status": "draft"
        }))
        .unwrap();
        assert_eq!(blog.status, BlogStatus::Draft);
        assert_eq!(blog.summary(), format!("{}...", "x".repeat(100)));

        blog.excerpt = Some("Short".into());
        assert_eq!(blog.summary(), "Short");
    }

    #[test]
    fn timestamps_parse_in_both_forms() {
        assert!(parse_timestamp("2024-03-01T10:20:30.123456").is_some());
        assert!(parse_timestamp("2024-03-01T10:20:30Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());

        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "created_at": "2024-03-01T10:20:30"
        }))
        .unwrap();
        assert_eq!(
            product.created_date(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }
}
