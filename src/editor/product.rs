use log::debug;

use super::tags::{KeyInput, KeyOutcome, TagList};
use super::upload::{upload_each, UploadOutcome, UploadReport};
use super::validation::FieldErrors;
use crate::error::{Error, Result};
use crate::models::{Category, Product, ProductInput, ProductStatus};
use crate::notify::Notifier;
use crate::query::{MutationKind, QueryCache};
use crate::resources::{AdminClient, UploadFile, Uploader, Writable};

/// An entry in the product editor's category select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// Options for the category select. Products reference categories by name.
pub fn category_options(categories: &[Category]) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|c| CategoryOption {
            value: c.name.clone(),
            label: c.name.clone(),
        })
        .collect()
}

/// Modal editor for creating or updating a product
#[derive(Debug, Clone)]
pub struct ProductEditor {
    existing: Option<Product>,
    name: String,
    description: String,
    category: String,
    status: ProductStatus,
    featured: bool,
    images: Vec<String>,
    features: TagList,
    pending_feature: String,
    errors: FieldErrors,
    closed: bool,
}

impl Default for ProductEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductEditor {
    pub fn new() -> Self {
        Self {
            existing: None,
            name: String::new(),
            description: String::new(),
            category: String::new(),
            status: ProductStatus::Active,
            featured: false,
            images: Vec::new(),
            features: TagList::new(),
            pending_feature: String::new(),
            errors: FieldErrors::new(),
            closed: false,
        }
    }

    pub fn edit(product: Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            status: product.status,
            featured: product.featured,
            images: product.images.clone(),
            features: TagList::new().with_items(product.features.clone()),
            existing: Some(product),
            ..Self::new()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Product"
        } else {
            "Add New Product"
        }
    }

    /// The write `submit` performs: an update when editing, otherwise a create
    pub fn mutation_kind(&self) -> MutationKind {
        if self.is_editing() {
            Product::UPDATE
        } else {
            Product::CREATE
        }
    }

    pub fn submit_label(&self, cache: &QueryCache) -> &'static str {
        match (self.is_saving(cache), self.is_editing()) {
            (true, _) => "Saving...",
            (false, true) => "Update",
            (false, false) => "Create",
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn set_category(&mut self, category: &str) {
        self.category = category.to_string();
    }

    pub fn set_status(&mut self, status: ProductStatus) {
        self.status = status;
    }

    pub fn set_featured(&mut self, featured: bool) {
        self.featured = featured;
    }

    pub fn set_pending_feature(&mut self, text: &str) {
        self.pending_feature = text.to_string();
    }

    pub fn add_feature(&mut self) -> bool {
        let added = self.features.add(&self.pending_feature);
        if added {
            self.pending_feature.clear();
        }
        added
    }

    pub fn feature_key(&mut self, key: KeyInput) -> KeyOutcome {
        self.features.handle_key(key, &mut self.pending_feature)
    }

    pub fn remove_feature(&mut self, index: usize) -> Option<String> {
        self.features.remove(index)
    }

    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn features(&self) -> &[String] {
        self.features.items()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether this editor's save is in flight; submit stays disabled meanwhile
    pub fn is_saving(&self, cache: &QueryCache) -> bool {
        cache.is_mutating(self.mutation_kind())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Upload each selected file independently and append every returned
    /// URL to the draft as it arrives. One notice per file.
    pub async fn attach_images<U>(
        &mut self,
        uploader: &U,
        cache: &QueryCache,
        notifier: &dyn Notifier,
        files: Vec<UploadFile>,
    ) -> UploadReport
    where
        U: Uploader + ?Sized,
    {
        let mut report = UploadReport::default();
        let images = &mut self.images;

        upload_each(uploader, cache, files, |outcome| match outcome {
            UploadOutcome::Uploaded { image, .. } => {
                images.push(image.url.clone());
                report.uploaded.push(image.url);
                notifier.success("Image uploaded successfully");
            }
            UploadOutcome::Failed { file_name, error } => {
                let message = error.message_or("Error uploading image");
                notifier.error(&message);
                report.failed.push((file_name, message));
            }
        })
        .await;

        report
    }

    pub fn validate(&self) -> std::result::Result<ProductInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Product name is required");
        errors.require("description", &self.description, "Description is required");
        errors.require("category", &self.category, "Category is required");
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductInput {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            category: self.category.clone(),
            images: self.images.clone(),
            features: self.features.to_vec(),
            featured: self.featured,
            status: self.status,
        })
    }

    /// Validate, then create or update. Success invalidates the product
    /// list and closes the editor.
    pub async fn submit(
        &mut self,
        client: &AdminClient,
        cache: &QueryCache,
        notifier: &dyn Notifier,
    ) -> Result<Product> {
        let input = match self.validate() {
            Ok(input) => input,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(Error::Validation(errors));
            }
        };
        self.errors.clear();

        let products = client.products();
        let existing_id = self.existing.as_ref().map(|p| p.id.clone());
        debug!("saving product {:?} (existing: {:?})", input.name, existing_id);

        let result = match &existing_id {
            Some(id) => cache.mutate(Product::UPDATE, products.update(id, &input)).await,
            None => cache.mutate(Product::CREATE, products.create(&input)).await,
        };

        match result {
            Ok(product) => {
                notifier.success(if existing_id.is_some() {
                    "Product updated successfully"
                } else {
                    "Product created successfully"
                });
                self.closed = true;
                Ok(product)
            }
            Err(e) => {
                notifier.error(&e.message_or("Error saving product"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Image;
    use crate::notify::LogNotifier;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stores every file except those named `broken*`.
    struct FakeUploader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Uploader for FakeUploader {
        async fn upload(&self, file: UploadFile) -> Result<Image> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if file.file_name.starts_with("broken") {
                return Err(Error::api(400, Some("File must be an image".into())));
            }
            Ok(Image {
                id: file.file_name.clone(),
                url: format!("/uploads/{}", file.file_name),
                filename: None,
                original_name: file.file_name,
                product_id: None,
                uploaded_at: None,
            })
        }

        fn upload_concurrency(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn each_upload_success_appends_once() {
        let uploader = FakeUploader {
            calls: AtomicUsize::new(0),
        };
        let cache = QueryCache::default();
        let mut editor = ProductEditor::new();

        let files = vec![
            UploadFile::new("a.png", vec![1]),
            UploadFile::new("broken.png", vec![2]),
            UploadFile::new("b.jpg", vec![3]),
        ];
        let report = editor
            .attach_images(&uploader, &cache, &LogNotifier, files)
            .await;

        assert_eq!(uploader.calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.failed, vec![("broken.png".to_string(), "File must be an image".to_string())]);

        let mut images = editor.images().to_vec();
        images.sort();
        assert_eq!(images, vec!["/uploads/a.png", "/uploads/b.jpg"]);
        assert_eq!(report.uploaded.len(), 2);
    }

    #[test]
    fn missing_required_fields_are_reported_per_field() {
        let mut editor = ProductEditor::new();
        editor.set_name("Oak Table");
        let errors = editor.validate().unwrap_err();

        assert_eq!(errors.get("name"), None);
        assert_eq!(errors.get("description"), Some("Description is required"));
        assert_eq!(errors.get("category"), Some("Category is required"));
    }

    #[test]
    fn payload_merges_list_fields() {
        let mut editor = ProductEditor::new();
        editor.set_name("Oak Table");
        editor.set_description("Solid oak");
        editor.set_category("Dining");
        editor.set_featured(true);
        editor.set_pending_feature("Seats six");
        editor.feature_key(KeyInput::Enter);
        editor.set_pending_feature("Seats six");
        editor.add_feature();

        let input = editor.validate().unwrap();
        assert_eq!(input.features, vec!["Seats six", "Seats six"]);
        assert!(input.featured);
        assert_eq!(input.status, ProductStatus::Active);
    }

    #[test]
    fn remove_image_by_position() {
        let product = Product {
            id: "p1".into(),
            name: "Bench".into(),
            description: "Pine".into(),
            category: "Outdoor".into(),
            images: vec!["/uploads/x.png".into(), "/uploads/x.png".into(), "/uploads/y.png".into()],
            features: vec![],
            featured: false,
            status: ProductStatus::Inactive,
            meta_tags: None,
            created_at: None,
            updated_at: None,
        };
        let mut editor = ProductEditor::edit(product);
        assert_eq!(editor.remove_image(1), Some("/uploads/x.png".to_string()));
        assert_eq!(editor.images(), &["/uploads/x.png", "/uploads/y.png"]);
        assert_eq!(editor.remove_image(9), None);
    }

    #[test]
    fn category_select_uses_names() {
        let categories = vec![Category {
            id: "c1".into(),
            name: "Outdoor".into(),
            slug: "outdoor".into(),
            description: None,
            keywords: vec![],
            meta_tags: None,
            created_at: None,
        }];
        assert_eq!(
            category_options(&categories),
            vec![CategoryOption {
                value: "Outdoor".into(),
                label: "Outdoor".into()
            }]
        );
    }
}
