use log::debug;

use super::slug::derive_slug;
use super::tags::{KeyInput, KeyOutcome, TagList};
use super::validation::FieldErrors;
use crate::error::{Error, Result};
use crate::models::{Category, CategoryInput};
use crate::notify::Notifier;
use crate::query::{MutationKind, QueryCache};
use crate::resources::{AdminClient, Writable};

/// Modal editor for creating or updating a category.
///
/// The slug follows the name until the user types a slug of their own;
/// clearing the slug field hands it back to the name.
#[derive(Debug, Clone)]
pub struct CategoryEditor {
    existing: Option<Category>,
    name: String,
    slug: String,
    description: String,
    slug_overridden: bool,
    keywords: TagList,
    pending_keyword: String,
    errors: FieldErrors,
    closed: bool,
}

impl Default for CategoryEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryEditor {
    /// Editor for a new category
    pub fn new() -> Self {
        Self {
            existing: None,
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            slug_overridden: false,
            keywords: TagList::unique(),
            pending_keyword: String::new(),
            errors: FieldErrors::new(),
            closed: false,
        }
    }

    /// Editor pre-filled from an existing category. A slug that does not
    /// match its name counts as hand-written and is left alone.
    pub fn edit(category: Category) -> Self {
        let slug_overridden =
            !category.slug.is_empty() && category.slug != derive_slug(&category.name);
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone().unwrap_or_default(),
            slug_overridden,
            keywords: TagList::unique().with_items(category.keywords.clone()),
            existing: Some(category),
            ..Self::new()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Category"
        } else {
            "Add New Category"
        }
    }

    /// The write `submit` performs: an update when editing, otherwise a create
    pub fn mutation_kind(&self) -> MutationKind {
        if self.is_editing() {
            Category::UPDATE
        } else {
            Category::CREATE
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
        if !self.slug_overridden {
            self.slug = derive_slug(name);
        }
    }

    pub fn set_slug(&mut self, slug: &str) {
        self.slug = slug.to_string();
        self.slug_overridden = !slug.trim().is_empty();
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn set_pending_keyword(&mut self, text: &str) {
        self.pending_keyword = text.to_string();
    }

    /// The "Add" button next to the keyword input
    pub fn add_keyword(&mut self) -> bool {
        let added = self.keywords.add(&self.pending_keyword);
        if added {
            self.pending_keyword.clear();
        }
        added
    }

    pub fn keyword_key(&mut self, key: KeyInput) -> KeyOutcome {
        self.keywords.handle_key(key, &mut self.pending_keyword)
    }

    pub fn remove_keyword(&mut self, index: usize) -> Option<String> {
        self.keywords.remove(index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn pending_keyword(&self) -> &str {
        &self.pending_keyword
    }

    pub fn keywords(&self) -> &[String] {
        self.keywords.items()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether this editor's save is in flight; submit stays disabled meanwhile
    pub fn is_saving(&self, cache: &QueryCache) -> bool {
        cache.is_mutating(self.mutation_kind())
    }

    /// Whether a save succeeded and the modal should be dismissed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Check required fields and build the payload. An empty slug is
    /// derived from the name at this point.
    pub fn validate(&self) -> std::result::Result<CategoryInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Category name is required");

        let slug = if self.slug.trim().is_empty() {
            derive_slug(&self.name)
        } else {
            self.slug.trim().to_string()
        };
        if errors.get("name").is_none() {
            errors.require("slug", &slug, "Slug is required");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CategoryInput {
            name: self.name.trim().to_string(),
            slug,
            description: self.description.clone(),
            keywords: self.keywords.to_vec(),
        })
    }

    /// Validate, then create or update. Validation failures never reach
    /// the network. Success invalidates the category list and closes the editor.
    pub async fn submit(
        &mut self,
        client: &AdminClient,
        cache: &QueryCache,
        notifier: &dyn Notifier,
    ) -> Result<Category> {
        let input = match self.validate() {
            Ok(input) => input,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(Error::Validation(errors));
            }
        };
        self.errors.clear();

        let categories = client.categories();
        let existing_id = self.existing.as_ref().map(|c| c.id.clone());
        debug!("saving category {:?} (existing: {:?})", input.slug, existing_id);

        let result = match &existing_id {
            Some(id) => cache.mutate(Category::UPDATE, categories.update(id, &input)).await,
            None => cache.mutate(Category::CREATE, categories.create(&input)).await,
        };

        match result {
            Ok(category) => {
                notifier.success(if existing_id.is_some() {
                    "Category updated successfully"
                } else {
                    "Category created successfully"
                });
                self.closed = true;
                Ok(category)
            }
            Err(e) => {
                notifier.error(&e.message_or("Error saving category"));
                Err(e)
            }
        }
    }
}
