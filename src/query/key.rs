use std::collections::HashMap;
use std::fmt;

/// Name of a cached list. Each admin list view reads through one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKey {
    Products,
    Categories,
    Blogs,
    Images,
}

impl QueryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Products => "products",
            QueryKey::Categories => "categories",
            QueryKey::Blogs => "blogs",
            QueryKey::Images => "images",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every server-side write the admin console can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    CreateCategory,
    UpdateCategory,
    DeleteCategory,
    DeleteBlog,
    UploadImage,
    DeleteImage,
}

/// Which cache keys go stale when a mutation succeeds.
#[derive(Debug, Clone, Default)]
pub struct InvalidationTable {
    edges: HashMap<MutationKind, Vec<QueryKey>>,
}

impl InvalidationTable {
    /// An empty table: no mutation invalidates anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// The edges the admin console uses: each mutation invalidates its own list.
    pub fn standard() -> Self {
        use MutationKind::*;

        Self::new()
            .on(CreateProduct, &[QueryKey::Products])
            .on(UpdateProduct, &[QueryKey::Products])
            .on(DeleteProduct, &[QueryKey::Products])
            .on(CreateCategory, &[QueryKey::Categories])
            .on(UpdateCategory, &[QueryKey::Categories])
            .on(DeleteCategory, &[QueryKey::Categories])
            .on(DeleteBlog, &[QueryKey::Blogs])
            .on(UploadImage, &[QueryKey::Images])
            .on(DeleteImage, &[QueryKey::Images])
    }

    /// Add invalidation edges for `kind`. Repeated keys are ignored.
    pub fn on(mut self, kind: MutationKind, keys: &[QueryKey]) -> Self {
        let entry = self.edges.entry(kind).or_default();
        for key in keys {
            if !entry.contains(key) {
                entry.push(*key);
            }
        }
        self
    }

    pub fn dependents(&self, kind: MutationKind) -> &[QueryKey] {
        self.edges.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}
