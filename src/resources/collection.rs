use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::fetch::HttpClient;
use crate::models::{Ack, Blog, Category, CategoryInput, Image, Product, ProductInput};
use crate::query::{MutationKind, QueryKey};

/// A record type the backend exposes as a REST collection.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection path, e.g. `/products`
    const PATH: &'static str;
    /// Human label used in operator messages, e.g. `Product`
    const LABEL: &'static str;
    /// Cache key of the collection's list
    const KEY: QueryKey;
    const DELETE: MutationKind;

    fn id(&self) -> &str;
}

/// A resource the admin console can create and update.
pub trait Writable: Resource {
    type Input: Serialize + Send + Sync;
    const CREATE: MutationKind;
    const UPDATE: MutationKind;
}

impl Resource for Product {
    const PATH: &'static str = "/products";
    const LABEL: &'static str = "Product";
    const KEY: QueryKey = QueryKey::Products;
    const DELETE: MutationKind = MutationKind::DeleteProduct;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Writable for Product {
    type Input = ProductInput;
    const CREATE: MutationKind = MutationKind::CreateProduct;
    const UPDATE: MutationKind = MutationKind::UpdateProduct;
}

impl Resource for Category {
    const PATH: &'static str = "/categories";
    const LABEL: &'static str = "Category";
    const KEY: QueryKey = QueryKey::Categories;
    const DELETE: MutationKind = MutationKind::DeleteCategory;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Writable for Category {
    type Input = CategoryInput;
    const CREATE: MutationKind = MutationKind::CreateCategory;
    const UPDATE: MutationKind = MutationKind::UpdateCategory;
}

impl Resource for Blog {
    const PATH: &'static str = "/blogs";
    const LABEL: &'static str = "Blog post";
    const KEY: QueryKey = QueryKey::Blogs;
    const DELETE: MutationKind = MutationKind::DeleteBlog;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Image {
    const PATH: &'static str = "/images";
    const LABEL: &'static str = "Image";
    const KEY: QueryKey = QueryKey::Images;
    const DELETE: MutationKind = MutationKind::DeleteImage;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Handle on one REST collection
#[derive(Debug, Clone)]
pub struct Collection<T> {
    http: HttpClient,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> Collection<T> {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self {
            http,
            _marker: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", T::PATH, id)
    }

    /// `GET /{collection}`
    pub async fn list(&self) -> Result<Vec<T>> {
        self.http.get(T::PATH).execute().await
    }

    /// `GET /{collection}/{id}`
    pub async fn get(&self, id: &str) -> Result<T> {
        self.http.get(&Self::item_path(id)).execute().await
    }

    /// `DELETE /{collection}/{id}`
    pub async fn delete(&self, id: &str) -> Result<Ack> {
        let ack: Option<Ack> = self.http.delete(&Self::item_path(id)).execute().await?;
        Ok(ack.unwrap_or_default())
    }
}

impl<T: Writable> Collection<T> {
    /// `POST /{collection}`
    pub async fn create(&self, input: &T::Input) -> Result<T> {
        self.http.post(T::PATH).json(input)?.execute().await
    }

    /// `PUT /{collection}/{id}`
    pub async fn update(&self, id: &str, input: &T::Input) -> Result<T> {
        self.http
            .put(&Self::item_path(id))
            .json(input)?
            .execute()
            .await
    }
}

/// Server-side filters accepted by `GET /products`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Collection<Product> {
    /// `GET /products` with server-side filters
    pub async fn list_filtered(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let mut req = self.http.get(Product::PATH);
        if let Some(category) = &query.category {
            req = req.query("category", category);
        }
        if let Some(featured) = query.featured {
            req = req.query("featured", &featured.to_string());
        }
        if let Some(limit) = query.limit {
            req = req.query("limit", &limit.to_string());
        }
        req.execute().await
    }
}

impl Collection<Blog> {
    /// Newest posts first, at most `limit`
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<Blog>> {
        self.http
            .get(Blog::PATH)
            .query("limit", &limit.to_string())
            .execute()
            .await
    }
}
