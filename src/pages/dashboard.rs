use log::warn;

use crate::models::{Blog, BlogStatus, Category, Image, Product};
use crate::query::QueryCache;
use crate::resources::{AdminClient, Collection, Resource};

const RECENT_PRODUCTS: usize = 5;
const RECENT_BLOGS: usize = 3;

/// One count tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub name: &'static str,
    pub value: usize,
}

/// A recent post as shown on the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPreview {
    pub title: String,
    pub summary: String,
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub stats: Vec<Stat>,
    pub recent_products: Vec<Product>,
    pub recent_blogs: Vec<BlogPreview>,
}

/// Landing page: totals for every collection plus the newest entries.
pub struct Dashboard {
    client: AdminClient,
    cache: QueryCache,
}

impl Dashboard {
    pub fn new(client: &AdminClient, cache: &QueryCache) -> Self {
        Self {
            client: client.clone(),
            cache: cache.clone(),
        }
    }

    /// A collection that fails to load counts as empty; the others still show.
    async fn list_or_empty<T: Resource>(&self, collection: Collection<T>) -> Vec<T> {
        match self.cache.fetch(T::KEY, || collection.list()).await {
            Ok(items) => items,
            Err(e) => {
                warn!("dashboard could not load {}: {}", T::KEY, e);
                Vec::new()
            }
        }
    }

    pub async fn load(&self) -> DashboardSummary {
        let (products, categories, blogs, images): (
            Vec<Product>,
            Vec<Category>,
            Vec<Blog>,
            Vec<Image>,
        ) = tokio::join!(
            self.list_or_empty(self.client.products()),
            self.list_or_empty(self.client.categories()),
            self.list_or_empty(self.client.blogs()),
            self.list_or_empty(self.client.images()),
        );

        let stats = vec![
            Stat { name: "Products", value: products.len() },
            Stat { name: "Categories", value: categories.len() },
            Stat { name: "Blog Posts", value: blogs.len() },
            Stat { name: "Images", value: images.len() },
        ];

        let recent_blogs = blogs
            .iter()
            .take(RECENT_BLOGS)
            .map(|blog| BlogPreview {
                title: blog.title.clone(),
                summary: blog.summary(),
                published: blog.status == BlogStatus::Published,
            })
            .collect();

        DashboardSummary {
            stats,
            recent_products: products.into_iter().take(RECENT_PRODUCTS).collect(),
            recent_blogs,
        }
    }
}
