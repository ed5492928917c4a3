//! Admin list pages.
//!
//! Each page subscribes to its collection's cache key while it is alive and
//! reads through the shared [`QueryCache`]. Deletes are confirmed first, then
//! run as mutations so the list is refetched on the next load.

mod dashboard;
mod images;

use std::sync::Arc;

use log::info;

use crate::error::Result;
use crate::models::{Blog, Category, Image, Product};
use crate::notify::{Confirm, Notifier};
use crate::query::{QueryCache, ViewHandle};
use crate::resources::{AdminClient, Collection, Resource};

pub use dashboard::{BlogPreview, Dashboard, DashboardSummary, Stat};

/// A mounted list of one resource
pub struct ListPage<T: Resource> {
    collection: Collection<T>,
    cache: QueryCache,
    view: ViewHandle,
    notifier: Arc<dyn Notifier>,
}

pub type ProductsPage = ListPage<Product>;
pub type CategoriesPage = ListPage<Category>;
pub type BlogsPage = ListPage<Blog>;
pub type ImagesPage = ListPage<Image>;

impl<T: Resource> ListPage<T> {
    /// Mount the page. It stays subscribed until dropped or unmounted.
    pub fn mount(client: &AdminClient, cache: &QueryCache, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            collection: Collection::new(client.http().clone()),
            cache: cache.clone(),
            view: cache.subscribe(T::KEY),
            notifier,
        }
    }

    pub fn unmount(&self) {
        self.view.deactivate();
    }

    pub fn is_mounted(&self) -> bool {
        self.view.is_active()
    }

    /// Shown as "Loading ..." while the list is in flight
    pub fn is_loading(&self) -> bool {
        self.view.is_loading()
    }

    /// The list, from cache when fresh. `None` if the page was unmounted
    /// before the response arrived.
    pub async fn load(&self) -> Result<Option<Vec<T>>> {
        let collection = &self.collection;
        self.view.load(|| collection.list()).await
    }

    /// Ask for confirmation, then delete. Returns whether the record was
    /// deleted. A declined prompt issues no request.
    pub async fn delete(&self, id: &str, confirm: &dyn Confirm) -> bool {
        let label = T::LABEL.to_lowercase();
        if !confirm.confirm(&format!("Are you sure you want to delete this {}?", label)) {
            return false;
        }

        match self
            .cache
            .mutate(T::DELETE, self.collection.delete(id))
            .await
        {
            Ok(_) => {
                info!("deleted {} {}", label, id);
                self.notifier
                    .success(&format!("{} deleted successfully", T::LABEL));
                true
            }
            Err(e) => {
                self.notifier
                    .error(&e.message_or(&format!("Error deleting {}", label)));
                false
            }
        }
    }
}
