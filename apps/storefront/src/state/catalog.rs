//! # Catalog State
//!
//! The product cards on the page and the category filter currently applied
//! to them.

use basket_core::{CategoryFilter, ProductCard};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct CatalogState {
    cards: Vec<ProductCard>,
    filter: RwLock<CategoryFilter>,
}

impl CatalogState {
    pub fn new(cards: Vec<ProductCard>) -> Self {
        CatalogState {
            cards,
            filter: RwLock::new(CategoryFilter::All),
        }
    }

    pub fn cards(&self) -> &[ProductCard] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&ProductCard> {
        self.cards.get(index)
    }

    pub async fn filter(&self) -> CategoryFilter {
        self.filter.read().await.clone()
    }

    /// Replaces the active filter and returns the visibility of each card.
    pub async fn set_filter(&self, filter: CategoryFilter) -> Vec<bool> {
        let visibility = filter.visibility(&self.cards);
        debug!(%filter, shown = visibility.iter().filter(|v| **v).count(), "Catalog filtered");
        *self.filter.write().await = filter;
        visibility
    }
}
