//! # Catalog Commands
//!
//! The category buttons above the product grid.

use basket_core::{CategoryFilter, ProductCard};
use serde::Serialize;
use tracing::debug;

use crate::state::CatalogState;

/// Which cards a filter leaves on screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    pub filter: CategoryFilter,
    /// One entry per card, in card order.
    pub visible: Vec<bool>,
}

/// Applies the filter named by a category button (`"all"` shows everything).
pub async fn filter_products(catalog: &CatalogState, category: &str) -> FilterResponse {
    debug!(category, "filter_products command");

    let filter = CategoryFilter::parse(category);
    let visible = catalog.set_filter(filter.clone()).await;
    FilterResponse { filter, visible }
}

/// Cards that pass the active filter.
pub async fn visible_products(catalog: &CatalogState) -> Vec<ProductCard> {
    let filter = catalog.filter().await;
    filter.apply(catalog.cards()).into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, category: &str) -> ProductCard {
        ProductCard {
            name: name.to_string(),
            image_ref: format!("img/{}.png", name.to_lowercase()),
            price_text: "$5.00".to_string(),
            category: category.to_string(),
        }
    }

    fn catalog() -> CatalogState {
        CatalogState::new(vec![
            card("Tea", "Drinks"),
            card("Mug", "Kitchen"),
            card("Coffee", "drinks"),
        ])
    }

    #[tokio::test]
    async fn test_filter_by_category_is_case_insensitive() {
        let catalog = catalog();

        let response = filter_products(&catalog, "DRINKS").await;
        assert_eq!(response.visible, vec![true, false, true]);

        let names: Vec<String> = visible_products(&catalog)
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Tea".to_string(), "Coffee".to_string()]);
    }

    #[tokio::test]
    async fn test_all_shows_everything_again() {
        let catalog = catalog();
        filter_products(&catalog, "kitchen").await;

        let response = filter_products(&catalog, "All").await;
        assert_eq!(response.filter, CategoryFilter::All);
        assert_eq!(visible_products(&catalog).await.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_category_hides_everything() {
        let catalog = catalog();
        let response = filter_products(&catalog, "garden").await;
        assert!(response.visible.iter().all(|v| !v));
    }
}
