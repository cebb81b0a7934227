//! # Catalog Filter
//!
//! The category buttons above the product grid. Selecting one hides every
//! card outside that category; `all` shows everything again.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A product card as the page lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub name: String,
    pub image_ref: String,
    /// Price exactly as printed on the card, e.g. `"$12.50"`.
    pub price_text: String,
    pub category: String,
}

/// The active category filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase", tag = "kind", content = "name")]
pub enum CategoryFilter {
    /// Show every card.
    #[default]
    All,
    /// Show cards of one category (stored lowercase).
    Category(String),
}

impl CategoryFilter {
    /// Reads the value of a filter button. Case and surrounding whitespace
    /// are ignored; `"all"` and blank text select everything.
    pub fn parse(text: &str) -> Self {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() || normalized == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(normalized)
        }
    }

    /// Returns true if a card of `category` stays visible.
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(wanted) => category.trim().to_lowercase() == *wanted,
        }
    }

    /// Visibility of each card, in card order.
    pub fn visibility(&self, cards: &[ProductCard]) -> Vec<bool> {
        cards.iter().map(|card| self.matches(&card.category)).collect()
    }

    /// The cards that stay visible.
    pub fn apply<'a>(&self, cards: &'a [ProductCard]) -> Vec<&'a ProductCard> {
        cards.iter().filter(|card| self.matches(&card.category)).collect()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Category(name) => f.write_str(name),
        }
    }
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

    fn shelf() -> Vec<ProductCard> {
        vec![card("Sencha", "Tea"), card("Mug", "Ware"), card("Oolong", "tea")]
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(CategoryFilter::parse("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" TEA "),
            CategoryFilter::Category("tea".to_string())
        );
    }

    #[test]
    fn test_category_matching_ignores_case() {
        let cards = shelf();
        let filter = CategoryFilter::parse("tea");

        assert_eq!(filter.visibility(&cards), vec![true, false, true]);
        let names: Vec<&str> = filter.apply(&cards).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Sencha", "Oolong"]);
    }

    #[test]
    fn test_all_shows_everything() {
        let cards = shelf();
        assert_eq!(CategoryFilter::All.apply(&cards).len(), 3);
    }

    #[test]
    fn test_unknown_category_hides_everything() {
        assert!(CategoryFilter::parse("books").apply(&shelf()).is_empty());
    }
}
