//! Typed view of `ItemSearch` / `ItemLookup` responses.

use serde::{Deserialize, Serialize};

/// Parsed `<Items>` block of a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsResponse {
    /// `Items/Request/IsValid`
    pub is_valid: bool,
    /// Request-level errors reported with a 200 status
    pub errors: Vec<ApiError>,
    pub total_results: u32,
    pub total_pages: u32,
    pub more_search_results_url: Option<String>,
    pub items: Vec<Item>,
}

impl ItemsResponse {
    /// Returns number of items.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items were returned.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An error document entry (`<Error><Code/><Message/></Error>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// A single catalog item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Amazon Standard Identification Number
    pub asin: String,
    pub detail_page_url: Option<String>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub binding: Option<String>,
    pub brand: Option<String>,
    pub ean: Option<String>,
    pub label: Option<String>,
    pub list_price: Option<ListPrice>,
    pub small_image: Option<Image>,
    pub medium_image: Option<Image>,
    pub large_image: Option<Image>,
}

impl Item {
    /// Authors joined for display.
    pub fn author_line(&self) -> Option<String> {
        if self.authors.is_empty() {
            None
        } else {
            Some(self.authors.join(", "))
        }
    }

    /// Largest image available.
    pub fn best_image(&self) -> Option<&Image> {
        self.large_image.as_ref().or(self.medium_image.as_ref()).or(self.small_image.as_ref())
    }
}

/// `ItemAttributes/ListPrice`. `amount` is in the currency's minor unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPrice {
    pub amount: u64,
    pub currency_code: String,
    pub formatted_price: String,
}

impl ListPrice {
    /// Amount in major units (e.g. 1999 -> 19.99). JPY has no minor unit.
    pub fn major_units(&self) -> f64 {
        match self.currency_code.as_str() {
            "JPY" => self.amount as f64,
            _ => self.amount as f64 / 100.0,
        }
    }
}

/// Image reference with pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: u32,
    pub width: u32,
}
