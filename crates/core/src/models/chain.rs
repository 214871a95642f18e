//! Hotel chain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slug::slugify;

/// Price bracket of a chain, from budget to luxury
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PriceRange {
    Low = 1,
    Medium = 2,
    High = 3,
    Luxury = 4,
}

impl PriceRange {
    /// Dollar-sign notation shown in listings
    pub fn symbol(&self) -> &'static str {
        match self {
            PriceRange::Low => "$",
            PriceRange::Medium => "$$",
            PriceRange::High => "$$$",
            PriceRange::Luxury => "$$$$",
        }
    }

    /// Coarse price tag used by search filters
    pub fn tag(&self) -> &'static str {
        match self {
            PriceRange::Low | PriceRange::Medium => "cheap",
            PriceRange::High | PriceRange::Luxury => "expensive",
        }
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange::Medium
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A brand grouping of one or more hotels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub id: Uuid,
    /// Display title, always stored title-cased. Unique case-insensitively.
    pub title: String,
    pub slug: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub sales_contact: String,
    pub price_range: PriceRange,
    /// Whether this chain may be picked by name-based auto-assignment
    pub auto_assign: bool,
    /// Address notified when a hotel is created under this chain
    pub recipient_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chain {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title_case(&title.into());
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&title),
            title,
            description: String::new(),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            sales_contact: String::new(),
            price_range: PriceRange::default(),
            auto_assign: false,
            recipient_email: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_auto_assign(mut self, auto_assign: bool) -> Self {
        self.auto_assign = auto_assign;
        self
    }

    pub fn with_recipient_email(mut self, email: impl Into<String>) -> Self {
        self.recipient_email = Some(email.into());
        self
    }

    pub fn with_price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = price_range;
        self
    }

    /// Display path for this chain
    pub fn detail_path(&self) -> String {
        format!("/chains/{}/", self.slug)
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Rewrite a title so every whitespace-separated word starts uppercase:
/// `"test HOTEL chain"` becomes `"Test Hotel Chain"`.
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.as_str().to_lowercase().chars())
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("test hotel"), "Test Hotel");
        assert_eq!(title_case("TEST HOTEL"), "Test Hotel");
        assert_eq!(title_case("tEsT hOtEl chain"), "Test Hotel Chain");
    }

    #[test]
    fn test_new_normalizes_title() {
        let chain = Chain::new("grand plaza");
        assert_eq!(chain.title, "Grand Plaza");
        assert_eq!(chain.slug, "grand-plaza");
    }

    #[test]
    fn test_price_range_symbols() {
        assert_eq!(PriceRange::Low.symbol(), "$");
        assert_eq!(PriceRange::Luxury.symbol(), "$$$$");
    }

    #[test]
    fn test_price_range_tags() {
        assert_eq!(PriceRange::Low.tag(), "cheap");
        assert_eq!(PriceRange::Medium.tag(), "cheap");
        assert_eq!(PriceRange::High.tag(), "expensive");
        assert_eq!(PriceRange::Luxury.tag(), "expensive");
    }

    #[test]
    fn test_detail_path() {
        let chain = Chain::new("Test Chain");
        assert_eq!(chain.detail_path(), "/chains/test-chain/");
    }
}
