//! Serde models for the JSON collection envelope.
//!
//! These types mirror what the sources actually send, not what we want:
//! prices arrive as strings or numbers depending on the storefront, optional
//! fields come and go per product, and variant option slots are positional.
//! Everything here is transient; records are consumed by the normalizer in
//! the same pass that fetched them.

use cdp_common::{CdpError, Result};
use serde::Deserialize;

/// One page of a paginated collection endpoint.
///
/// A missing or empty `products` array is the end-of-pagination signal.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionPage {
    #[serde(default)]
    pub products: Vec<RawProduct>,
}

/// A source-native product record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// URL slug for the product page
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variants: Vec<RawVariant>,
    #[serde(default)]
    pub images: Vec<RawImage>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// A purchasable variant of a [`RawProduct`].
///
/// `option1`/`option2`/`option3` are positional: for apparel sources option1
/// is the size label and option2 the colour, which the normalizer relies on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVariant {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<PriceField>,
    #[serde(default)]
    pub compare_at_price: Option<PriceField>,
    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,
    #[serde(default)]
    pub available: bool,
}

/// A product image reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub src: String,
}

/// A price as the wire delivers it: a JSON number or a decimal string.
///
/// Parsing is deferred to normalization so that one malformed value fails
/// one record, not the decode of a whole page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(f64),
    Text(String),
}

impl PriceField {
    /// Parse into a float.
    ///
    /// # Errors
    ///
    /// Returns [`CdpError::Parse`] for a string that is not a number
    /// (including the empty string; callers that want empty-as-absent
    /// semantics check [`Self::is_blank`] first).
    pub fn parse(&self) -> Result<f64> {
        match self {
            PriceField::Number(n) => Ok(*n),
            PriceField::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| CdpError::Parse(format!("not a numeric price: {s:?}"))),
        }
    }

    /// True for the empty (or whitespace-only) string form.
    pub fn is_blank(&self) -> bool {
        match self {
            PriceField::Number(_) => false,
            PriceField::Text(s) => s.trim().is_empty(),
        }
    }
}
