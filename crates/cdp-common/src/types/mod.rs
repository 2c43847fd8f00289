//! Common types used across CDP

use serde::{Deserialize, Serialize};

/// Column order for a single-source canonical dataset.
///
/// This is the order every per-source CSV is written in. A merged dataset
/// uses the sorted union of its inputs' headers instead, which downstream
/// consumers rely on; do not "fix" the divergence.
pub const CANONICAL_COLUMNS: [&str; 18] = [
    "brand",
    "category",
    "discount",
    "discount_display_label",
    "gender",
    "image_url",
    "images",
    "mrp",
    "name",
    "price",
    "primary_colour",
    "product_id",
    "product_url",
    "rating",
    "rating_count",
    "season",
    "sizes",
    "year",
];

/// The unified flat record all sources normalize into.
///
/// Created once per raw product and immutable thereafter. Monetary fields are
/// whole currency units (truncated), matching what downstream consumers of
/// the tabular files expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    pub brand: String,
    pub category: String,
    /// mrp - price, truncated; 0 when mrp is 0
    pub discount: i64,
    /// "(NN% OFF)" when discount > 0, otherwise empty
    pub discount_display_label: String,
    pub gender: String,
    /// First image URL, or empty
    pub image_url: String,
    /// All image URLs, comma-joined
    pub images: String,
    /// List price (compare-at when present, else sale price)
    pub mrp: i64,
    pub name: String,
    /// Sale price
    pub price: i64,
    pub primary_colour: String,
    pub product_id: String,
    pub product_url: String,
    pub rating: f64,
    pub rating_count: i64,
    pub season: String,
    /// Deduplicated size labels, comma-joined
    pub sizes: String,
    pub year: i32,
}

impl CanonicalProduct {
    /// Serialize into a CSV row matching [`CANONICAL_COLUMNS`].
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.brand.clone(),
            self.category.clone(),
            self.discount.to_string(),
            self.discount_display_label.clone(),
            self.gender.clone(),
            self.image_url.clone(),
            self.images.clone(),
            self.mrp.to_string(),
            self.name.clone(),
            self.price.to_string(),
            self.primary_colour.clone(),
            self.product_id.clone(),
            self.product_url.clone(),
            format_rating(self.rating),
            self.rating_count.to_string(),
            self.season.clone(),
            self.sizes.clone(),
            self.year.to_string(),
        ]
    }
}

/// Whole-number ratings print without a decimal point ("0", not "0.0").
fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{}", rating as i64)
    } else {
        rating.to_string()
    }
}
