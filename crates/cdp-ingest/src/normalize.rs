//! Normalization from raw collection records to [`CanonicalProduct`].
//!
//! The first variant is the pricing reference. Derived commercial fields
//! (discount amount, percent label) come from the reference variant's price
//! pair; the size set is collected across all variants. Fields the source
//! never carries are filled from the [`SourceProfile`] defaults.

use crate::source::SourceProfile;
use crate::types::{PriceField, RawProduct, RawVariant};
use cdp_common::types::CanonicalProduct;
use cdp_common::{CdpError, Result};
use std::collections::HashSet;

/// Normalize one raw product into the canonical flat schema.
///
/// # Errors
///
/// Returns [`CdpError::Record`] when a price field is present but not
/// numeric. The caller skips that record and continues; a bad record must
/// never abort the batch.
pub fn normalize(product: &RawProduct, profile: &SourceProfile) -> Result<CanonicalProduct> {
    let reference = product.variants.first();

    let price = reference_price(product, reference)?;
    let mrp = list_price(product, reference, price)?;

    // Truncate before deriving the percent so the label agrees with the
    // written discount column.
    let discount = (mrp - price).trunc() as i64;
    let percent = if mrp > 0.0 {
        ((discount as f64 / mrp) * 100.0).floor() as i64
    } else {
        0
    };
    let discount_display_label = if discount > 0 {
        format!("({percent}% OFF)")
    } else {
        String::new()
    };

    let image_url = product
        .images
        .first()
        .map(|img| img.src.clone())
        .unwrap_or_default();
    let images = product
        .images
        .iter()
        .map(|img| img.src.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let primary_colour = reference
        .and_then(|v| v.option2.clone())
        .unwrap_or_default();

    let brand = product
        .vendor
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| profile.defaults.brand.clone());

    Ok(CanonicalProduct {
        brand,
        category: product.product_type.clone().unwrap_or_default(),
        discount,
        discount_display_label,
        gender: profile.defaults.gender.clone(),
        image_url,
        images,
        mrp: mrp.trunc() as i64,
        name: product.title.clone(),
        price: price.trunc() as i64,
        primary_colour,
        product_id: product.id.to_string(),
        product_url: profile.product_url(&product.handle),
        rating: profile.defaults.rating,
        rating_count: profile.defaults.rating_count,
        season: profile.defaults.season.clone(),
        sizes: collect_sizes(&product.variants),
        year: profile.defaults.year,
    })
}

/// Sale price from the reference variant; 0 when there are no variants or
/// the variant carries no price.
fn reference_price(product: &RawProduct, reference: Option<&RawVariant>) -> Result<f64> {
    match reference.and_then(|v| v.price.as_ref()) {
        Some(price) => price.parse().map_err(|err| record_error(product, err)),
        None => Ok(0.0),
    }
}

/// List price: the compare-at price when present and truthy, else the sale
/// price. Blank strings and non-positive values fall back; a present but
/// unparseable value fails the record.
fn list_price(product: &RawProduct, reference: Option<&RawVariant>, price: f64) -> Result<f64> {
    let compare_at = match reference.and_then(|v| v.compare_at_price.as_ref()) {
        Some(field) if !field.is_blank() => field,
        _ => return Ok(price),
    };

    let value = compare_at
        .parse()
        .map_err(|err| record_error(product, err))?;
    if value > 0.0 {
        Ok(value)
    } else {
        Ok(price)
    }
}

/// Deduplicated option1 values across all variants, first-seen order.
/// Variants without option1 contribute nothing.
fn collect_sizes(variants: &[RawVariant]) -> String {
    let mut seen = HashSet::new();
    let mut sizes = Vec::new();
    for size in variants.iter().filter_map(|v| v.option1.as_deref()) {
        if !size.is_empty() && seen.insert(size) {
            sizes.push(size);
        }
    }
    sizes.join(",")
}

fn record_error(product: &RawProduct, err: CdpError) -> CdpError {
    CdpError::Record {
        product_id: product.id.to_string(),
        reason: err.to_string(),
    }
}
