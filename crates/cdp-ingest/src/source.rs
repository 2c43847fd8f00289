//! Per-source harvest configuration.
//!
//! Each source is described declaratively: where its collection endpoint
//! lives, how to page through it, and the canonical-field defaults the
//! source itself never supplies (gender, season, year, ratings). Profiles
//! are resolved at harvest time by key, either from the built-in registry
//! or from a JSON file.

use cdp_common::{CdpError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative mapping configuration for one catalog source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceProfile {
    /// Registry key, e.g. "rare-rabbit"
    pub key: String,

    /// Collection endpoint template; `{handle}` is substituted per harvest
    pub collection_url: String,

    /// Storefront base URL used to build product page links
    pub store_url: String,

    /// Products requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Courtesy pause between page requests, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Safety cap on pages per harvest, for endpoints that never signal
    /// exhaustion
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Canonical-field values the source does not carry
    pub defaults: FieldDefaults,
}

/// Fixed values for canonical fields absent from a source's schema.
///
/// These are explicit per-source policy, not inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefaults {
    /// Fallback brand when a product has no vendor
    pub brand: String,
    pub gender: String,
    pub season: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_count: i64,
    pub year: i32,
}

fn default_page_size() -> u32 {
    250
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_max_pages() -> u32 {
    500
}

impl SourceProfile {
    /// Look up a built-in source by key.
    ///
    /// # Errors
    ///
    /// Returns [`CdpError::UnknownSource`] for a key outside the registry.
    pub fn builtin(key: &str) -> Result<Self> {
        builtin_profiles()
            .into_iter()
            .find(|p| p.key == key)
            .ok_or_else(|| CdpError::UnknownSource(key.to_string()))
    }

    /// Keys of all built-in sources, for diagnostics.
    pub fn builtin_keys() -> Vec<String> {
        builtin_profiles().into_iter().map(|p| p.key).collect()
    }

    /// Load a profile from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let profile: SourceProfile = serde_json::from_str(&raw)?;
        Ok(profile)
    }

    /// Concrete collection endpoint for one collection handle.
    pub fn collection_endpoint(&self, handle: &str) -> String {
        self.collection_url.replace("{handle}", handle)
    }

    /// Product page URL for a product's slug.
    pub fn product_url(&self, handle: &str) -> String {
        format!("{}/products/{}", self.store_url.trim_end_matches('/'), handle)
    }
}

/// The sources this pipeline currently knows how to harvest.
fn builtin_profiles() -> Vec<SourceProfile> {
    vec![
        SourceProfile {
            key: "rare-rabbit".to_string(),
            collection_url: "https://thehouseofrare.com/collections/{handle}/products.json"
                .to_string(),
            store_url: "https://thehouseofrare.com".to_string(),
            page_size: default_page_size(),
            delay_ms: default_delay_ms(),
            max_pages: default_max_pages(),
            defaults: FieldDefaults {
                brand: "RARE RABBIT".to_string(),
                gender: "Men".to_string(),
                season: "New Arrival".to_string(),
                rating: 0.0,
                rating_count: 0,
                year: 2026,
            },
        },
        SourceProfile {
            key: "snitch".to_string(),
            collection_url: "https://www.snitch.co.in/collections/{handle}/products.json"
                .to_string(),
            store_url: "https://www.snitch.co.in".to_string(),
            page_size: default_page_size(),
            delay_ms: default_delay_ms(),
            max_pages: default_max_pages(),
            defaults: FieldDefaults {
                brand: "SNITCH".to_string(),
                gender: "Men".to_string(),
                season: "New Arrival".to_string(),
                rating: 0.0,
                rating_count: 0,
                year: 2026,
            },
        },
        SourceProfile {
            key: "technosport".to_string(),
            collection_url: "https://technosport.in/collections/{handle}/products.json"
                .to_string(),
            store_url: "https://technosport.in".to_string(),
            page_size: default_page_size(),
            delay_ms: default_delay_ms(),
            max_pages: default_max_pages(),
            defaults: FieldDefaults {
                brand: "TechnoSport".to_string(),
                gender: "Men".to_string(),
                season: "Active".to_string(),
                rating: 0.0,
                rating_count: 0,
                year: 2026,
            },
        },
        SourceProfile {
            key: "fuaark".to_string(),
            collection_url: "https://fuaark.com/collections/{handle}/products.json".to_string(),
            store_url: "https://fuaark.com".to_string(),
            page_size: default_page_size(),
            delay_ms: default_delay_ms(),
            max_pages: default_max_pages(),
            defaults: FieldDefaults {
                brand: "Fuaark".to_string(),
                gender: "Men".to_string(),
                season: "Training".to_string(),
                rating: 0.0,
                rating_count: 0,
                year: 2026,
            },
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let profile = SourceProfile::builtin("rare-rabbit").unwrap();
        assert_eq!(profile.defaults.brand, "RARE RABBIT");
        assert_eq!(profile.page_size, 250);
    }

    #[test]
    fn test_builtin_unknown_key() {
        let err = SourceProfile::builtin("asos").unwrap_err();
        assert!(matches!(err, CdpError::UnknownSource(ref key) if key == "asos"));
    }

    #[test]
    fn test_collection_endpoint_substitutes_handle() {
        let profile = SourceProfile::builtin("rare-rabbit").unwrap();
        assert_eq!(
            profile.collection_endpoint("rare-rr-men-shirts"),
            "https://thehouseofrare.com/collections/rare-rr-men-shirts/products.json"
        );
    }

    #[test]
    fn test_product_url_handles_trailing_slash() {
        let mut profile = SourceProfile::builtin("fuaark").unwrap();
        profile.store_url.push('/');
        assert_eq!(
            profile.product_url("apex-tee"),
            "https://fuaark.com/products/apex-tee"
        );
    }

    #[test]
    fn test_profile_json_round_trip() {
        let profile = SourceProfile::builtin("technosport").unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        let back: SourceProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key, profile.key);
        assert_eq!(back.defaults.season, profile.defaults.season);
    }

    #[test]
    fn test_profile_file_defaults_apply() {
        // Paging knobs may be omitted from a profile file.
        let json = r#"{
            "key": "custom",
            "collection_url": "https://shop.example/collections/{handle}/products.json",
            "store_url": "https://shop.example",
            "defaults": {"brand": "X", "gender": "Women", "season": "Summer", "year": 2026}
        }"#;
        let profile: SourceProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.page_size, 250);
        assert_eq!(profile.delay_ms, 1000);
        assert_eq!(profile.max_pages, 500);
        assert_eq!(profile.defaults.rating, 0.0);
    }
}
