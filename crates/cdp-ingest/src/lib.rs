//! CDP Ingest Library
//!
//! Tools for harvesting paginated product catalogs from e-commerce sources,
//! normalizing them into the canonical flat schema, and consolidating the
//! resulting tabular files.
//!
//! # Pipeline
//!
//! 1. **Harvest**: page through a source's JSON collection endpoint,
//!    normalizing each product into a [`cdp_common::types::CanonicalProduct`]
//! 2. **Merge**: union several per-source CSV files into one dataset
//! 3. **Split**: repartition a dataset into fixed-size chunk files
//!
//! # Example
//!
//! ```no_run
//! use cdp_ingest::harvest::{Harvester, NoopObserver};
//! use cdp_ingest::source::SourceProfile;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let profile = SourceProfile::builtin("rare-rabbit")?;
//!     let harvester = Harvester::new(profile)?;
//!     let report = harvester
//!         .harvest("rare-rr-men-shirts", &mut NoopObserver)
//!         .await;
//!     println!("{} products", report.records.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod harvest;
pub mod merge;
pub mod normalize;
pub mod partition;
pub mod source;
pub mod types;
pub mod writer;
