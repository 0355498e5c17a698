//! Carousel Core - CarouselSchema v1 validator and bundler
//!
//! # Ground Rules
//! 1. Validation reports, it never throws
//! 2. Errors block, warnings inform
//! 3. Identifiers are unique across the whole document
//! 4. Output order is deterministic
//! 5. Nothing is bundled without validation

pub mod assets;
pub mod bundle;
pub mod catalog;
pub mod config;
pub mod hashing;
pub mod inspect;
pub mod validation;

pub use assets::{collect_asset_refs, mime_for_path};
pub use bundle::{load_document, BundleError, BundleReport, BundleRequest, BundledAsset, Bundler};
pub use config::{BundleConfig, CarouselConfig, EditorialConfig};
pub use inspect::{inspect_archive, ArchiveAsset, ArchiveSummary};
pub use validation::{Finding, Severity, ValidationPolicy, ValidationReport, Validator};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The only schema version whose semantics are enforced.
pub const SCHEMA_VERSION: u32 = 1;

/// Validate with default editorial targets.
pub fn validate(document: &serde_json::Value) -> ValidationReport {
    Validator::new().validate(document)
}
