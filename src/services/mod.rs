// Textsweep Core Services
// Classifier -> pattern locator -> reconstructor -> post-processor, plus config.

pub mod code_points;
pub mod classifier;
pub mod pattern_locator;
pub mod reconstructor;
pub mod post_processor;
pub mod sanitizer;
pub mod config_store;

pub use classifier::{classify, classify_code_point, classify_with};
pub use config_store::{AppConfig, ConfigError, ConfigStore, PhraseConfig, PhraseEntry};
pub use pattern_locator::{
    has_encoded_payload,
    locate_boilerplate,
    longest_zero_width_run,
    BoilerplateCatalog,
    CatalogError,
    PhrasePattern,
};
pub use post_processor::{finalize, normalize_nfkc, strip_markdown};
pub use reconstructor::{reconstruct, reconstruct_with};
pub use sanitizer::{sanitize, sanitize_with_catalog, Sanitizer};
