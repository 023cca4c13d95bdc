// Sanitize Service
// Single entry point tying the locator, reconstructor and post-processor together.

use tracing::info;

use crate::models::{SanitizeOptions, SanitizeResponse};
use crate::services::config_store::{AppConfig, ConfigError};
use crate::services::pattern_locator::{has_encoded_payload, BoilerplateCatalog};
use crate::services::post_processor::finalize;
use crate::services::reconstructor::reconstruct_with;

/// Sanitize `text` using the built-in boilerplate phrase table.
pub fn sanitize(text: &str, options: &SanitizeOptions) -> SanitizeResponse {
    sanitize_with_catalog(text, options, BoilerplateCatalog::builtin())
}

pub fn sanitize_with_catalog(
    text: &str,
    options: &SanitizeOptions,
    catalog: &BoilerplateCatalog,
) -> SanitizeResponse {
    if text.is_empty() {
        return SanitizeResponse::default();
    }

    let detectors = &options.detectors;
    let intervals = if detectors.boilerplate { catalog.locate(text) } else { Vec::new() };
    let payload = detectors.payload && has_encoded_payload(text);

    let pass = reconstruct_with(text, &intervals, detectors);
    let mut stats = pass.stats;
    stats.encoded_payload = payload;

    let (clean_text, delta) = finalize(&pass.clean_text, options.normalize, options.strip_markup);
    stats.merge(&delta);

    info!(
        input_chars = text.chars().count(),
        output_chars = clean_text.chars().count(),
        hidden = stats.hidden_chars,
        homoglyphs = stats.homoglyphs,
        spaces = stats.suspicious_spaces,
        phrases = stats.boilerplate_phrases,
        payload = stats.encoded_payload,
        markdown = stats.markdown,
        "sanitize.done"
    );

    SanitizeResponse {
        clean_text,
        annotated_text: pass.annotated_text,
        stats,
    }
}

/// Options and phrase table bundled for repeated use.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    options: SanitizeOptions,
    catalog: BoilerplateCatalog,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(SanitizeOptions::default())
    }
}

impl Sanitizer {
    pub fn new(options: SanitizeOptions) -> Self {
        Self::with_catalog(options, BoilerplateCatalog::builtin().clone())
    }

    pub fn with_catalog(options: SanitizeOptions, catalog: BoilerplateCatalog) -> Self {
        Self { options, catalog }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_catalog(config.sanitize, config.phrases.build_catalog()?))
    }

    pub fn options_mut(&mut self) -> &mut SanitizeOptions {
        &mut self.options
    }

    pub fn catalog(&self) -> &BoilerplateCatalog {
        &self.catalog
    }

    pub fn sanitize(&self, text: &str) -> SanitizeResponse {
        sanitize_with_catalog(text, &self.options, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DetectorSet;
    use crate::services::config_store::{PhraseConfig, PhraseEntry};

    fn plain() -> SanitizeOptions {
        SanitizeOptions { strip_markup: false, normalize: false, detectors: DetectorSet::all() }
    }

    #[test]
    fn test_empty_input() {
        let resp = sanitize("", &SanitizeOptions::default());
        assert_eq!(resp.clean_text, "");
        assert_eq!(resp.annotated_text, "");
        assert!(resp.stats.is_clean());
    }

    #[test]
    fn test_zero_width_removed() {
        let resp = sanitize("A\u{200B}B", &plain());
        assert_eq!(resp.clean_text, "AB");
        assert_eq!(resp.stats.hidden_chars, 1);
    }

    #[test]
    fn test_payload_flag_only_reports() {
        let text = format!("hi{}there", "\u{200B}".repeat(10));
        let resp = sanitize(&text, &plain());
        assert!(resp.stats.encoded_payload);
        assert_eq!(resp.stats.hidden_chars, 10);
        assert_eq!(resp.clean_text, "hithere");

        let mut opts = plain();
        opts.detectors.payload = false;
        assert!(!sanitize(&text, &opts).stats.encoded_payload);
    }

    #[test]
    fn test_boilerplate_counted_and_marked() {
        let resp = sanitize("Here is the answer. I hope this helps!", &plain());
        assert_eq!(resp.stats.boilerplate_phrases, 2);
        assert_eq!(resp.annotated_text.matches("<mark").count(), 2);
        assert_eq!(resp.clean_text, "Here is the answer. I hope this helps!");

        let mut opts = plain();
        opts.detectors.boilerplate = false;
        assert_eq!(sanitize("Here is the answer.", &opts).stats.boilerplate_phrases, 0);
    }

    #[test]
    fn test_normalize_runs_on_clean_text() {
        let opts = SanitizeOptions { normalize: true, ..plain() };
        // U+0410 is replaced before NFKC, fullwidth A is folded by NFKC.
        let resp = sanitize("\u{0410}\u{FF21}", &opts);
        assert_eq!(resp.clean_text, "AA");
        assert_eq!(resp.stats.homoglyphs, 1);
        assert!(resp.stats.normalized);
    }

    #[test]
    fn test_nfkc_can_surface_a_homoglyph_for_the_next_pass() {
        // Mathematical bold capital alpha folds to Greek capital alpha under NFKC.
        let first = sanitize("\u{1D6A8}x", &SanitizeOptions::default());
        assert_eq!(first.clean_text, "\u{0391}x");
        assert_eq!(first.stats.homoglyphs, 0);
        assert!(first.stats.normalized);

        let second = sanitize(&first.clean_text, &SanitizeOptions::default());
        assert_eq!(second.clean_text, "Ax");
        assert_eq!(second.stats.homoglyphs, 1);
        assert_eq!(second.stats.hidden_chars, 0);
    }

    #[test]
    fn test_sanitizer_with_custom_phrases() {
        let config = AppConfig {
            phrases: PhraseConfig {
                replace_builtin: true,
                extra: vec![PhraseEntry { pattern: r"\bsynergy\b".to_string(), label: "buzzword".to_string() }],
            },
            ..AppConfig::default()
        };
        let sanitizer = Sanitizer::from_config(&config).unwrap();
        assert_eq!(sanitizer.catalog().len(), 1);
        let resp = sanitizer.sanitize("Here is the synergy.");
        assert_eq!(resp.stats.boilerplate_phrases, 1);
        assert_eq!(resp.stats.labels.get("phrase:buzzword"), Some(&1));
    }
}
