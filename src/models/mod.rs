// Textsweep Data Models
// Shared by the engine stages, the config store and the CLI

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============ Options ============

/// Which classifier rules and pattern detectors are active for a run.
///
/// A disabled rule does not stop classification; the character simply falls
/// through to the next rule in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorSet {
    #[serde(default = "default_true")]
    pub zero_width: bool,
    #[serde(default = "default_true")]
    pub bidi: bool,
    #[serde(default = "default_true")]
    pub spaces: bool,
    #[serde(default = "default_true")]
    pub controls: bool,
    #[serde(default = "default_true")]
    pub homoglyphs: bool,
    #[serde(default = "default_true")]
    pub boilerplate: bool,
    #[serde(default = "default_true")]
    pub payload: bool,
}

impl Default for DetectorSet {
    fn default() -> Self {
        Self::all()
    }
}

impl DetectorSet {
    pub const fn all() -> Self {
        Self {
            zero_width: true,
            bidi: true,
            spaces: true,
            controls: true,
            homoglyphs: true,
            boilerplate: true,
            payload: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            zero_width: false,
            bidi: false,
            spaces: false,
            controls: false,
            homoglyphs: false,
            boilerplate: false,
            payload: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeOptions {
    #[serde(default)]
    pub strip_markup: bool,
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default)]
    pub detectors: DetectorSet,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            strip_markup: false,
            normalize: true,
            detectors: DetectorSet::all(),
        }
    }
}

fn default_true() -> bool { true }

// ============ Classification ============

/// Per-character verdict produced by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Normal,
    Hidden(&'static str),
    SuspiciousSpace(&'static str),
    Homoglyph(char),
}

impl Classification {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden(_))
    }
}

/// Labeled span over the *character* indices of the original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl Interval {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self { start, end, label: label.into() }
    }

    /// `0 <= start < end <= len`
    pub fn is_valid_for(&self, len: usize) -> bool {
        self.start < self.end && self.end <= len
    }
}

// ============ Results ============

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub hidden_chars: usize,
    pub homoglyphs: usize,
    #[serde(alias = "weirdSpaces")]
    pub suspicious_spaces: usize,
    pub boilerplate_phrases: usize,
    pub encoded_payload: bool,
    pub markdown: bool,
    pub normalized: bool,
    /// Occurrences per finding label (`ZWSP`, `NBSP`, `А→A`, phrase labels, ...).
    #[serde(default)]
    pub labels: BTreeMap<String, usize>,
}

impl ScanStats {
    pub fn total_findings(&self) -> usize {
        self.hidden_chars + self.homoglyphs + self.suspicious_spaces + self.boilerplate_phrases
    }

    pub fn is_clean(&self) -> bool {
        self.total_findings() == 0 && !self.encoded_payload && !self.markdown
    }

    pub(crate) fn bump_label(&mut self, label: &str) {
        *self.labels.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Fold the post-processor's contribution into the pass counters.
    pub fn merge(&mut self, delta: &StatsDelta) {
        self.markdown |= delta.markdown;
        self.normalized |= delta.normalized;
    }
}

/// Fields the post-processor contributes on top of a reconstruction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsDelta {
    pub markdown: bool,
    pub normalized: bool,
}

/// Output of a single reconstruction pass; the three fields are produced together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionOutput {
    pub clean_text: String,
    pub annotated_text: String,
    pub stats: ScanStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeResponse {
    pub clean_text: String,
    pub annotated_text: String,
    pub stats: ScanStats,
}

impl SanitizeResponse {
    pub fn summary(&self) -> String {
        let s = &self.stats;
        format!(
            "hidden={} homoglyphs={} spaces={} phrases={} payload={} markdown={} normalized={}",
            s.hidden_chars,
            s.homoglyphs,
            s.suspicious_spaces,
            s.boilerplate_phrases,
            yes_no(s.encoded_payload),
            yes_no(s.markdown),
            yes_no(s.normalized),
        )
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
