// Pattern Locator
// Finds multi-character regions of interest: stock "AI boilerplate" phrases and
// long runs of zero-width characters that look like an embedded payload.

use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

use crate::models::Interval;
use crate::services::code_points::{is_payload_char, PAYLOAD_MIN_RUN};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid phrase pattern for label '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },
    #[error("phrase pattern for label '{0}' is empty")]
    EmptyPattern(String),
}

/// Built-in phrase table: (pattern, label). Matched case-insensitively.
const BUILTIN_PHRASES: &[(&str, &str)] = &[
    // English
    (r"\bas an ai(?: language)? model\b", "ai_disclaimer"),
    (r"\bi(?:'m| am) (?:just )?an ai\b", "ai_disclaimer"),
    (r"\bhere (?:is|are) the\b", "here_is"),
    (r"\bhere's (?:a|an|the)\b", "here_is"),
    (r"\bfeel free to (?:ask|reach out|let me know)\b", "offer_help"),
    (r"\bi hope this helps\b", "offer_help"),
    (r"\b(?:please )?let me know if you (?:have any|need)\b", "offer_help"),
    (r"\bi hope this (?:email|message) finds you well\b", "greeting"),
    (r"\bit(?:'s| is) (?:important|worth) (?:to note|noting)\b", "hedge"),
    (r"\bin conclusion\b", "conclusion"),
    (r"\bdelve (?:into|deeper)\b", "ai_vocabulary"),
    // Arabic
    (r"بصفتي (?:نموذج|نموذجًا) (?:لغوي|ذكاء اصطناعي)", "ai_disclaimer"),
    (r"كنموذج ذكاء اصطناعي", "ai_disclaimer"),
    (r"\bإليك\b", "here_is"),
    (r"لا تتردد في (?:السؤال|طرح|التواصل)", "offer_help"),
    (r"آمل أن (?:يكون|تكون) (?:هذا|هذه) مفيد", "offer_help"),
    (r"من المهم (?:أن نلاحظ|الإشارة)", "hedge"),
    (r"في الختام", "conclusion"),
];

#[derive(Debug, Clone)]
pub struct PhrasePattern {
    pub label: String,
    regex: Regex,
}

impl PhrasePattern {
    pub fn new(pattern: &str, label: &str) -> Result<Self, CatalogError> {
        if pattern.trim().is_empty() {
            return Err(CatalogError::EmptyPattern(label.to_string()));
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                label: label.to_string(),
                source,
            })?;
        Ok(Self { label: label.to_string(), regex })
    }
}

/// Ordered, swappable table of boilerplate phrase patterns.
///
/// Matching uses the `regex` crate, so every pattern runs in time linear in the
/// input regardless of how adversarial the text is.
#[derive(Debug, Clone, Default)]
pub struct BoilerplateCatalog {
    patterns: Vec<PhrasePattern>,
}

impl BoilerplateCatalog {
    pub fn builtin() -> &'static BoilerplateCatalog {
        static CATALOG: OnceLock<BoilerplateCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            BoilerplateCatalog::from_entries(BUILTIN_PHRASES.iter().copied())
                .expect("builtin phrase patterns")
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<'a, I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut catalog = Self::empty();
        catalog.extend(entries)?;
        Ok(catalog)
    }

    pub fn extend<'a, I>(&mut self, entries: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (pattern, label) in entries {
            self.patterns.push(PhrasePattern::new(pattern, label)?);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Every match of every pattern, as character-offset intervals.
    /// Overlapping matches from different patterns are all kept.
    pub fn locate(&self, text: &str) -> Vec<Interval> {
        if text.is_empty() || self.patterns.is_empty() {
            return Vec::new();
        }

        let offsets = CharOffsets::new(text);
        let mut intervals = Vec::new();
        for pattern in &self.patterns {
            for m in pattern.regex.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                intervals.push(Interval::new(
                    offsets.char_index(m.start()),
                    offsets.char_index(m.end()),
                    pattern.label.clone(),
                ));
            }
        }

        debug!(patterns = self.patterns.len(), matches = intervals.len(), "locator.boilerplate");
        intervals
    }
}

/// Locate boilerplate phrases with the built-in catalog.
pub fn locate_boilerplate(text: &str) -> Vec<Interval> {
    BoilerplateCatalog::builtin().locate(text)
}

/// Length of the longest run of consecutive zero-width payload characters.
pub fn longest_zero_width_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if is_payload_char(c) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// True when the text carries a run of eight or more zero-width payload characters.
pub fn has_encoded_payload(text: &str) -> bool {
    longest_zero_width_run(text) >= PAYLOAD_MIN_RUN
}

/// Byte offset -> character index lookup for one string.
struct CharOffsets {
    starts: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        Self { starts: text.char_indices().map(|(b, _)| b).collect() }
    }

    // `byte` is always a char boundary (regex matches are), or text.len().
    fn char_index(&self, byte: usize) -> usize {
        self.starts.binary_search(&byte).unwrap_or_else(|i| i)
    }
}
