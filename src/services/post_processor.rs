// Post-processor
// Whole-string transforms applied to the reconstructor's clean text only.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::models::StatsDelta;

/// NFKC must run after hidden-character removal and homoglyph substitution,
/// so this only ever sees clean text.
pub fn finalize(clean_text: &str, normalize: bool, strip_markup: bool) -> (String, StatsDelta) {
    let mut delta = StatsDelta::default();
    let mut text = clean_text.to_string();

    if normalize {
        let normalized = normalize_nfkc(&text);
        delta.normalized = normalized != text;
        text = normalized;
    }

    if strip_markup {
        let (stripped, changed) = strip_markdown(&text);
        delta.markdown = changed;
        text = stripped;
    }

    (text, delta)
}

pub fn normalize_nfkc(text: &str) -> String {
    text.nfkc().collect()
}

fn markup_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            // bold, then single-marker emphasis; markers must hug the text
            (r"\*\*([^*\s](?:[^*\n]*[^*\s])?)\*\*", "${1}"),
            // underscore bold needs an inner space so `__init__` stays intact
            (r"__([^_\s][^_\n]*\s[^_\n]*[^_\s])__", "${1}"),
            (r"\*([^*\s](?:[^*\n]*[^*\s])?)\*", "${1}"),
            // inline code
            (r"`([^`\n]+)`", "${1}"),
            // [text](target)
            (r"\[([^\]\n]*)\]\([^)\n]*\)", "${1}"),
            // ATX headings
            (r"(?m)^[ \t]{0,3}#{1,6}[ \t]+", ""),
        ]
        .into_iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).expect("markup regex"), replacement))
        .collect()
    })
}

/// Remove lightweight markup, keeping the visible text. Returns whether anything changed.
pub fn strip_markdown(text: &str) -> (String, bool) {
    let mut out = text.to_string();
    let mut changed = false;
    for (re, replacement) in markup_rules() {
        let replaced = match re.replace_all(&out, *replacement) {
            Cow::Owned(s) => Some(s),
            Cow::Borrowed(_) => None,
        };
        if let Some(s) = replaced {
            changed = true;
            out = s;
        }
    }
    (out, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_is_unwrapped() {
        let (text, delta) = finalize("**bold**", true, true);
        assert_eq!(text, "bold");
        assert!(delta.markdown);
        assert!(!delta.normalized);
    }

    #[test]
    fn test_markup_left_alone_when_disabled() {
        let (text, delta) = finalize("**bold**", false, false);
        assert_eq!(text, "**bold**");
        assert_eq!(delta, StatsDelta::default());
    }

    #[test]
    fn test_strip_all_markup_kinds() {
        let input = "# Title\nSome *emphasis*, __very strong__ and `code`.\n  ## See [the docs](https://example.com/x)";
        let (text, changed) = strip_markdown(input);
        assert!(changed);
        assert_eq!(text, "Title\nSome emphasis, very strong and code.\nSee the docs");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let (text, changed) = strip_markdown("2 * 3 = 6, price #1");
        assert_eq!(text, "2 * 3 = 6, price #1");
        assert!(!changed);
    }

    #[test]
    fn test_arithmetic_stars_are_not_emphasis() {
        let (text, changed) = strip_markdown("2 * 3 * 4 = 24");
        assert_eq!(text, "2 * 3 * 4 = 24");
        assert!(!changed);

        let (text, changed) = strip_markdown("x ** 2 ** y");
        assert_eq!(text, "x ** 2 ** y");
        assert!(!changed);
    }

    #[test]
    fn test_dunder_identifiers_survive() {
        let code = "def __init__(self): __slots__ = ()";
        let (text, changed) = strip_markdown(code);
        assert_eq!(text, code);
        assert!(!changed);

        let (_, delta) = finalize(code, true, true);
        assert!(!delta.markdown);
    }

    #[test]
    fn test_nfkc_folds_compatibility_forms() {
        assert_eq!(normalize_nfkc("\u{FB01}le \u{FF21}"), "file A");
        let (_, delta) = finalize("\u{FF21}", true, false);
        assert!(delta.normalized);
    }

    #[test]
    fn test_nfkc_exposes_fullwidth_markup() {
        let (text, delta) = finalize("\u{FF0A}\u{FF0A}x\u{FF0A}\u{FF0A}", true, true);
        assert_eq!(text, "x");
        assert!(delta.normalized);
        assert!(delta.markdown);
    }
}
