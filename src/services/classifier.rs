// Character Classifier
// Decides, one scalar value at a time, whether a character is hidden, a suspicious
// space, a homoglyph, or ordinary text. Rules are tried in a fixed order; first match wins.

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::models::{Classification, DetectorSet};
use crate::services::code_points::{
    find_rule, homoglyph_replacement, BIDI_RULES, PERMITTED_CONTROLS, SPACE_RULES,
    UNICODE_CONTROL_LABEL, ZERO_WIDTH_RULES,
};

/// Classify `c` with every detector enabled.
pub fn classify(c: char) -> Classification {
    classify_with(c, &DetectorSet::all())
}

/// Classify `c`, skipping the rules whose detector is switched off.
pub fn classify_with(c: char, detectors: &DetectorSet) -> Classification {
    if detectors.zero_width {
        if let Some(rule) = find_rule(ZERO_WIDTH_RULES, c) {
            return Classification::Hidden(rule.label);
        }
    }
    if detectors.bidi {
        if let Some(rule) = find_rule(BIDI_RULES, c) {
            return Classification::Hidden(rule.label);
        }
    }
    if detectors.spaces {
        if let Some(rule) = find_rule(SPACE_RULES, c) {
            return Classification::SuspiciousSpace(rule.label);
        }
    }
    if detectors.controls && is_invisible_control(c) {
        return Classification::Hidden(UNICODE_CONTROL_LABEL);
    }
    if detectors.homoglyphs {
        if let Some(replacement) = homoglyph_replacement(c) {
            return Classification::Homoglyph(replacement);
        }
    }
    Classification::Normal
}

/// Classify a raw code point. Values that are not Unicode scalar values
/// (lone surrogates, out of range) come back as `Normal`.
pub fn classify_code_point(cp: u32) -> Classification {
    match char::from_u32(cp) {
        Some(c) => classify(c),
        None => Classification::Normal,
    }
}

fn is_invisible_control(c: char) -> bool {
    if PERMITTED_CONTROLS.contains(&c) {
        return false;
    }
    matches!(
        get_general_category(c),
        GeneralCategory::Format | GeneralCategory::Control | GeneralCategory::Surrogate
    )
}
