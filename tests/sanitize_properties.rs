use textsweep_lib::models::{Classification, DetectorSet, SanitizeOptions, ScanStats};
use textsweep_lib::services::{classify, has_encoded_payload, sanitize};

fn raw() -> SanitizeOptions {
    SanitizeOptions { strip_markup: false, normalize: false, detectors: DetectorSet::all() }
}

fn samples() -> Vec<String> {
    vec![
        String::new(),
        "plain ascii text".to_string(),
        "A\u{200B}B".to_string(),
        "A\u{00A0}B".to_string(),
        "\u{0410}pple \u{0435}xample".to_string(),
        "\u{202E}txt.exe\u{202C} and \u{200F}rtl\u{200E}".to_string(),
        format!("secret{}end", "\u{200B}\u{200C}".repeat(6)),
        "tab\tnewline\ncr\r\n".to_string(),
        "As an AI model, here is the \u{FEFF}answer.\u{3000}Feel free to ask!".to_string(),
        "**bold** and `code` with \u{00AD}soft hyphen".to_string(),
        "مرحبا\u{061C} في الختام\u{2066}نص\u{2069}".to_string(),
        "ﬁne ＡＢＣ \u{2060}joined".to_string(),
    ]
}

#[test]
fn test_second_pass_finds_nothing_hidden() {
    for opts in [raw(), SanitizeOptions::default(), SanitizeOptions { strip_markup: true, ..SanitizeOptions::default() }] {
        for text in samples() {
            let first = sanitize(&text, &opts);
            let second = sanitize(&first.clean_text, &opts);
            assert_eq!(second.stats.hidden_chars, 0, "residual hidden chars for {:?}", text);
        }
    }
}

#[test]
fn test_length_shrinks_only_by_hidden_chars() {
    for text in samples() {
        let resp = sanitize(&text, &raw());
        let before = text.chars().count();
        let after = resp.clean_text.chars().count();
        assert_eq!(before - after, resp.stats.hidden_chars, "{:?}", text);
        assert_eq!(before == after, resp.stats.hidden_chars == 0);
    }
}

#[test]
fn test_counters_match_classifier_and_markers() {
    for text in samples() {
        let resp = sanitize(&text, &raw());
        let hidden = text.chars().filter(|c| classify(*c).is_hidden()).count();
        let homoglyphs = text
            .chars()
            .filter(|c| matches!(classify(*c), Classification::Homoglyph(_)))
            .count();
        assert_eq!(resp.stats.hidden_chars, hidden);
        assert_eq!(resp.stats.homoglyphs, homoglyphs);
        assert_eq!(resp.annotated_text.matches("class=\"hidden\"").count(), hidden);
        assert_eq!(resp.annotated_text.matches("class=\"homoglyph\"").count(), homoglyphs);
        assert_eq!(
            resp.annotated_text.matches("class=\"space\"").count(),
            resp.stats.suspicious_spaces
        );
        assert_eq!(
            resp.annotated_text.matches("<mark ").count(),
            resp.annotated_text.matches("</mark>").count()
        );
    }
}

#[test]
fn test_tab_newline_cr_never_hidden() {
    for c in ['\n', '\t', '\r'] {
        assert_eq!(classify(c), Classification::Normal);
    }
    let resp = sanitize("a\tb\r\nc", &raw());
    assert_eq!(resp.clean_text, "a\tb\r\nc");
    assert_eq!(resp.stats.hidden_chars, 0);
}

#[test]
fn test_nbsp_becomes_plain_space() {
    let resp = sanitize("A\u{00A0}B", &raw());
    assert_eq!(resp.clean_text, "A B");
    assert_eq!(resp.stats.suspicious_spaces, 1);
    assert_eq!(resp.stats.hidden_chars, 0);
}

#[test]
fn test_zero_width_space_removed() {
    let resp = sanitize("A\u{200B}B", &SanitizeOptions::default());
    assert_eq!(resp.clean_text, "AB");
    assert_eq!(resp.stats.hidden_chars, 1);
}

#[test]
fn test_cyrillic_a_replaced() {
    let resp = sanitize("\u{0410}BC", &SanitizeOptions::default());
    assert_eq!(resp.clean_text, "ABC");
    assert_eq!(resp.stats.homoglyphs, 1);
}

#[test]
fn test_bold_markup_stripped() {
    let opts = SanitizeOptions { strip_markup: true, ..SanitizeOptions::default() };
    let resp = sanitize("**bold**", &opts);
    assert_eq!(resp.clean_text, "bold");
    assert!(resp.stats.markdown);
}

#[test]
fn test_ten_zero_width_spaces_flag_payload() {
    let text = "\u{200B}".repeat(10);
    assert!(has_encoded_payload(&text));
    let resp = sanitize(&text, &SanitizeOptions::default());
    assert!(resp.stats.encoded_payload);
    assert_eq!(resp.clean_text, "");
}

#[test]
fn test_empty_input_is_all_zero() {
    let resp = sanitize("", &SanitizeOptions { strip_markup: true, ..SanitizeOptions::default() });
    assert_eq!(resp.clean_text, "");
    assert_eq!(resp.annotated_text, "");
    assert_eq!(resp.stats, ScanStats::default());
}

#[test]
fn test_response_serializes_camel_case() {
    let resp = sanitize("A\u{200B}B", &SanitizeOptions::default());
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["cleanText"], "AB");
    assert_eq!(json["stats"]["hiddenChars"], 1);
    assert_eq!(json["stats"]["labels"]["ZWSP"], 1);
}
