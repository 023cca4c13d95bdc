// Code Point Tables
// Static, read-only lookup data consulted by the classifier and the pattern locator.

use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CodePointRule {
    pub code_point: char,
    pub label: &'static str,
}

const fn rule(code_point: char, label: &'static str) -> CodePointRule {
    CodePointRule { code_point, label }
}

pub const ZERO_WIDTH_RULES: &[CodePointRule] = &[
    rule('\u{200B}', "ZWSP"),
    rule('\u{200C}', "ZWNJ"),
    rule('\u{200D}', "ZWJ"),
    rule('\u{FEFF}', "ZWNBSP"),
    rule('\u{2060}', "WJ"),
    rule('\u{2061}', "ZW_FUNCTION"),
    rule('\u{2062}', "ZW_TIMES"),
    rule('\u{2063}', "ZW_SEPARATOR"),
    rule('\u{2064}', "ZW_PLUS"),
];

pub const BIDI_RULES: &[CodePointRule] = &[
    rule('\u{200E}', "LRM"),
    rule('\u{200F}', "RLM"),
    rule('\u{061C}', "ALM"),
    rule('\u{202A}', "LRE"),
    rule('\u{202B}', "RLE"),
    rule('\u{202C}', "PDF"),
    rule('\u{202D}', "LRO"),
    rule('\u{202E}', "RLO"),
    rule('\u{2066}', "LRI"),
    rule('\u{2067}', "RLI"),
    rule('\u{2068}', "FSI"),
    rule('\u{2069}', "PDI"),
];

pub const SPACE_RULES: &[CodePointRule] = &[
    rule('\u{00A0}', "NBSP"),
    rule('\u{180E}', "MVS"),
    rule('\u{2000}', "NQSP"),
    rule('\u{2001}', "MQSP"),
    rule('\u{2002}', "ENSP"),
    rule('\u{2003}', "EMSP"),
    rule('\u{2004}', "3MSP"),
    rule('\u{2005}', "4MSP"),
    rule('\u{2006}', "6MSP"),
    rule('\u{2007}', "FSP"),
    rule('\u{2008}', "PSP"),
    rule('\u{2009}', "THSP"),
    rule('\u{200A}', "HSP"),
    rule('\u{202F}', "NNBSP"),
    rule('\u{205F}', "MMSP"),
    rule('\u{3000}', "IDSP"),
];

/// Label used for characters caught by the general-category rule.
pub const UNICODE_CONTROL_LABEL: &str = "UnicodeControl";

/// Control characters that are never flagged.
pub const PERMITTED_CONTROLS: [char; 3] = ['\n', '\t', '\r'];

/// Minimum run of payload characters that counts as an embedded payload.
pub const PAYLOAD_MIN_RUN: usize = 8;

pub fn find_rule(table: &'static [CodePointRule], c: char) -> Option<&'static CodePointRule> {
    table.iter().find(|r| r.code_point == c)
}

/// Characters usable as binary digits in zero-width steganography.
/// BOM and U+2064 are deliberately absent.
pub fn is_payload_char(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}'..='\u{2063}')
}

const HOMOGLYPH_PAIRS: &[(char, char)] = &[
    // Cyrillic capitals
    ('\u{0410}', 'A'),
    ('\u{0412}', 'B'),
    ('\u{0415}', 'E'),
    ('\u{041A}', 'K'),
    ('\u{041C}', 'M'),
    ('\u{041D}', 'H'),
    ('\u{041E}', 'O'),
    ('\u{0420}', 'P'),
    ('\u{0421}', 'C'),
    ('\u{0422}', 'T'),
    ('\u{0425}', 'X'),
    ('\u{0405}', 'S'),
    ('\u{0406}', 'I'),
    ('\u{0408}', 'J'),
    ('\u{04AE}', 'Y'),
    ('\u{051A}', 'Q'),
    ('\u{051C}', 'W'),
    // Cyrillic small
    ('\u{0430}', 'a'),
    ('\u{0435}', 'e'),
    ('\u{043E}', 'o'),
    ('\u{0440}', 'p'),
    ('\u{0441}', 'c'),
    ('\u{0443}', 'y'),
    ('\u{0445}', 'x'),
    ('\u{0455}', 's'),
    ('\u{0456}', 'i'),
    ('\u{0458}', 'j'),
    ('\u{0501}', 'd'),
    ('\u{04BB}', 'h'),
    ('\u{051B}', 'q'),
    ('\u{051D}', 'w'),
    // Greek
    ('\u{0391}', 'A'),
    ('\u{0392}', 'B'),
    ('\u{0395}', 'E'),
    ('\u{0396}', 'Z'),
    ('\u{0397}', 'H'),
    ('\u{0399}', 'I'),
    ('\u{039A}', 'K'),
    ('\u{039C}', 'M'),
    ('\u{039D}', 'N'),
    ('\u{039F}', 'O'),
    ('\u{03A1}', 'P'),
    ('\u{03A4}', 'T'),
    ('\u{03A5}', 'Y'),
    ('\u{03A7}', 'X'),
    ('\u{03BF}', 'o'),
    ('\u{03BD}', 'v'),
    // Armenian
    ('\u{0585}', 'o'),
];

fn homoglyph_map() -> &'static HashMap<char, char> {
    static MAP: OnceLock<HashMap<char, char>> = OnceLock::new();
    MAP.get_or_init(|| HOMOGLYPH_PAIRS.iter().copied().collect())
}

/// Latin look-alike for `c`, if `c` is a known confusable.
pub fn homoglyph_replacement(c: char) -> Option<char> {
    homoglyph_map().get(&c).copied()
}
