//! Character reference decoding.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//! lists more than two thousand names. Only the ones that show up in ordinary
//! prose are recognized here; anything else is left in the text literally.

/// Named references recognized when followed by ";".
const NAMED_REFERENCES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{00A0}"),
    ("copy", "\u{00A9}"),
    ("reg", "\u{00AE}"),
    ("trade", "\u{2122}"),
    ("hellip", "\u{2026}"),
    ("mdash", "\u{2014}"),
    ("ndash", "\u{2013}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("ldquo", "\u{201C}"),
    ("rdquo", "\u{201D}"),
    ("laquo", "\u{00AB}"),
    ("raquo", "\u{00BB}"),
    ("middot", "\u{00B7}"),
    ("bull", "\u{2022}"),
    ("times", "\u{00D7}"),
    ("divide", "\u{00F7}"),
    ("deg", "\u{00B0}"),
    ("euro", "\u{20AC}"),
    ("pound", "\u{00A3}"),
    ("sect", "\u{00A7}"),
    ("para", "\u{00B6}"),
];

/// Looks up a named reference (without the leading "&" and trailing ";").
#[must_use]
pub fn lookup_named_reference(name: &str) -> Option<&'static str> {
    NAMED_REFERENCES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, value)| *value)
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is 0x00, then this is a null-character-reference parse error.
/// Set the character reference code to 0xFFFD."
/// "If the number is greater than 0x10FFFF, then this is a
/// character-reference-outside-unicode-range parse error. Set the character
/// reference code to 0xFFFD."
/// "If the number is a surrogate, then this is a surrogate-character-reference
/// parse error. Set the character reference code to 0xFFFD."
#[must_use]
pub fn decode_numeric_reference(digits: &str, radix: u32) -> char {
    u32::from_str_radix(digits, radix)
        .ok()
        .filter(|&code| code != 0)
        .and_then(char::from_u32)
        .unwrap_or('\u{FFFD}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_numeric_reference("65", 10), 'A');
        assert_eq!(decode_numeric_reference("263a", 16), '\u{263A}');
        assert_eq!(decode_numeric_reference("0", 10), '\u{FFFD}');
        assert_eq!(decode_numeric_reference("D800", 16), '\u{FFFD}');
        assert_eq!(decode_numeric_reference("99999999999", 10), '\u{FFFD}');
    }

    #[test]
    fn test_named_references() {
        assert_eq!(lookup_named_reference("amp"), Some("&"));
        assert_eq!(lookup_named_reference("nbsp"), Some("\u{00A0}"));
        assert_eq!(lookup_named_reference("AMP"), None);
        assert_eq!(lookup_named_reference("bogus"), None);
    }
}
