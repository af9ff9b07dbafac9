//! Tests for colorized nickname parsing.

use badge_common::{ColorScheme, ColoredString, Rgb};
use rand::Rng;

fn parse(raw: &str) -> ColoredString {
    ColoredString::parse(raw, ColorScheme::Xonotic)
}

fn texts(s: &ColoredString) -> Vec<&str> {
    s.color_parts().iter().map(|p| p.text.as_str()).collect()
}

// ============================================================================
// Plain strings
// ============================================================================

#[test]
fn test_no_escapes_single_segment() {
    let s = parse("PlayerOne");
    assert_eq!(s.color_parts().len(), 1);
    assert_eq!(s.color_parts()[0].text, "PlayerOne");
    assert_eq!(s.color_parts()[0].color, Rgb::WHITE);
    assert_eq!(s.stripped(), "PlayerOne");
    assert_eq!(s.raw(), "PlayerOne");
}

#[test]
fn test_empty_string_has_one_empty_segment() {
    let s = parse("");
    assert_eq!(s.color_parts().len(), 1);
    assert_eq!(s.color_parts()[0].text, "");
    assert!(s.is_empty());
}

// ============================================================================
// Color escapes
// ============================================================================

#[test]
fn test_digit_escapes_split_segments() {
    let s = parse("^1Red^2Green");
    assert_eq!(texts(&s), vec!["Red", "Green"]);
    assert_eq!(s.color_parts()[0].color, Rgb::new(1.0, 0.0, 0.0));
    assert_eq!(s.color_parts()[1].color, Rgb::new(0.0, 1.0, 0.0));
    assert_eq!(s.stripped(), "RedGreen");
}

#[test]
fn test_text_before_first_escape_uses_default_color() {
    let s = parse("pre^4blue");
    assert_eq!(texts(&s), vec!["pre", "blue"]);
    assert_eq!(s.color_parts()[0].color, Rgb::WHITE);
    assert_eq!(s.color_parts()[1].color, Rgb::new(0.0, 0.0, 1.0));
}

#[test]
fn test_hex_escape() {
    let s = parse("^xF80orange");
    assert_eq!(s.color_parts().len(), 1);
    let c = s.color_parts()[0].color;
    assert!((c.r - 1.0).abs() < 1e-9);
    assert!((c.g - 8.0 / 15.0).abs() < 1e-9);
    assert!(c.b.abs() < 1e-9);
    assert_eq!(s.stripped(), "orange");
}

#[test]
fn test_consecutive_escapes_last_wins() {
    let s = parse("^1^3yellow");
    assert_eq!(texts(&s), vec!["yellow"]);
    assert_eq!(s.color_parts()[0].color, Rgb::new(1.0, 1.0, 0.0));
}

#[test]
fn test_trailing_escape_only() {
    let s = parse("name^7");
    assert_eq!(texts(&s), vec!["name"]);
    assert_eq!(s.stripped(), "name");
}

// ============================================================================
// Literal fallbacks
// ============================================================================

#[test]
fn test_unknown_selector_is_literal() {
    let s = parse("a^zb");
    assert_eq!(s.stripped(), "a^zb");
    assert_eq!(s.color_parts().len(), 1);
}

#[test]
fn test_truncated_hex_is_literal() {
    let s = parse("a^x1");
    assert_eq!(s.stripped(), "a^x1");
}

#[test]
fn test_invalid_hex_digit_is_literal() {
    let s = parse("^xg00name");
    assert_eq!(s.stripped(), "^xg00name");
}

#[test]
fn test_dangling_marker_is_literal() {
    let s = parse("end^");
    assert_eq!(s.stripped(), "end^");
}

#[test]
fn test_double_caret_is_literal_caret() {
    let s = parse("a^^1b");
    assert_eq!(s.stripped(), "a^1b");
    assert_eq!(s.color_parts().len(), 1);
}

// ============================================================================
// Schemes
// ============================================================================

#[test]
fn test_quake_scheme_ignores_hex() {
    let s = ColoredString::parse("^xF00red", ColorScheme::Quake);
    assert_eq!(s.stripped(), "^xF00red");
}

#[test]
fn test_quake_scheme_keeps_private_glyphs() {
    let s = ColoredString::parse("\u{E041}", ColorScheme::Quake);
    assert_eq!(s.stripped(), "\u{E041}");
}

#[test]
fn test_xonotic_glyphs_are_decoded() {
    let s = parse("\u{E0C8}\u{E069}");
    assert_eq!(s.stripped(), "Hi");
}

// ============================================================================
// Randomized properties
// ============================================================================

#[test]
fn test_random_strings_keep_invariants() {
    let alphabet: Vec<char> = "^^^x0123456789abcdefFGz _-\u{E041}".chars().collect();
    let mut rng = rand::thread_rng();

    for _ in 0..2000 {
        let len = rng.gen_range(0..24);
        let raw: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();

        let parsed = parse(&raw);
        let stripped = parsed.stripped();

        assert!(stripped.len() <= raw.len(), "raw={:?}", raw);
        assert!(stripped.chars().count() <= raw.chars().count(), "raw={:?}", raw);
        assert!(!parsed.color_parts().is_empty());

        let joined: String = parsed.color_parts().iter().map(|p| p.text.as_str()).collect();
        assert_eq!(joined, stripped);
    }
}

/// Random nick built from plain chunks and well-formed escapes.
fn random_escaped_nick(rng: &mut impl Rng) -> String {
    const PLAIN: &[char] = &['a', 'B', 'x', '7', ' ', '-', '_', 'F'];
    const HEX: &[char] = &['0', '5', '9', 'a', 'C', 'f'];

    let mut out = String::new();
    for _ in 0..rng.gen_range(0..8) {
        match rng.gen_range(0..3) {
            0 => {
                out.push('^');
                out.push(char::from(b'0' + rng.gen_range(0..10u8)));
            }
            1 => {
                out.push_str("^x");
                for _ in 0..3 {
                    out.push(HEX[rng.gen_range(0..HEX.len())]);
                }
            }
            _ => {
                for _ in 0..rng.gen_range(1..5) {
                    out.push(PLAIN[rng.gen_range(0..PLAIN.len())]);
                }
            }
        }
    }
    out
}

#[test]
fn test_random_escaped_nicks_strip_all_markers() {
    let mut rng = rand::thread_rng();

    for _ in 0..2000 {
        let raw = random_escaped_nick(&mut rng);
        let parsed = parse(&raw);

        assert!(!parsed.stripped().contains('^'), "raw={:?}", raw);
        assert!(parsed.stripped().len() <= raw.len());
    }
}

#[test]
fn test_random_plain_strings_are_single_segment() {
    let alphabet: Vec<char> = "abcXYZ 0123 _-.".chars().collect();
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let len = rng.gen_range(1..20);
        let raw: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();

        let parsed = parse(&raw);
        assert_eq!(parsed.color_parts().len(), 1);
        assert_eq!(parsed.color_parts()[0].text, raw);
    }
}
