//! Activity-code mini-language: sanitizer, syntax validator, and decoder.
//!
//! A raw code string like `"3a, 2B/1s"` is first sanitized to `"3A2B1S"`,
//! then decoded into per-letter hour counts: a run of digits sets the
//! current multiplier and every following letter receives it.

use crate::error::DecodeError;
use std::collections::BTreeMap;

/// Letters that are always valid activity codes regardless of the
/// configured letter range.
pub const RESERVED_LETTERS: [char; 2] = ['S', 'P'];

/// Separator used when rendering accumulated notes/stories.
pub const NOTE_SEPARATOR: &str = "||";

/// How the decoder reacts to letters outside the configured range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Any unrecognized character is an error carrying that character.
    Strict,
    /// Letters beyond the range bound are remapped to the last letter in
    /// range, tolerating near-miss typos.
    Lenient,
}

/// Strips cosmetic punctuation and whitespace from a raw activity-code
/// string and upper-cases the remainder.
///
/// Tolerates copy-paste artifacts (commas, slashes, stray separators)
/// entered by humans across dozens of rows. Never fails; empty input
/// yields empty output.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\n' | '\r' | '\\' | '/' | ':' | '.'))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Checks a sanitized code string for malformed sequences without
/// decoding it.
///
/// Two independent checks, either one triggers invalid:
/// 1. a character outside {0-9} ∪ {A..=max_letter} ∪ {S, P};
/// 2. a digit immediately followed by something that is neither a digit
///    nor an uppercase ASCII letter.
pub fn is_invalid(sanitized: &str, max_letter: char) -> bool {
    let in_alphabet = |c: char| {
        c.is_ascii_digit()
            || (c.is_ascii_uppercase() && (c <= max_letter || RESERVED_LETTERS.contains(&c)))
    };

    if sanitized.chars().any(|c| !in_alphabet(c)) {
        return true;
    }

    let chars: Vec<char> = sanitized.chars().collect();
    chars.windows(2).any(|pair| {
        pair[0].is_ascii_digit() && !(pair[1].is_ascii_digit() || pair[1].is_ascii_uppercase())
    })
}

/// Decodes a sanitized activity-code string into per-letter hour counts.
///
/// A single left-to-right scan with a local "current multiplier" register
/// initialized to 0:
/// - a run of consecutive digits parses as one multi-digit integer and
///   becomes the multiplier (`"12A"` is {A:12}, not {A:2});
/// - `S` and `P` always receive the multiplier;
/// - other letters receive it when within `max_letter`; beyond the bound
///   they are remapped per `DecodeMode::Lenient` or rejected per
///   `DecodeMode::Strict`;
/// - any non-digit, non-letter character is an error carrying that
///   character (reachable only when validation was skipped).
///
/// A bare letter with no preceding digit contributes an explicit 0 entry,
/// so the caller can tell "seen with no quantity" apart from "never seen".
/// Multipliers and per-letter totals saturate at `u64::MAX` instead of
/// overflowing, so decoding a validated string can never panic.
pub fn decode(
    sanitized: &str,
    max_letter: char,
    mode: DecodeMode,
) -> Result<BTreeMap<char, u64>, DecodeError> {
    let mut totals: BTreeMap<char, u64> = BTreeMap::new();
    let mut multiplier: u64 = 0;

    let mut chars = sanitized.chars().peekable();
    while let Some(current) = chars.next() {
        if current.is_ascii_digit() {
            // Consume the entire digit run as one multi-digit multiplier.
            let mut value = u64::from(current as u8 - b'0');
            while let Some(&next) = chars.peek() {
                if !next.is_ascii_digit() {
                    break;
                }
                value = value
                    .saturating_mul(10)
                    .saturating_add(u64::from(next as u8 - b'0'));
                chars.next();
            }
            multiplier = value;
        } else if current.is_ascii_alphabetic() {
            let code = if RESERVED_LETTERS.contains(&current) || current <= max_letter {
                current
            } else {
                match mode {
                    DecodeMode::Lenient => max_letter,
                    DecodeMode::Strict => return Err(DecodeError::InvalidCharacter(current)),
                }
            };
            let total = totals.entry(code).or_insert(0);
            *total = total.saturating_add(multiplier);
        } else {
            return Err(DecodeError::InvalidCharacter(current));
        }
    }

    Ok(totals)
}

/// The ordered letter columns for a table: A..=max_letter excluding the
/// reserved letters, which are appended separately after the optional
/// activity total.
pub fn letter_columns(max_letter: char) -> Vec<char> {
    ('A'..=max_letter)
        .filter(|c| !RESERVED_LETTERS.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(char, u64)]) -> BTreeMap<char, u64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_sanitize_strips_punctuation() {
        assert_eq!(sanitize("3 A, 2B"), "3A2B");
        assert_eq!(sanitize("3a/2b:1s."), "3A2B1S");
        assert_eq!(sanitize("4C\\2d\n"), "4C2D");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_uppercases() {
        assert_eq!(sanitize("3q2p"), "3Q2P");
    }

    #[test]
    fn test_is_invalid_accepts_valid_codes() {
        assert!(!is_invalid("3A9", 'Q'));
        assert!(!is_invalid("3A2B", 'Q'));
        assert!(!is_invalid("12S4P", 'Q'));
        assert!(!is_invalid("", 'Q'));
    }

    #[test]
    fn test_is_invalid_rejects_foreign_characters() {
        assert!(is_invalid("3A!", 'Q'));
        assert!(is_invalid("3A#2B", 'Q'));
        // lowercase never survives sanitize, so it is out of alphabet here
        assert!(is_invalid("3a", 'Q'));
    }

    #[test]
    fn test_is_invalid_rejects_letters_beyond_range() {
        // 'R' is past 'Q' and not reserved
        assert!(is_invalid("3R", 'Q'));
        // but fine when the range is wider
        assert!(!is_invalid("3R", 'R'));
        // reserved letters are valid regardless of the bound
        assert!(!is_invalid("3S2P", 'C'));
    }

    #[test]
    fn test_decode_basic() {
        let decoded = decode("3A2B", 'Q', DecodeMode::Strict).unwrap();
        assert_eq!(decoded, counts(&[('A', 3), ('B', 2)]));
    }

    #[test]
    fn test_decode_multi_digit_multiplier() {
        let decoded = decode("12A", 'Q', DecodeMode::Strict).unwrap();
        assert_eq!(decoded, counts(&[('A', 12)]));

        let decoded = decode("105B3C", 'Q', DecodeMode::Strict).unwrap();
        assert_eq!(decoded, counts(&[('B', 105), ('C', 3)]));
    }

    #[test]
    fn test_decode_bare_letter_contributes_zero() {
        // no preceding multiplier means zero, not omitted
        let decoded = decode("S", 'Q', DecodeMode::Strict).unwrap();
        assert_eq!(decoded, counts(&[('S', 0)]));
    }

    #[test]
    fn test_decode_multiplier_applies_to_following_letters() {
        // the register persists until the next digit run
        let decoded = decode("3AB2C", 'Q', DecodeMode::Strict).unwrap();
        assert_eq!(decoded, counts(&[('A', 3), ('B', 3), ('C', 2)]));
    }

    #[test]
    fn test_decode_accumulates_repeated_letters() {
        let decoded = decode("3A2A", 'Q', DecodeMode::Strict).unwrap();
        assert_eq!(decoded, counts(&[('A', 5)]));
    }

    #[test]
    fn test_decode_reserved_letters_not_clamped() {
        let decoded = decode("3S2P", 'C', DecodeMode::Strict).unwrap();
        assert_eq!(decoded, counts(&[('P', 2), ('S', 3)]));
    }

    #[test]
    fn test_decode_lenient_remaps_beyond_range() {
        // 'R' is past 'Q': folded into the last letter in range
        let decoded = decode("3R2Q", 'Q', DecodeMode::Lenient).unwrap();
        assert_eq!(decoded, counts(&[('Q', 5)]));
    }

    #[test]
    fn test_decode_strict_rejects_beyond_range() {
        let err = decode("3R", 'Q', DecodeMode::Strict).unwrap_err();
        assert_eq!(err, DecodeError::InvalidCharacter('R'));
    }

    #[test]
    fn test_decode_rejects_stray_punctuation() {
        let err = decode("3A!", 'Q', DecodeMode::Lenient).unwrap_err();
        assert_eq!(err, DecodeError::InvalidCharacter('!'));
    }

    #[test]
    fn test_decode_invariant_under_sanitize() {
        let messy = decode(&sanitize("3 A, 2B"), 'Q', DecodeMode::Strict).unwrap();
        let clean = decode("3A2B", 'Q', DecodeMode::Strict).unwrap();
        assert_eq!(messy, clean);
    }

    #[test]
    fn test_decode_never_fails_on_validated_input() {
        for code in [
            "",
            "3A2B",
            "12S",
            "1A2B3C4S5P",
            "9Q",
            "3AB",
            // digit runs past the u64 range still decode (saturating)
            "99999999999999999999A",
        ] {
            assert!(!is_invalid(code, 'Q'));
            assert!(decode(code, 'Q', DecodeMode::Lenient).is_ok());
        }
    }

    #[test]
    fn test_decode_huge_multiplier_saturates() {
        // 20 nines exceeds u64; the multiplier pins at the maximum
        let decoded = decode("99999999999999999999A", 'Q', DecodeMode::Strict).unwrap();
        assert_eq!(decoded, counts(&[('A', u64::MAX)]));
    }

    #[test]
    fn test_decode_letter_total_saturates() {
        // u64::MAX plus one more hour stays pinned instead of wrapping
        let code = format!("{}A1A", u64::MAX);
        let decoded = decode(&code, 'Q', DecodeMode::Strict).unwrap();
        assert_eq!(decoded, counts(&[('A', u64::MAX)]));
    }

    #[test]
    fn test_letter_columns_excludes_reserved() {
        let columns = letter_columns('Q');
        assert_eq!(columns.len(), 16); // A..Q is 17 letters, P removed, S out of range
        assert!(!columns.contains(&'P'));
        assert!(!columns.contains(&'S'));
        assert_eq!(columns.first(), Some(&'A'));
        assert_eq!(columns.last(), Some(&'Q'));
    }

    #[test]
    fn test_letter_columns_wider_range() {
        let columns = letter_columns('R');
        assert!(columns.contains(&'R'));
        assert!(!columns.contains(&'S'));
        assert!(!columns.contains(&'P'));
    }
}
