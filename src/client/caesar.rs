//! Caesar shift cipher and brute-force key candidates.
//!
//! ASCII letters rotate within their case over 26 positions and ASCII digits over 10. Every other
//! character, including `ñ` and accented vowels, passes through unchanged.

use super::ranking::Candidate;

/// Number of distinct letter keys.
pub const KEY_SPACE: i32 = 26;

const DIGIT_SPACE: i32 = 10;

fn rotate(c: char, base: u8, span: i32, shift: i32) -> char {
    let offset = (c as u8 - base) as i32;
    let rotated = (offset + shift).rem_euclid(span);
    (base + rotated as u8) as char
}

fn shift_char(c: char, key: i32) -> char {
    match c {
        'a'..='z' => rotate(c, b'a', KEY_SPACE, key),
        'A'..='Z' => rotate(c, b'A', KEY_SPACE, key),
        '0'..='9' => rotate(c, b'0', DIGIT_SPACE, key),
        _ => c,
    }
}

/// Shifts `text` forward by `key`. Negative keys shift backward.
pub fn encode(text: &str, key: i32) -> String {
    text.chars().map(|c| shift_char(c, key)).collect()
}

/// Inverse of [`encode`] for the same key, digits included.
pub fn decode(text: &str, key: i32) -> String {
    text.chars()
        .map(|c| shift_char(c, key.wrapping_neg()))
        .collect()
}

/// Decrypts `ciphertext` under every letter key, identified as `key N`.
///
/// The result feeds [`EvaluationClient::rank`](super::EvaluationClient::rank); the best ranked
/// candidate names the most likely key.
pub fn shift_candidates(ciphertext: &str) -> Vec<Candidate> {
    (0..KEY_SPACE)
        .map(|key| Candidate::new(format!("key {key}"), decode(ciphertext, key)))
        .collect()
}
