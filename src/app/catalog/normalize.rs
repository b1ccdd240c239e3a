//! Display-text normalization
//!
//! The upstream catalog sometimes delivers titles and author names with
//! literal `\uXXXX` escapes instead of the characters themselves.

use std::fmt::Debug;

/// Pure string transform applied to display text at read time
pub trait TextNormalizer: Send + Sync + Debug {
    /// Return the human-readable form of `raw`
    fn normalize(&self, raw: &str) -> String;
}

/// Decodes `\uXXXX` escape sequences
///
/// Surrogate pairs written as two consecutive escapes are combined. Malformed
/// or unpaired escapes are left as they appear in the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeEscapes;

impl UnicodeEscapes {
    fn parse_escape(input: &[char], at: usize) -> Option<u32> {
        if input.get(at) != Some(&'\\') || input.get(at + 1) != Some(&'u') {
            return None;
        }
        let digits: String = input.get(at + 2..at + 6)?.iter().collect();
        u32::from_str_radix(&digits, 16).ok()
    }
}

impl TextNormalizer for UnicodeEscapes {
    fn normalize(&self, raw: &str) -> String {
        if !raw.contains("\\u") {
            return raw.to_string();
        }

        let chars: Vec<char> = raw.chars().collect();
        let mut out = String::with_capacity(raw.len());
        let mut i = 0;

        while i < chars.len() {
            let Some(unit) = Self::parse_escape(&chars, i) else {
                out.push(chars[i]);
                i += 1;
                continue;
            };

            // High surrogate followed by a low surrogate
            if (0xD800..0xDC00).contains(&unit) {
                if let Some(low) = Self::parse_escape(&chars, i + 6) {
                    if (0xDC00..0xE000).contains(&low) {
                        let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        if let Some(c) = char::from_u32(code) {
                            out.push(c);
                            i += 12;
                            continue;
                        }
                    }
                }
            }

            match char::from_u32(unit) {
                Some(c) => out.push(c),
                None => out.extend(&chars[i..i + 6]),
            }
            i += 6;
        }

        out
    }
}

/// Returns text unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl TextNormalizer for Identity {
    fn normalize(&self, raw: &str) -> String {
        raw.to_string()
    }
}
