//! Paste key generation.
//!
//! Keys are slugs, not security tokens: they carry enough entropy to make
//! accidental collision rare, nothing more. Generation never looks at the
//! paste content. Whatever the style, the store insert is conditional on key
//! absence and the create pipeline regenerates on conflict, so a collision
//! can never overwrite an existing paste.

use rand::Rng;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStyle {
    /// Random 128-bit identifier in canonical hyphenated form.
    #[default]
    Uuid,
    /// Random 32-bit value rendered in base 36. Compact, but collides much
    /// sooner; leans on the insert conflict retry.
    Short,
}

pub fn generate_key(style: KeyStyle) -> String {
    match style {
        KeyStyle::Uuid => Uuid::new_v4().to_string(),
        KeyStyle::Short => to_base36(rand::thread_rng().gen()),
    }
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut out = String::new();
    loop {
        out.insert(0, DIGITS[(value % 36) as usize] as char);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_keys_are_canonical() {
        let key = generate_key(KeyStyle::Uuid);
        assert_eq!(key.len(), 36);
        assert!(Uuid::parse_str(&key).is_ok());
    }

    #[test]
    fn short_keys_are_compact_base36() {
        for _ in 0..100 {
            let key = generate_key(KeyStyle::Short);
            assert!(!key.is_empty());
            // u32::MAX in base 36 is 7 digits
            assert!(key.len() <= 7);
            assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn base36_rendering() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(u32::MAX), "1z141z3");
    }
}
