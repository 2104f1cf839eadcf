// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display masking for stored passwords.

/// Values shorter than this are masked completely.
const MIN_PARTIAL_LEN: usize = 12;

/// Mask a secret for listings: "hu...42" format.
///
/// Long values keep their first and last two characters; anything shorter
/// than 12 characters (including the empty string) becomes "****".
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < MIN_PARTIAL_LEN {
        return "****".to_string();
    }
    let prefix: String = chars[..2].iter().collect();
    let suffix: String = chars[chars.len() - 2..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("hunter2-correct-horse"), "hu...se");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("hunter2"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn mask_secret_counts_characters_not_bytes() {
        assert_eq!(mask_secret("密码密码密码密码密码密码"), "密码...密码");
    }
}
