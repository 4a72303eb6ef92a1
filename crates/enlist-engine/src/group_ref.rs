// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of user-supplied group references.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Private invite links: `t.me/+HASH`, `t.me/joinchat/HASH`, and the `telegram.me` forms.
static PRIVATE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:t\.me/|telegram\.me/)(?:\+|joinchat/)([\w-]+)")
        .expect("private link pattern is valid")
});

/// A group reference as typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    /// A private invite link; `raw` is the trimmed original text.
    PrivateInvite { hash: String, raw: String },
    /// An already-resolved numeric peer id.
    Numeric(i64),
    /// A public handle or public link, kept verbatim.
    Public(String),
}

impl GroupRef {
    /// Parses a reference. Private links take precedence over every other form.
    pub fn parse(input: &str) -> Self {
        let raw = input.trim();
        if let Some(hash) = invite_hash(raw) {
            return Self::PrivateInvite {
                hash: hash.to_string(),
                raw: raw.to_string(),
            };
        }
        match raw.parse::<i64>() {
            Ok(id) => Self::Numeric(id),
            Err(_) => Self::Public(raw.to_string()),
        }
    }

    /// The text handed to generic resolution.
    pub fn raw(&self) -> String {
        match self {
            Self::PrivateInvite { raw, .. } => raw.clone(),
            Self::Numeric(id) => id.to_string(),
            Self::Public(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

/// Extracts the invite hash from a private link, if `link` is one.
pub fn invite_hash(link: &str) -> Option<&str> {
    PRIVATE_LINK
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_check_table() {
        let cases = [
            ("https://t.me/+Q1hgZoM529Y5MjVl", Some("Q1hgZoM529Y5MjVl")),
            ("https://t.me/joinchat/ABCDE12345", Some("ABCDE12345")),
            ("http://telegram.me/+XYZ", Some("XYZ")),
            ("https://t.me/publicgroup", None),
            ("just_a_username", None),
        ];
        for (link, expected) in cases {
            assert_eq!(invite_hash(link), expected, "link {link}");
        }
    }

    #[test]
    fn parse_private_link_keeps_raw() {
        let parsed = GroupRef::parse("  https://t.me/+abc-DEF_1  ");
        assert_eq!(
            parsed,
            GroupRef::PrivateInvite {
                hash: "abc-DEF_1".into(),
                raw: "https://t.me/+abc-DEF_1".into(),
            }
        );
        assert_eq!(parsed.raw(), "https://t.me/+abc-DEF_1");
    }

    #[test]
    fn parse_numeric_and_public() {
        assert_eq!(GroupRef::parse("-1001234567890"), GroupRef::Numeric(-1001234567890));
        assert_eq!(
            GroupRef::parse("https://t.me/sourcegroup"),
            GroupRef::Public("https://t.me/sourcegroup".into())
        );
        assert_eq!(GroupRef::parse("@handle").to_string(), "@handle");
    }
}
