// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of public group references to bare usernames.

/// What a generic reference addresses on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A public username, without `@` or link prefix.
    Username(String),
    /// A numeric peer id.
    Id(i64),
}

/// Maps `https://t.me/name`, `t.me/name`, `@name`, `name` or a numeric id to a [`Lookup`].
///
/// Private invite links (`+hash`, `joinchat/hash`) and empty references
/// yield `None`; they are not resolvable by username.
pub fn lookup_for(reference: &str) -> Option<Lookup> {
    let trimmed = reference.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(Lookup::Id(id));
    }

    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let path = without_scheme
        .strip_prefix("t.me/")
        .or_else(|| without_scheme.strip_prefix("telegram.me/"))
        .unwrap_or(without_scheme);

    if path.starts_with('+') || path.starts_with("joinchat/") {
        return None;
    }

    let name = path
        .trim_start_matches('@')
        .split(['/', '?'])
        .next()
        .unwrap_or_default();

    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| Lookup::Username(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_forms_normalize_to_the_username() {
        for reference in [
            "https://t.me/rustlang",
            "http://telegram.me/rustlang/",
            "t.me/rustlang?start=1",
            "@rustlang",
            " rustlang ",
        ] {
            assert_eq!(
                lookup_for(reference),
                Some(Lookup::Username("rustlang".to_string())),
                "{reference:?}"
            );
        }
    }

    #[test]
    fn numeric_references_are_ids() {
        assert_eq!(lookup_for("-1001234567890"), Some(Lookup::Id(-1001234567890)));
        assert_eq!(lookup_for("42"), Some(Lookup::Id(42)));
    }

    #[test]
    fn private_and_malformed_references_have_no_username() {
        assert_eq!(lookup_for("https://t.me/+AbC123"), None);
        assert_eq!(lookup_for("t.me/joinchat/AbC123"), None);
        assert_eq!(lookup_for(""), None);
        assert_eq!(lookup_for("not a group"), None);
    }
}
