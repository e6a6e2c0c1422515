//! URL slugs derived from article titles.

#[cfg(test)]
#[path = "slug_test.rs"]
mod slug_test;

/// Lowercase, hyphen-joined form of `title`.
///
/// Words are split on whitespace; within a word only ASCII alphanumerics and
/// `-` survive. Words that end up empty are skipped.
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
