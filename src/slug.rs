//! URL-safe slug derivation from display titles.

/// Lowercases, keeps alphanumerics, and collapses every other run of
/// characters into a single hyphen. `"Apple Watch  SE!"` -> `"apple-watch-se"`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Apple Watch SE"), "apple-watch-se");
        assert_eq!(slugify("  Mixed   CASE  "), "mixed-case");
    }

    #[test]
    fn strips_url_unsafe_characters() {
        assert_eq!(slugify("50% off! (today)"), "50-off-today");
        assert_eq!(slugify("---"), "");
    }
}
