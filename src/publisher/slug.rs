/// Maximum length of the title-derived part of a slug.
pub const SLUG_MAX_LEN: usize = 60;

/// Substituted when a title sanitizes to nothing.
pub const FALLBACK_SLUG: &str = "story";

/// URL-safe slug base derived from a title.
///
/// Keeps ASCII letters, digits, spaces and hyphens; lowercases; turns each
/// run of spaces into one hyphen; truncates to [`SLUG_MAX_LEN`].
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect();

    let slug = kept
        .trim()
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    let slug: String = slug.chars().take(SLUG_MAX_LEN).collect();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
