use unicode_normalization::UnicodeNormalization as _;

/// Normalize a city name into the identifier used to address its commute dataset.
///
/// Lower-cases, replaces spaces and slashes with hyphens, then strips accents by decomposing
/// (NFKD) and dropping everything outside ASCII.
pub fn city_slug(name: &str) -> String {
    name.to_lowercase()
        .replace([' ', '/'], "-")
        .nfkd()
        .filter(char::is_ascii)
        .collect()
}
