/// Turn a display name into a URL slug.
///
/// Lower-cases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, and strips leading and trailing separators. Already-valid
/// slugs come back unchanged.
pub fn derive_slug(name: &str) -> String {
    name.to_lowercase()
        .split(|ch: char| !matches!(ch, 'a'..='z' | '0'..='9'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
