/// Derives an anchor identifier from heading text.
///
/// Lower-cases the text, drops everything except ASCII word characters, whitespace
/// and hyphens, turns whitespace runs into single hyphens, collapses repeated
/// hyphens and trims hyphens from both ends. Applying it to its own output returns
/// the same string.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        }
    }

    slug
}
