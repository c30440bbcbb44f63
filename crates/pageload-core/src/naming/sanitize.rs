//! Linux-safe file name sanitization for derived names.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Replaces characters that are unsafe on disk or inside a relative href (NUL,
/// control characters, whitespace, `\`, `%` and `:`) with `_`, then truncates the
/// stem so that `stem + suffix` fits in NAME_MAX bytes. The suffix is kept intact.
///
/// `:` would make the first segment of a relative href parse as a URL scheme
/// and `%` would be percent-decoded by the browser.
pub fn sanitize_stem(stem: &str, suffix: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c == '\0' || c == '\\' || c == '%' || c == ':' || c.is_control() || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let budget = NAME_MAX.saturating_sub(suffix.len()).max(1);
    if cleaned.len() <= budget {
        return cleaned;
    }
    let mut take = budget;
    while take > 0 && !cleaned.is_char_boundary(take) {
        take -= 1;
    }
    cleaned[..take].to_string()
}
