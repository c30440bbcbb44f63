//! Path component and extension extraction for resource links.

/// Returns the path part of a link: everything before the first `?` or `#`.
pub fn link_path(link: &str) -> &str {
    match link.find(|c: char| c == '?' || c == '#') {
        Some(idx) => &link[..idx],
        None => link,
    }
}

/// Splits a path into `(directory + stem, extension)`.
///
/// The extension is taken from the last segment only, includes its leading dot,
/// and is empty for dotfiles (`.hidden`) or a trailing dot (`name.`).
/// Trailing slashes are ignored.
pub fn split_extension(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    let segment_start = trimmed.rfind('/').map(|i| i + 1).unwrap_or(0);
    let segment = &trimmed[segment_start..];
    match segment.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < segment.len() => {
            let split = segment_start + dot;
            (&trimmed[..split], &trimmed[split..])
        }
        _ => (trimmed, ""),
    }
}

/// Lowercased extension without the dot (`"/a/B.PNG"` → `"png"`).
pub fn extension_of(path: &str) -> String {
    let (_, ext) = split_extension(link_path(path));
    ext.trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(link_path("/a/b.css?v=3"), "/a/b.css");
        assert_eq!(link_path("/a/b.js#top"), "/a/b.js");
        assert_eq!(link_path("img.png"), "img.png");
    }

    #[test]
    fn split_normal() {
        assert_eq!(split_extension("/content/file1.css"), ("/content/file1", ".css"));
        assert_eq!(split_extension("lib/jquery.min.js"), ("lib/jquery.min", ".js"));
    }

    #[test]
    fn split_without_extension() {
        assert_eq!(split_extension("/content/file"), ("/content/file", ""));
        assert_eq!(split_extension("/content/.hidden"), ("/content/.hidden", ""));
        assert_eq!(split_extension("/content/name."), ("/content/name.", ""));
        assert_eq!(split_extension("/v1.2/file"), ("/v1.2/file", ""));
    }

    #[test]
    fn split_trailing_slash() {
        assert_eq!(split_extension("/assets/"), ("/assets", ""));
    }

    #[test]
    fn extension_lowercased() {
        assert_eq!(extension_of("/img/Photo.JPEG?x=1"), "jpeg");
        assert_eq!(extension_of("/noext"), "");
    }
}
