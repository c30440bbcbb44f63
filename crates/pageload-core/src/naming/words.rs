//! Word segmentation for derived names.

/// Stem used when an input contains no word segments at all (e.g. link `/`).
pub const FALLBACK_STEM: &str = "index";

/// Splits `input` into the non-empty runs of characters between `.` and `/`.
pub fn words(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == '.' || c == '/')
        .filter(|s| !s.is_empty())
}

/// Joins the words of `input` with `-`. Returns [`FALLBACK_STEM`] when there are none.
pub fn hyphenate(input: &str) -> String {
    let joined = words(input).collect::<Vec<_>>().join("-");
    if joined.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_dots_and_slashes() {
        let w: Vec<_> = words("hexlet.io//courses").collect();
        assert_eq!(w, ["hexlet", "io", "courses"]);
    }

    #[test]
    fn hyphenate_drops_empty_runs() {
        assert_eq!(hyphenate("/content/file1"), "content-file1");
        assert_eq!(hyphenate("example.com/"), "example-com");
        assert_eq!(hyphenate("a..b//c."), "a-b-c");
    }

    #[test]
    fn hyphenate_keeps_other_punctuation() {
        assert_eq!(hyphenate("localhost:8080/a_b-c"), "localhost:8080-a_b-c");
    }

    #[test]
    fn hyphenate_empty_falls_back() {
        assert_eq!(hyphenate(""), "index");
        assert_eq!(hyphenate("/./"), "index");
    }
}
