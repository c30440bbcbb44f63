//! Local vs remote classification of resource links.
//!
//! A link is local when it carries no host: a path-relative (`img/a.png`) or
//! origin-relative (`/css/site.css`) reference. Everything that names a host,
//! including the page's own host and protocol-relative `//cdn/...` links, is
//! remote and left untouched. Scheme-only references such as `data:` or
//! `javascript:` have no host either, but nothing can be fetched for them, so
//! they are not local.

use url::{ParseError, Url};

/// Returns true if `link` should be localized.
pub fn is_local(link: &str) -> bool {
    let link = link.trim();
    if link.is_empty() || link.starts_with("//") || link.starts_with('#') {
        return false;
    }
    matches!(Url::parse(link), Err(ParseError::RelativeUrlWithoutBase))
}

/// Classifies an optional attribute value; absent or blank values are skipped.
pub fn local_link(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| is_local(v))
}
