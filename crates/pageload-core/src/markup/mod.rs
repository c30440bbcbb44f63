//! Markup rewriting: localize same-origin resource references.
//!
//! The page is streamed through `lol_html`, which tokenizes it the way a
//! browser does (comments, raw-text elements, malformed tags) and matches
//! `<link href>`, `<script src>` and `<img src>` in document order. Each local
//! reference is resolved against the page URL, given a file name inside the
//! resource directory, and its attribute is set to
//! `<resourceDirName>/<fileName>`. Everything outside the rewritten start tags
//! is passed through as the original bytes, whatever the page's encoding.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use lol_html::{element, HtmlRewriter, Settings};
use scraper::{ElementRef, Html};
use url::Url;

use crate::classify;
use crate::config::CollisionPolicy;
use crate::error::PageLoadError;
use crate::naming;

/// Element kinds that carry a downloadable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Link,
    Script,
    Image,
}

impl ElementKind {
    const ALL: [ElementKind; 3] = [ElementKind::Link, ElementKind::Script, ElementKind::Image];

    fn selector(self) -> &'static str {
        match self {
            ElementKind::Link => "link[href]",
            ElementKind::Script => "script[src]",
            ElementKind::Image => "img[src]",
        }
    }

    /// Attribute holding the resource URL.
    pub fn attribute(self) -> &'static str {
        match self {
            ElementKind::Link => "href",
            ElementKind::Script | ElementKind::Image => "src",
        }
    }
}

/// A local resource found in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    /// Attribute value as written in the markup (entity-decoded, trimmed).
    pub original_link: String,
    /// `original_link` resolved against the page URL.
    pub resolved_url: Url,
    /// File name inside the resource directory.
    pub file_name: String,
    /// `<resourceDirName>/<fileName>`, relative to the target directory.
    pub local_path: PathBuf,
    /// Element of the first occurrence.
    pub element: ElementKind,
}

/// Output of [`rewrite`].
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub html: Vec<u8>,
    pub references: Vec<ResourceReference>,
}

/// Rewrites local resource references in `markup`.
///
/// A link that appears several times yields one reference; every occurrence is
/// rewritten to the same path. Distinct URLs whose derived names clash are
/// renamed or rejected according to `policy`.
pub fn rewrite(
    markup: &[u8],
    page_url: &Url,
    policy: CollisionPolicy,
) -> Result<Rewritten, PageLoadError> {
    let collector = RefCell::new(Collector::new(page_url, policy));
    let mut html = Vec::with_capacity(markup.len());

    let streamed = {
        let collector = &collector;
        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: ElementKind::ALL
                    .iter()
                    .map(|&kind| {
                        element!(kind.selector(), move |el| {
                            let Some(raw) = el.get_attribute(kind.attribute()) else {
                                return Ok(());
                            };
                            let local = collector.borrow_mut().localize(&raw, kind);
                            if let Some(href) = local {
                                el.set_attribute(kind.attribute(), &href)?;
                            }
                            Ok(())
                        })
                    })
                    .collect(),
                strict: false,
                ..Settings::default()
            },
            |chunk: &[u8]| html.extend_from_slice(chunk),
        );
        match rewriter.write(markup) {
            Ok(()) => rewriter.end(),
            Err(e) => Err(e),
        }
    };

    let collector = collector.into_inner();
    if let Some(err) = collector.error {
        return Err(err);
    }
    streamed.map_err(|e| PageLoadError::Markup {
        url: page_url.to_string(),
        reason: e.to_string(),
    })?;

    Ok(Rewritten {
        html,
        references: collector.references,
    })
}

/// Decodes character references in an attribute value using the HTML5
/// attribute-value rules, including legacy references without a `;`.
pub fn decode_attr(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let fragment = Html::parse_fragment(&format!(
        "<a data-value=\"{}\"></a>",
        raw.replace('"', "&quot;")
    ));
    fragment
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find_map(|el| el.value().attr("data-value").map(str::to_string))
        .unwrap_or_else(|| raw.to_string())
}

/// Reference bookkeeping shared by the element handlers of one rewrite.
struct Collector<'a> {
    page_url: &'a Url,
    dir_name: String,
    policy: CollisionPolicy,
    references: Vec<ResourceReference>,
    by_url: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    error: Option<PageLoadError>,
}

impl<'a> Collector<'a> {
    fn new(page_url: &'a Url, policy: CollisionPolicy) -> Self {
        Self {
            page_url,
            dir_name: naming::resource_dir_name(page_url),
            policy,
            references: Vec::new(),
            by_url: HashMap::new(),
            by_name: HashMap::new(),
            error: None,
        }
    }

    /// Returns the new attribute value if `raw` is a local link.
    /// Nothing more is rewritten once a collision error is recorded.
    fn localize(&mut self, raw: &str, element: ElementKind) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        let decoded = decode_attr(raw);
        let link = classify::local_link(Some(decoded.as_str()))?;
        let resolved = match self.page_url.join(link) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!("skipping unresolvable link '{}': {}", link, e);
                return None;
            }
        };

        let index = match self.by_url.get(resolved.as_str()) {
            Some(&i) => i,
            None => match self.assign_name(link, &resolved) {
                Ok(file_name) => {
                    let i = self.references.len();
                    self.by_url.insert(resolved.as_str().to_string(), i);
                    self.by_name.insert(file_name.clone(), i);
                    self.references.push(ResourceReference {
                        original_link: link.to_string(),
                        local_path: PathBuf::from(&self.dir_name).join(&file_name),
                        resolved_url: resolved,
                        file_name,
                        element,
                    });
                    i
                }
                Err(e) => {
                    self.error = Some(e);
                    return None;
                }
            },
        };

        let href = format!("{}/{}", self.dir_name, self.references[index].file_name);
        tracing::debug!("rewrite {} -> {}", link, href);
        Some(href)
    }

    /// Picks a free file name for a new resource, applying the collision policy.
    fn assign_name(&self, link: &str, resolved: &Url) -> Result<String, PageLoadError> {
        let base = naming::resource_file_name(link);
        let Some(&owner) = self.by_name.get(&base) else {
            return Ok(base);
        };

        if self.policy == CollisionPolicy::Fail {
            return Err(PageLoadError::NamingCollision {
                path: PathBuf::from(&self.dir_name).join(&base),
                first: self.references[owner].resolved_url.to_string(),
                second: resolved.to_string(),
            });
        }

        let mut n = 1usize;
        loop {
            let candidate = naming::indexed_name(&base, n);
            if !self.by_name.contains_key(&candidate) {
                tracing::warn!(
                    "local name '{}' already used by {}; saving {} as '{}'",
                    base,
                    self.references[owner].resolved_url,
                    resolved,
                    candidate
                );
                return Ok(candidate);
            }
            n += 1;
        }
    }
}
