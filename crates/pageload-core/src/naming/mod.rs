//! Local file and directory names derived from URLs.
//!
//! Names are a pure function of their input: the page URL's host and path for
//! the page file and resource directory, the link's path for a resource file.
//! Words are split on `.` and `/` and joined with `-`; resource files keep
//! their original extension.
//!
//! # Examples
//!
//! - `page_file_name("https://hexlet.io/courses")` → `"hexlet-io-courses.html"`
//! - `resource_dir_name("https://hexlet.io/courses")` → `"hexlet-io-courses_files"`
//! - `resource_file_name("/content/file1.css")` → `"content-file1.css"`

mod path;
mod sanitize;
mod words;

pub use path::{extension_of, link_path, split_extension};
pub use sanitize::sanitize_stem;
pub use words::{hyphenate, words, FALLBACK_STEM};

use url::Url;

pub const PAGE_FILE_SUFFIX: &str = ".html";
pub const RESOURCE_DIR_SUFFIX: &str = "_files";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    PageFile,
    ResourceDir,
    ResourceFile,
}

/// Derives a name of the given kind.
///
/// `PageFile` and `ResourceDir` expect a URL; input that does not parse as one
/// is segmented as-is. `ResourceFile` expects a link or path.
pub fn derive_name(input: &str, kind: NameKind) -> String {
    match kind {
        NameKind::PageFile | NameKind::ResourceDir => {
            let base = match Url::parse(input) {
                Ok(url) => host_and_path(&url),
                Err(_) => input.to_string(),
            };
            let suffix = if kind == NameKind::PageFile {
                PAGE_FILE_SUFFIX
            } else {
                RESOURCE_DIR_SUFFIX
            };
            finish(&hyphenate(&base), suffix)
        }
        NameKind::ResourceFile => resource_file_name(input),
    }
}

pub fn page_file_name(url: &Url) -> String {
    finish(&hyphenate(&host_and_path(url)), PAGE_FILE_SUFFIX)
}

pub fn resource_dir_name(url: &Url) -> String {
    finish(&hyphenate(&host_and_path(url)), RESOURCE_DIR_SUFFIX)
}

/// File name for a resource link: hyphenated directory + stem, original extension.
pub fn resource_file_name(link: &str) -> String {
    let (stem, ext) = split_extension(link_path(link));
    finish(&hyphenate(stem), ext)
}

/// Inserts `-{index}` between the stem and extension of an already derived name.
pub fn indexed_name(name: &str, index: usize) -> String {
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    let tag = format!("-{}", index);
    let mut suffix = String::with_capacity(tag.len() + ext.len());
    suffix.push_str(&tag);
    suffix.push_str(ext);
    finish(stem, &suffix)
}

/// Host (with explicit port, if any) followed by the path; query and fragment excluded.
fn host_and_path(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}/{}", host, port, url.path()),
        None => format!("{}/{}", host, url.path()),
    }
}

fn finish(stem: &str, suffix: &str) -> String {
    let mut name = sanitize_stem(stem, suffix);
    name.push_str(suffix);
    name
}
