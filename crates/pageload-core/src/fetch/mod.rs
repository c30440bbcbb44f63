//! Page and resource retrieval.
//!
//! Transfers run on libcurl in a blocking task; the body is handled as text or
//! as raw bytes depending on the resource's extension, then written verbatim
//! to its destination with `tokio::fs`.

mod http;

pub use http::get;

use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::config::LoaderConfig;
use crate::error::PageLoadError;
use crate::naming;

/// How a response body is handled between the transport and the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Decoded as UTF-8 text.
    Text,
    /// Kept as an opaque byte buffer.
    Binary,
}

impl TransferMode {
    /// Mode for a lowercased extension without the dot. Unknown extensions are binary.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "css" | "js" | "mjs" | "json" | "svg" | "txt" | "html" | "htm" => TransferMode::Text,
            _ => TransferMode::Binary,
        }
    }

    pub fn for_url(url: &Url) -> Self {
        Self::from_extension(&naming::extension_of(url.path()))
    }
}

/// A retrieved response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Binary(Vec<u8>),
}

impl Body {
    /// Applies `mode` to raw response bytes. Text that is not valid UTF-8 is
    /// kept as bytes so the written file still matches the response exactly.
    pub fn decode(bytes: Vec<u8>, mode: TransferMode, url: &str) -> Self {
        match mode {
            TransferMode::Binary => Body::Binary(bytes),
            TransferMode::Text => match String::from_utf8(bytes) {
                Ok(text) => Body::Text(text),
                Err(e) => {
                    tracing::warn!("{} is not valid UTF-8 ({}); keeping raw bytes", url, e.utf8_error());
                    Body::Binary(e.into_bytes())
                }
            },
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(s) => s.as_bytes(),
            Body::Binary(b) => b,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Text(s) => s.into_bytes(),
            Body::Binary(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Transport settings shared by every GET of one page load.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub timeout: Option<Duration>,
    pub max_redirections: u32,
    pub user_agent: Option<String>,
}

impl From<&LoaderConfig> for FetchOptions {
    fn from(cfg: &LoaderConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.timeout(),
            max_redirections: cfg.max_redirections,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&LoaderConfig::default())
    }
}

/// GETs `url` on a blocking thread and decodes the body with `mode`.
pub async fn fetch(url: &Url, mode: TransferMode, opts: &FetchOptions) -> Result<Body, PageLoadError> {
    let bytes = tokio::task::spawn_blocking({
        let url = url.to_string();
        let opts = opts.clone();
        move || get(&url, &opts)
    })
    .await
    .map_err(|e| PageLoadError::TaskJoin {
        url: url.to_string(),
        reason: e.to_string(),
    })??;
    Ok(Body::decode(bytes, mode, url.as_str()))
}

/// Fetches the page markup as the bytes the server sent. The page is never
/// transcoded, so bytes the rewriter leaves alone are saved exactly.
pub async fn fetch_page(url: &Url, opts: &FetchOptions) -> Result<Vec<u8>, PageLoadError> {
    Ok(fetch(url, TransferMode::Binary, opts).await?.into_bytes())
}

/// Fetches one resource and writes it to `dest`, whose parent directory must exist.
/// Returns the number of bytes written.
pub async fn fetch_resource(url: &Url, dest: &Path, opts: &FetchOptions) -> Result<u64, PageLoadError> {
    let mode = TransferMode::for_url(url);
    let body = fetch(url, mode, opts).await?;
    tokio::fs::write(dest, body.as_bytes())
        .await
        .map_err(|e| PageLoadError::filesystem(dest, e))?;
    tracing::debug!("saved {} ({:?}, {} bytes) to {}", url, mode, body.len(), dest.display());
    Ok(body.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(TransferMode::from_extension("css"), TransferMode::Text);
        assert_eq!(TransferMode::from_extension("js"), TransferMode::Text);
        assert_eq!(TransferMode::from_extension("jpeg"), TransferMode::Binary);
        assert_eq!(TransferMode::from_extension("png"), TransferMode::Binary);
    }

    #[test]
    fn unknown_extension_is_binary() {
        assert_eq!(TransferMode::from_extension("woff2"), TransferMode::Binary);
        assert_eq!(TransferMode::from_extension(""), TransferMode::Binary);
    }

    #[test]
    fn mode_for_url_ignores_query_and_case() {
        let u = Url::parse("https://example.com/a/Site.CSS?v=2").unwrap();
        assert_eq!(TransferMode::for_url(&u), TransferMode::Text);
        let u = Url::parse("https://example.com/a/logo.png").unwrap();
        assert_eq!(TransferMode::for_url(&u), TransferMode::Binary);
    }

    #[test]
    fn text_decode_keeps_invalid_utf8_bytes() {
        let raw = vec![b'a', 0xff, b'b'];
        let body = Body::decode(raw.clone(), TransferMode::Text, "https://example.com/x.css");
        assert_eq!(body, Body::Binary(raw.clone()));
        assert_eq!(body.as_bytes(), &raw[..]);

        let body = Body::decode(b"p{}".to_vec(), TransferMode::Text, "https://example.com/x.css");
        assert_eq!(body, Body::Text("p{}".to_string()));
        assert_eq!(body.into_bytes(), b"p{}".to_vec());
    }

    #[test]
    fn options_from_config() {
        let mut cfg = LoaderConfig::default();
        cfg.timeout_secs = Some(7);
        cfg.max_redirections = 2;
        let opts = FetchOptions::from(&cfg);
        assert_eq!(opts.timeout, Some(Duration::from_secs(7)));
        assert_eq!(opts.max_redirections, 2);
        assert_eq!(opts.connect_timeout, Duration::from_secs(30));
    }
}
