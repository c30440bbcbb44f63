//! Blocking HTTP GET over libcurl.

use super::FetchOptions;
use crate::error::{PageLoadError, TransportCause};

/// Performs a GET and returns the full response body.
///
/// Follows redirects up to `opts.max_redirections`. Any non-2xx final status is
/// an error. Runs in the current thread; call from `spawn_blocking` if used
/// from async code.
pub fn get(url: &str, opts: &FetchOptions) -> Result<Vec<u8>, PageLoadError> {
    let (code, body) =
        perform(url, opts).map_err(|e| PageLoadError::transport(url, TransportCause::Curl(e)))?;
    if !(200..300).contains(&code) {
        return Err(PageLoadError::transport(url, TransportCause::Status(code)));
    }
    tracing::debug!("GET {} -> HTTP {} ({} bytes)", url, code, body.len());
    Ok(body)
}

fn perform(url: &str, opts: &FetchOptions) -> Result<(u32, Vec<u8>), curl::Error> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirections)?;
    easy.connect_timeout(opts.connect_timeout)?;
    if let Some(timeout) = opts.timeout {
        easy.timeout(timeout)?;
    }
    if let Some(agent) = &opts.user_agent {
        easy.useragent(agent)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    Ok((code, body))
}
