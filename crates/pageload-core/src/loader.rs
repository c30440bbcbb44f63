//! Page load orchestration.
//!
//! Phases run strictly in order: fetch page, rewrite markup, write the page
//! file, create the resource directory. Then every resource download is
//! started at once and all of them are awaited before the outcome is
//! reported. A failing resource does not stop the others, and files that were
//! written are left in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::task::{self, JoinSet};
use url::Url;

use crate::config::LoaderConfig;
use crate::error::{PageLoadError, ResourceFailure};
use crate::fetch::{self, FetchOptions};
use crate::markup::{self, ResourceReference};
use crate::naming;

/// A resource that was downloaded and written.
#[derive(Debug, Clone)]
pub struct ResourceOutcome {
    pub url: Url,
    pub path: PathBuf,
    pub bytes: u64,
}

/// What a successful page load produced.
#[derive(Debug, Clone)]
pub struct PageLoadReport {
    pub page_file: PathBuf,
    pub resource_dir: PathBuf,
    /// One entry per resource, in document order.
    pub resources: Vec<ResourceOutcome>,
}

/// Downloads `page_url` and its local resources into `target_dir`.
///
/// Writes `<target>/<pageFileName>` and `<target>/<resourceDirName>/<fileName>`
/// for each local resource. Re-running with the same URL overwrites the
/// previous output.
pub async fn load_page(
    page_url: &str,
    target_dir: &Path,
    cfg: &LoaderConfig,
) -> Result<PageLoadReport, PageLoadError> {
    let url = parse_page_url(page_url)?;
    let opts = FetchOptions::from(cfg);

    let page_file = target_dir.join(naming::page_file_name(&url));
    let resource_dir = target_dir.join(naming::resource_dir_name(&url));

    tracing::info!("loading {} into {}", url, target_dir.display());
    let markup = fetch::fetch_page(&url, &opts).await?;

    let rewritten = markup::rewrite(&markup, &url, cfg.collision_policy)?;
    tracing::debug!("{} local resources in {}", rewritten.references.len(), url);

    tokio::fs::write(&page_file, &rewritten.html)
        .await
        .map_err(|e| PageLoadError::filesystem(&page_file, e))?;
    tracing::info!("page saved to {}", page_file.display());

    create_resource_dir(&resource_dir).await?;

    let resources = download_all(rewritten.references, target_dir, &opts).await?;

    tracing::info!("loaded {} with {} resources", url, resources.len());
    Ok(PageLoadReport {
        page_file,
        resource_dir,
        resources,
    })
}

fn parse_page_url(page_url: &str) -> Result<Url, PageLoadError> {
    let url = Url::parse(page_url).map_err(|e| PageLoadError::InvalidUrl {
        url: page_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.host_str().is_none() {
        return Err(PageLoadError::InvalidUrl {
            url: page_url.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    Ok(url)
}

/// Creates the resource directory. A directory left by an earlier run is reused.
async fn create_resource_dir(dir: &Path) -> Result<(), PageLoadError> {
    let err = match tokio::fs::create_dir(dir).await {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    if err.kind() == std::io::ErrorKind::AlreadyExists {
        let is_dir = tokio::fs::metadata(dir).await.is_ok_and(|m| m.is_dir());
        if is_dir {
            tracing::debug!("reusing existing {}", dir.display());
            return Ok(());
        }
    }
    Err(PageLoadError::filesystem(dir, err))
}

/// Starts one task per reference, waits for all of them, then aggregates.
async fn download_all(
    references: Vec<ResourceReference>,
    target_dir: &Path,
    opts: &FetchOptions,
) -> Result<Vec<ResourceOutcome>, PageLoadError> {
    let mut join_set = JoinSet::new();
    let mut pending = HashMap::with_capacity(references.len());

    for (index, reference) in references.into_iter().enumerate() {
        let url = reference.resolved_url;
        let path = target_dir.join(&reference.local_path);
        let handle = join_set.spawn({
            let url = url.clone();
            let path = path.clone();
            let opts = opts.clone();
            async move { fetch::fetch_resource(&url, &path, &opts).await }
        });
        pending.insert(handle.id(), PendingResource { index, url, path });
    }

    collect_downloads(join_set, pending).await
}

/// A spawned download, keyed by its task id until it finishes.
struct PendingResource {
    index: usize,
    url: Url,
    path: PathBuf,
}

/// Joins every task in `join_set`. Failures, including tasks that panicked or
/// were cancelled, are reported together in document order.
async fn collect_downloads(
    mut join_set: JoinSet<Result<u64, PageLoadError>>,
    mut pending: HashMap<task::Id, PendingResource>,
) -> Result<Vec<ResourceOutcome>, PageLoadError> {
    let total = pending.len();
    let mut done: Vec<(usize, ResourceOutcome)> = Vec::with_capacity(total);
    let mut failed: Vec<(usize, ResourceFailure)> = Vec::new();

    while let Some(joined) = join_set.join_next_with_id().await {
        let (id, res) = match joined {
            Ok((id, res)) => (id, Ok(res)),
            Err(e) => (e.id(), Err(e)),
        };
        let Some(PendingResource { index, url, path }) = pending.remove(&id) else {
            tracing::warn!("finished task {} was not tracked", id);
            continue;
        };
        let error = match res {
            Ok(Ok(bytes)) => {
                done.push((index, ResourceOutcome { url, path, bytes }));
                continue;
            }
            Ok(Err(error)) => error,
            Err(join_err) => PageLoadError::TaskJoin {
                url: url.to_string(),
                reason: join_err.to_string(),
            },
        };
        tracing::warn!("resource {} failed: {}", url, error);
        failed.push((
            index,
            ResourceFailure {
                url: url.to_string(),
                path,
                error,
            },
        ));
    }

    if !failed.is_empty() {
        failed.sort_by_key(|(i, _)| *i);
        return Err(PageLoadError::ResourcesFailed {
            failed: failed.into_iter().map(|(_, f)| f).collect(),
            total,
        });
    }

    done.sort_by_key(|(i, _)| *i);
    Ok(done.into_iter().map(|(_, o)| o).collect())
}
