//! Folder reference resolution and the process-wide access cache.
//! 資料夾參照解析與整個行程共用的存取快取。
//!
//! A persisted [`FolderReference`](foldermenu_config::FolderReference) only
//! carries a candidate path. Listing the folder requires a live
//! [`DirectoryHandle`], obtained by beginning scoped access through the
//! [`AccessResolver`] and ended by an explicit, idempotent release.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use foldermenu_config::{ConfigId, MenuConfiguration, ReferenceError};

/// Resolution failures. Both variants mean the folder cannot be shown and
/// carry the same remediation for the user: re-grant access or re-pick the
/// folder. Distinct from a snapshot-time listing failure, where the handle
/// itself is still valid.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("folder reference can no longer be read: {0}")]
    StaleReference(#[from] ReferenceError),
    #[error("folder is not accessible: {}", path.display())]
    PermissionDenied { path: PathBuf },
}

/// A live, access-granted directory. Cheap to clone; cloning does not extend
/// or duplicate the underlying grant, which stays owned by the resolver.
/// 已取得存取權的目錄握柄；複製成本低，權限本身仍由解析器持有。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryHandle {
    path: PathBuf,
}

impl DirectoryHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Derives a handle for a subdirectory inside the granted scope. The
    /// grant covers the whole subtree, so submenu listings reuse the root
    /// grant rather than resolving again.
    /// 取得範圍內子目錄的握柄；授權涵蓋整個子樹，子選單無需重新解析。
    pub fn child(&self, path: impl Into<PathBuf>) -> DirectoryHandle {
        DirectoryHandle { path: path.into() }
    }
}

/// Resolves configurations to live directory handles, caching at most one
/// open access per configuration identity for the life of the process.
/// 將設定解析為目錄握柄；同一設定同時間最多只保留一份已開啟的存取。
#[derive(Debug, Default)]
pub struct AccessResolver {
    cache: HashMap<ConfigId, DirectoryHandle>,
}

impl AccessResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached handle for the configuration, or decodes its
    /// folder reference and begins scoped access on a miss.
    pub fn resolve(
        &mut self,
        configuration: &MenuConfiguration,
    ) -> Result<DirectoryHandle, AccessError> {
        if let Some(handle) = self.cache.get(&configuration.id) {
            log::debug!("access cache hit for {}", configuration.id);
            return Ok(handle.clone());
        }

        let candidate = configuration.folder.candidate_path()?;
        let handle = begin_scoped_access(candidate)?;
        log::debug!(
            "began scoped access for {} at {}",
            configuration.id,
            handle.path().display()
        );
        self.cache.insert(configuration.id.clone(), handle.clone());
        Ok(handle)
    }

    /// Ends access for the configuration. Idempotent: releasing an already
    /// released or never resolved configuration is a no-op.
    /// 結束指定設定的存取；重複釋放或釋放未解析過的設定皆為無動作。
    pub fn release(&mut self, id: &ConfigId) {
        if let Some(handle) = self.cache.remove(id) {
            end_scoped_access(&handle);
            log::debug!("released scoped access for {id}");
        }
    }

    /// Ends every open access. Called once at process shutdown; also runs on
    /// drop so an owning scope cannot leak grants.
    pub fn release_all(&mut self) {
        for (id, handle) in self.cache.drain() {
            end_scoped_access(&handle);
            log::debug!("released scoped access for {id}");
        }
    }

    /// Number of currently open accesses.
    pub fn open_count(&self) -> usize {
        self.cache.len()
    }

    pub fn is_open(&self, id: &ConfigId) -> bool {
        self.cache.contains_key(id)
    }
}

impl Drop for AccessResolver {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Begins scoped access to the candidate directory: the target must exist,
/// be a directory, and be listable by the current user.
fn begin_scoped_access(path: PathBuf) -> Result<DirectoryHandle, AccessError> {
    let metadata = fs::metadata(&path).map_err(|_| AccessError::PermissionDenied {
        path: path.clone(),
    })?;
    if !metadata.is_dir() {
        return Err(AccessError::PermissionDenied { path });
    }
    fs::read_dir(&path).map_err(|_| AccessError::PermissionDenied {
        path: path.clone(),
    })?;
    Ok(DirectoryHandle { path })
}

fn end_scoped_access(handle: &DirectoryHandle) {
    // The grant itself has no OS-visible teardown here; dropping the cache
    // entry is what ends the access lifetime.
    log::trace!("scoped access ended for {}", handle.path().display());
}
