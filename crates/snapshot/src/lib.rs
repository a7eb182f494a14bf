//! Directory snapshotting: one level of children with per-entry metadata,
//! freemium truncation, and display sorting.
//! 目錄快照：讀取單層子項目與中繼資料，套用免費版截斷與顯示排序。

mod collate;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use foldermenu_access::DirectoryHandle;
use foldermenu_config::IconFidelity;

pub use collate::compare_names;

/// Entry cap applied when full features have not been purchased.
pub const FREE_TIER_ENTRY_LIMIT: usize = 10;

/// Directory extensions treated as packages: shown as leaves, never drilled
/// into, matching how the file browser presents them.
const BUNDLE_EXTENSIONS: &[&str] = &[
    "app",
    "appex",
    "bundle",
    "framework",
    "kext",
    "plugin",
    "prefpane",
    "qlgenerator",
    "xpc",
];

/// Listing failures at snapshot time. The handle itself may still be valid;
/// a readable root can contain an unreadable sub-level.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("folder contents are unreadable: {}", path.display())]
    Unreadable { path: PathBuf },
}

/// Reference to the icon a row should display; resolving it to pixels is the
/// host's concern.
/// 列所顯示圖示的參照；實際載入圖片由宿主負責。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    /// High-fidelity lookup keyed by the file itself.
    PerFile(PathBuf),
    /// Cheaper generic lookup keyed by the (lowercased) extension.
    ForExtension(String),
}

/// One filesystem child. Ephemeral: recomputed per snapshot, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_package: bool,
    pub icon: IconRef,
}

impl DirectoryEntry {
    /// Whether the entry can be drilled into as a submenu.
    pub fn is_traversable(&self) -> bool {
        self.is_dir && !self.is_package
    }
}

/// Lists the immediate children of the directory behind `handle`.
///
/// Hidden entries are excluded. When `purchased` is false the listing is
/// truncated to the first [`FREE_TIER_ENTRY_LIMIT`] entries *in raw OS
/// order, before sorting* — the free tier caps "first 10 as returned by the
/// OS", not "first 10 alphabetically". A child whose metadata cannot be read
/// discards the whole snapshot as unreadable rather than silently omitting
/// the entry. The surviving entries are sorted with the case- and
/// diacritic-aware collator, files and directories interleaved.
/// 列出目錄的直接子項目：排除隱藏項目，免費版於排序前以原始順序截斷至前十筆，
/// 任一子項目中繼資料讀取失敗即整份快照視為不可讀。
pub fn snapshot(
    handle: &DirectoryHandle,
    fidelity: IconFidelity,
    purchased: bool,
) -> Result<Vec<DirectoryEntry>, SnapshotError> {
    let directory = handle.path();
    let unreadable = || SnapshotError::Unreadable {
        path: directory.to_path_buf(),
    };

    let mut raw = Vec::new();
    for entry in fs::read_dir(directory).map_err(|_| unreadable())? {
        let entry = entry.map_err(|_| unreadable())?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        raw.push(entry);
    }

    if !purchased && raw.len() > FREE_TIER_ENTRY_LIMIT {
        log::debug!(
            "free tier: truncating {} to {FREE_TIER_ENTRY_LIMIT} of {} entries",
            directory.display(),
            raw.len()
        );
        raw.truncate(FREE_TIER_ENTRY_LIMIT);
    }

    let mut entries = Vec::with_capacity(raw.len());
    for entry in raw {
        let metadata = entry.metadata().map_err(|_| unreadable())?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = metadata.is_dir();
        let is_package = is_dir && has_bundle_extension(&path);
        let icon = icon_for(&path, is_dir, fidelity);
        entries.push(DirectoryEntry {
            name,
            path,
            is_dir,
            is_package,
            icon,
        });
    }

    entries.sort_by(|a, b| compare_names(&a.name, &b.name));
    Ok(entries)
}

/// Directories and extensionless files always get the per-file lookup; the
/// fidelity setting only affects regular files with an extension.
fn icon_for(path: &Path, is_dir: bool, fidelity: IconFidelity) -> IconRef {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(extension) if !is_dir && fidelity == IconFidelity::Standard => {
            IconRef::ForExtension(extension.to_ascii_lowercase())
        }
        _ => IconRef::PerFile(path.to_path_buf()),
    }
}

fn has_bundle_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            BUNDLE_EXTENSIONS
                .iter()
                .any(|bundle| ext.eq_ignore_ascii_case(bundle))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldermenu_access::AccessResolver;
    use foldermenu_config::{FolderReference, MenuConfiguration};
    use tempfile::{tempdir, TempDir};

    fn handle_for(dir: &TempDir) -> DirectoryHandle {
        let config =
            MenuConfiguration::new("Test", FolderReference::for_directory(dir.path()));
        let mut resolver = AccessResolver::new();
        resolver.resolve(&config).unwrap()
    }

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), b"").unwrap();
    }

    #[test]
    fn lists_immediate_children_with_metadata() {
        let dir = tempdir().unwrap();
        touch(&dir, "notes.txt");
        fs::create_dir(dir.path().join("projects")).unwrap();

        let entries = snapshot(&handle_for(&dir), IconFidelity::Rich, true).unwrap();
        assert_eq!(entries.len(), 2);

        let notes = entries.iter().find(|e| e.name == "notes.txt").unwrap();
        assert!(!notes.is_dir);
        assert!(!notes.is_package);
        assert!(!notes.is_traversable());

        let projects = entries.iter().find(|e| e.name == "projects").unwrap();
        assert!(projects.is_dir);
        assert!(projects.is_traversable());
    }

    #[test]
    fn hidden_entries_are_excluded() {
        let dir = tempdir().unwrap();
        touch(&dir, ".hidden");
        touch(&dir, "visible");

        let entries = snapshot(&handle_for(&dir), IconFidelity::Rich, true).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "visible");
    }

    #[test]
    fn free_tier_truncates_to_ten_for_any_size() {
        for count in [0usize, 5, 10, 200] {
            let dir = tempdir().unwrap();
            for i in 0..count {
                touch(&dir, &format!("file{i:03}"));
            }
            let entries = snapshot(&handle_for(&dir), IconFidelity::Rich, false).unwrap();
            assert_eq!(entries.len(), count.min(FREE_TIER_ENTRY_LIMIT));
        }
    }

    #[test]
    fn purchased_listing_is_not_truncated() {
        let dir = tempdir().unwrap();
        for i in 0..25 {
            touch(&dir, &format!("file{i:03}"));
        }
        let entries = snapshot(&handle_for(&dir), IconFidelity::Rich, true).unwrap();
        assert_eq!(entries.len(), 25);
    }

    #[test]
    fn results_are_sorted_for_display() {
        let dir = tempdir().unwrap();
        for name in ["zebra", "Apple", "mango"] {
            touch(&dir, name);
        }
        let entries = snapshot(&handle_for(&dir), IconFidelity::Rich, true).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "mango", "zebra"]);
    }

    #[test]
    fn bundle_directories_are_packages_not_submenus() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Tool.app")).unwrap();
        fs::create_dir(dir.path().join("plain")).unwrap();

        let entries = snapshot(&handle_for(&dir), IconFidelity::Rich, true).unwrap();
        let app = entries.iter().find(|e| e.name == "Tool.app").unwrap();
        assert!(app.is_dir);
        assert!(app.is_package);
        assert!(!app.is_traversable());

        let plain = entries.iter().find(|e| e.name == "plain").unwrap();
        assert!(!plain.is_package);
    }

    #[test]
    fn standard_fidelity_uses_extension_icons_for_plain_files_only() {
        let dir = tempdir().unwrap();
        touch(&dir, "report.PDF");
        touch(&dir, "README");
        fs::create_dir(dir.path().join("archive.bundle")).unwrap();

        let entries = snapshot(&handle_for(&dir), IconFidelity::Standard, true).unwrap();

        let report = entries.iter().find(|e| e.name == "report.PDF").unwrap();
        assert_eq!(report.icon, IconRef::ForExtension("pdf".to_string()));

        let readme = entries.iter().find(|e| e.name == "README").unwrap();
        assert!(matches!(readme.icon, IconRef::PerFile(_)));

        let bundle = entries.iter().find(|e| e.name == "archive.bundle").unwrap();
        assert!(matches!(bundle.icon, IconRef::PerFile(_)));
    }

    #[test]
    fn rich_fidelity_always_uses_per_file_icons() {
        let dir = tempdir().unwrap();
        touch(&dir, "photo.png");
        let entries = snapshot(&handle_for(&dir), IconFidelity::Rich, true).unwrap();
        assert!(matches!(entries[0].icon, IconRef::PerFile(_)));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_reports_unreadable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        touch(&dir, "unused");

        let handle = handle_for(&dir).child(&locked);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Elevated privileges ignore permission bits; nothing to test.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let err = snapshot(&handle, IconFidelity::Rich, true).unwrap_err();
        assert!(matches!(err, SnapshotError::Unreadable { path } if path == locked));

        // Restore so the tempdir can be cleaned up.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
