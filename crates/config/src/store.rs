use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::configuration::{ConfigId, MenuConfiguration};

/// Errors raised by configuration persistence.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configurations {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configurations {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize configurations {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write configurations {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    configurations: Vec<MenuConfiguration>,
}

/// Persists the ordered list of menu configurations as one JSON file.
/// The list order is the status-item order, left to right.
/// 以單一 JSON 檔儲存選單設定的有序清單；清單順序即狀態列由左至右的順序。
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all configurations; an absent file yields an empty list.
    /// 載入所有設定；檔案不存在時回傳空清單。
    pub fn load(&self) -> Result<Vec<MenuConfiguration>, ConfigError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let mut file: ConfigFile =
                    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                        path: self.path.clone(),
                        source,
                    })?;
                for config in &mut file.configurations {
                    config.sanitize();
                }
                Ok(file.configurations)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(ConfigError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Saves the given list atomically, replacing the previous contents.
    pub fn save(&self, configurations: &[MenuConfiguration]) -> Result<(), ConfigError> {
        let file = ConfigFile {
            configurations: configurations.to_vec(),
        };
        let payload =
            serde_json::to_vec_pretty(&file).map_err(|source| ConfigError::Serialize {
                path: self.path.clone(),
                source,
            })?;
        self.write_atomic(&payload)
    }

    /// Inserts the configuration, or updates the existing entry with the same
    /// identity, preserving list order. Returns the updated list.
    /// 新增設定；若已有相同識別碼的項目則就地更新，保留清單順序。
    pub fn upsert(
        &self,
        configuration: MenuConfiguration,
    ) -> Result<Vec<MenuConfiguration>, ConfigError> {
        let mut configurations = self.load()?;
        match configurations
            .iter_mut()
            .find(|existing| existing.same_identity(&configuration))
        {
            Some(existing) => *existing = configuration,
            None => configurations.push(configuration),
        }
        self.save(&configurations)?;
        Ok(configurations)
    }

    /// Removes the configuration with the given identity. Used both for
    /// explicit removal and when the host reports a status item dragged off
    /// the bar. Returns the updated list.
    /// 移除指定識別碼的設定；也用於使用者將狀態列項目拖離選單列時。
    pub fn remove(&self, id: &ConfigId) -> Result<Vec<MenuConfiguration>, ConfigError> {
        let mut configurations = self.load()?;
        configurations.retain(|config| config.id != *id);
        self.save(&configurations)?;
        Ok(configurations)
    }

    /// Reorders the list to match the host-observed status-item order.
    /// Unknown identifiers are ignored; configurations missing from `order`
    /// keep their relative order after the known ones.
    /// 依狀態列實際順序重排清單；未知識別碼忽略，未列出的設定依原相對順序排在後面。
    pub fn reorder(&self, order: &[ConfigId]) -> Result<Vec<MenuConfiguration>, ConfigError> {
        let mut remaining = self.load()?;
        let mut ordered = Vec::with_capacity(remaining.len());
        for id in order {
            if let Some(index) = remaining.iter().position(|config| config.id == *id) {
                ordered.push(remaining.remove(index));
            }
        }
        ordered.append(&mut remaining);
        self.save(&ordered)?;
        Ok(ordered)
    }

    fn write_atomic(&self, data: &[u8]) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, data).map_err(|source| ConfigError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::FolderReference;
    use tempfile::tempdir;

    fn sample(title: &str) -> MenuConfiguration {
        MenuConfiguration::new(title, FolderReference::for_directory("/tmp/sample"))
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("menus.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn upsert_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("menus.json"));

        let config = sample("Documents");
        store.upsert(config.clone()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], config);
    }

    #[test]
    fn upsert_updates_in_place_by_identity() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("menus.json"));

        let first = sample("First");
        let second = sample("Second");
        store.upsert(first.clone()).unwrap();
        store.upsert(second.clone()).unwrap();

        let mut edited = first.clone();
        edited.title = "Renamed".to_string();
        let updated = store.upsert(edited).unwrap();

        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].title, "Renamed");
        assert_eq!(updated[0].id, first.id);
        assert_eq!(updated[1].id, second.id);
    }

    #[test]
    fn remove_drops_only_the_matching_identity() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("menus.json"));

        let first = sample("First");
        let second = sample("Second");
        store.upsert(first.clone()).unwrap();
        store.upsert(second.clone()).unwrap();

        let remaining = store.remove(&first.id).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
    }

    #[test]
    fn reorder_follows_the_given_order_and_keeps_strays() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("menus.json"));

        let a = sample("A");
        let b = sample("B");
        let c = sample("C");
        store.save(&[a.clone(), b.clone(), c.clone()]).unwrap();

        let unknown = ConfigId::from_string("not-a-real-id");
        let ordered = store
            .reorder(&[c.id.clone(), unknown, a.id.clone()])
            .unwrap();
        let ids: Vec<_> = ordered.iter().map(|config| config.id.clone()).collect();
        assert_eq!(ids, vec![c.id, a.id, b.id]);
    }
}
