use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::reference::FolderReference;

const CONFIGURATION_VERSION: u32 = 1;

static NEXT_CONFIG_SEQ: AtomicU64 = AtomicU64::new(1);

/// Stable identifier for a menu configuration. Two configurations denote the
/// same status item iff their identifiers match, regardless of other fields.
/// 選單設定的穩定識別碼；識別碼相同即視為同一個狀態列項目。
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigId(String);

impl ConfigId {
    pub fn generate() -> Self {
        let seq = NEXT_CONFIG_SEQ.fetch_add(1, Ordering::Relaxed);
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self(format!("{secs:012x}{seq:04x}"))
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the status item button displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TitleStyle {
    #[default]
    IconAndTitle,
    IconOnly,
    TitleOnly,
}

/// Icon size tier for menu rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MenuIconStyle {
    #[default]
    SmallIcons,
    LargeIcons,
    NoIcons,
}

/// Whether icons are looked up per file or by extension only.
/// Per-file lookup is slower but matches the file's real icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IconFidelity {
    #[default]
    Rich,
    Standard,
}

/// Font size tier for menu rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MenuFontSize {
    Small,
    #[default]
    Regular,
    Large,
}

/// One status-item definition: which folder to show and how to style it.
/// 一個狀態列項目的完整定義：顯示哪個資料夾以及顯示樣式。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfiguration {
    #[serde(default = "default_version")]
    pub version: u32,
    pub id: ConfigId,
    pub title: String,
    pub folder: FolderReference,
    #[serde(default)]
    pub title_style: TitleStyle,
    #[serde(default)]
    pub menu_icon_style: MenuIconStyle,
    #[serde(default)]
    pub icon_fidelity: IconFidelity,
    #[serde(default)]
    pub menu_font_size: MenuFontSize,
}

fn default_version() -> u32 {
    CONFIGURATION_VERSION
}

impl MenuConfiguration {
    pub fn new(title: impl Into<String>, folder: FolderReference) -> Self {
        Self {
            version: CONFIGURATION_VERSION,
            id: ConfigId::generate(),
            title: title.into(),
            folder,
            title_style: TitleStyle::default(),
            menu_icon_style: MenuIconStyle::default(),
            icon_fidelity: IconFidelity::default(),
            menu_font_size: MenuFontSize::default(),
        }
    }

    /// Identity comparison: identifiers only, never field equality.
    pub fn same_identity(&self, other: &MenuConfiguration) -> bool {
        self.id == other.id
    }

    /// Repairs fields that would render the configuration unusable.
    /// 修復會讓設定無法使用的欄位。
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = CONFIGURATION_VERSION;
        }
        if self.title.trim().is_empty() {
            self.title = self
                .folder
                .candidate_path()
                .ok()
                .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "Folder".to_string());
        }
    }
}
