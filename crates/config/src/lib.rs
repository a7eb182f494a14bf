//! Menu configuration model and persistence for FolderMenu.
//! FolderMenu 的選單設定模型與儲存模組。

pub mod configuration;
pub mod reference;
pub mod store;

pub use configuration::{
    ConfigId, IconFidelity, MenuConfiguration, MenuFontSize, MenuIconStyle, TitleStyle,
};
pub use reference::{FolderReference, ReferenceError};
pub use store::{ConfigError, ConfigStore};
