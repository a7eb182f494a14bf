use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const REFERENCE_PREFIX: &str = "fldr1:";

/// Errors raised while decoding a persisted folder reference.
/// 解碼已儲存的資料夾參照時可能發生的錯誤。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("unrecognised folder reference format")]
    UnknownFormat,
    #[error("invalid folder reference payload: {0}")]
    InvalidPayload(String),
}

/// Opaque, persisted pointer to a directory chosen by the user.
/// Decoding only yields a candidate path; it never grants access by itself.
/// 使用者所選資料夾的不透明持久化參照；解碼僅取得候選路徑，不代表任何存取權限。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderReference(String);

impl FolderReference {
    /// Encodes a reference for the given directory path.
    /// 依指定目錄路徑建立參照。
    pub fn for_directory(path: impl AsRef<Path>) -> Self {
        let bytes = path_to_bytes(path.as_ref());
        Self(format!("{REFERENCE_PREFIX}{}", BASE64.encode(bytes)))
    }

    /// Decodes the candidate path stored in the reference. The filesystem is
    /// not consulted; the path may be stale, moved, or deleted.
    /// 解出參照中的候選路徑；不會查詢檔案系統，路徑可能已失效。
    pub fn candidate_path(&self) -> Result<PathBuf, ReferenceError> {
        let payload = self
            .0
            .strip_prefix(REFERENCE_PREFIX)
            .ok_or(ReferenceError::UnknownFormat)?;
        let bytes = BASE64
            .decode(payload.as_bytes())
            .map_err(|err| ReferenceError::InvalidPayload(err.to_string()))?;
        bytes_to_path(bytes).map_err(ReferenceError::InvalidPayload)
    }

    /// Raw encoded form, as persisted.
    /// 儲存時使用的原始編碼字串。
    pub fn as_encoded(&self) -> &str {
        &self.0
    }

    /// Rebuilds a reference from its persisted encoded form.
    pub fn from_encoded(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for FolderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn path_to_bytes(path: &Path) -> Cow<'_, [u8]> {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        Cow::Borrowed(path.as_os_str().as_bytes())
    }

    #[cfg(windows)]
    {
        use std::os::windows::ffi::OsStrExt;
        let wide: Vec<u16> = path.as_os_str().encode_wide().collect();
        let mut bytes = Vec::with_capacity(wide.len() * 2);
        for unit in wide {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        Cow::Owned(bytes)
    }
}

fn bytes_to_path(bytes: Vec<u8>) -> Result<PathBuf, String> {
    #[cfg(unix)]
    {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;
        Ok(PathBuf::from(OsString::from_vec(bytes)))
    }

    #[cfg(windows)]
    {
        use std::ffi::OsString;
        use std::os::windows::ffi::OsStringExt;
        if bytes.len() % 2 != 0 {
            return Err("encoded Windows path has odd byte length".to_string());
        }
        let wide: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(PathBuf::from(OsString::from_wide(&wide)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_directory_path() {
        let reference = FolderReference::for_directory("/Users/demo/Documents");
        assert_eq!(
            reference.candidate_path().unwrap(),
            PathBuf::from("/Users/demo/Documents")
        );
    }

    #[test]
    fn decoding_never_requires_the_directory_to_exist() {
        let reference = FolderReference::for_directory("/definitely/not/a/real/folder");
        assert!(reference.candidate_path().is_ok());
    }

    #[test]
    fn rejects_foreign_payloads() {
        let reference = FolderReference::from_encoded("/plain/path");
        assert_eq!(
            reference.candidate_path().unwrap_err(),
            ReferenceError::UnknownFormat
        );

        let reference = FolderReference::from_encoded("fldr1:!!!not-base64!!!");
        assert!(matches!(
            reference.candidate_path().unwrap_err(),
            ReferenceError::InvalidPayload(_)
        ));
    }

    #[test]
    fn serde_form_is_the_encoded_string() {
        let reference = FolderReference::for_directory("/tmp/x");
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, format!("\"{}\"", reference.as_encoded()));
        let back: FolderReference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
    }
}
