//! 存檔介面

use crate::domain::snapshot::Snapshot;
use crate::error::{LoadError, Result};
use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;
use tracing::debug;

pub trait StateStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
    /// 存檔不存在或損毀時回傳錯誤
    fn load(&self) -> Result<Snapshot>;
}

/// 存在記憶體中的 JSON 字串
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接放入原始內容（測試損毀存檔用）
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            data: Some(raw.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

impl StateStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.data = Some(snapshot.to_json()?);
        Ok(())
    }

    fn load(&self) -> Result<Snapshot> {
        let raw = self.data.as_deref().ok_or(LoadError::SnapshotMissing)?;
        Snapshot::from_json(raw)
    }
}

/// 存成 JSON 檔案
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, err: std::io::Error) -> LoadError {
        LoadError::Io {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl StateStore for JsonFileStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), "存檔完成");
        Ok(())
    }

    fn load(&self) -> Result<Snapshot> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                return Err(LoadError::SnapshotMissing.into());
            }
            Err(e) => return Err(self.io_error(e).into()),
        };
        Snapshot::from_json(&raw)
    }
}
