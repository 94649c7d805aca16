use anyhow::Result;
use directories::ProjectDirs;
use focusclock_core::{OverlayPosition, PositionStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};

const POSITION_FILE: &str = "overlay_position.json";

pub fn data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "focusclock", "focusclock")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    let data_dir = proj_dirs.data_dir();
    fs::create_dir_all(data_dir)?;

    Ok(data_dir.to_path_buf())
}

/// Overlay position kept as `{"x": .., "y": ..}` in a JSON file.
#[derive(Debug, Clone)]
pub struct FilePositionStore {
    path: PathBuf,
}

impl FilePositionStore {
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(data_dir()?.join(POSITION_FILE)))
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PositionStore for FilePositionStore {
    fn load(&self) -> Result<Option<OverlayPosition>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        let position: OverlayPosition = serde_json::from_str(&json)?;
        Ok(Some(position))
    }

    fn save(&self, position: OverlayPosition) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&position)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use focusclock_core::restore_position;
    use tempfile::tempdir;

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let store = FilePositionStore::with_path(dir.path().join("nested").join(POSITION_FILE));
        assert_matches!(store.load(), Ok(None));

        store.save(OverlayPosition::new(120.0, -80.0)).unwrap();
        assert_matches!(store.load(), Ok(Some(p)) if p == OverlayPosition::new(120.0, -80.0));

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["x"], 120.0);
        assert_eq!(value["y"], -80.0);
    }

    #[test]
    fn malformed_file_restores_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(POSITION_FILE);
        fs::write(&path, "{\"x\": \"left\"}").unwrap();
        let store = FilePositionStore::with_path(&path);
        assert_matches!(store.load(), Err(StoreError::Json(_)));
        assert_eq!(restore_position(&store), OverlayPosition::default());
    }
}
