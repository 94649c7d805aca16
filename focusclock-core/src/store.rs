//! Persistence interface for the overlay position

use std::cell::RefCell;

use thiserror::Error;
use tracing::{debug, warn};

use crate::position::OverlayPosition;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed position data: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single key-value slot holding the last overlay position.
pub trait PositionStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<OverlayPosition>, StoreError>;
    fn save(&self, position: OverlayPosition) -> Result<(), StoreError>;
}

/// Reads the saved position, falling back to the default on any failure.
pub fn restore_position(store: &dyn PositionStore) -> OverlayPosition {
    match store.load() {
        Ok(Some(position)) => {
            debug!(x = position.x, y = position.y, "restored overlay position");
            position
        }
        Ok(None) => OverlayPosition::default(),
        Err(e) => {
            warn!("Failed to restore overlay position, using default: {}", e);
            OverlayPosition::default()
        }
    }
}

/// Keeps the position for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryPositionStore {
    slot: RefCell<Option<OverlayPosition>>,
}

impl MemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PositionStore for MemoryPositionStore {
    fn load(&self) -> Result<Option<OverlayPosition>, StoreError> {
        Ok(*self.slot.borrow())
    }

    fn save(&self, position: OverlayPosition) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = Some(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl PositionStore for BrokenStore {
        fn load(&self) -> Result<Option<OverlayPosition>, StoreError> {
            Err(serde_json::from_str::<OverlayPosition>("{not json")
                .unwrap_err()
                .into())
        }

        fn save(&self, _position: OverlayPosition) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn empty_store_restores_default() {
        let store = MemoryPositionStore::new();
        assert_eq!(restore_position(&store), OverlayPosition::default());
    }

    #[test]
    fn saved_position_is_restored() {
        let store = MemoryPositionStore::new();
        store.save(OverlayPosition::new(12.0, 34.0)).unwrap();
        assert_eq!(restore_position(&store), OverlayPosition::new(12.0, 34.0));
    }

    #[test]
    fn failing_store_restores_default() {
        assert_eq!(restore_position(&BrokenStore), OverlayPosition::default());
    }
}
