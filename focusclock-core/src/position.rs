//! Drag-to-reposition for the currency overlay

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPosition {
    pub x: f64,
    pub y: f64,
}

impl OverlayPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for OverlayPosition {
    fn default() -> Self {
        Self { x: 0.0, y: -50.0 }
    }
}

/// Inclusive rectangle the overlay may occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

pub const OVERLAY_BOUNDS: Bounds = Bounds {
    min_x: -50.0,
    max_x: 750.0,
    min_y: -200.0,
    max_y: 300.0,
};

impl Bounds {
    /// Clamps each axis on its own. NaN coordinates land on the minimum.
    pub fn clamp(&self, position: OverlayPosition) -> OverlayPosition {
        OverlayPosition {
            x: clamp_axis(position.x, self.min_x, self.max_x),
            y: clamp_axis(position.y, self.min_y, self.max_y),
        }
    }
}

fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[derive(Debug, Clone)]
pub struct PositionTracker {
    position: OverlayPosition,
    bounds: Bounds,
    /// Pointer minus position, captured when the drag began.
    drag_offset: Option<(f64, f64)>,
}

impl PositionTracker {
    pub fn new(initial: OverlayPosition, bounds: Bounds) -> Self {
        Self {
            position: bounds.clamp(initial),
            bounds,
            drag_offset: None,
        }
    }

    pub fn position(&self) -> OverlayPosition {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    pub fn begin_drag(&mut self, pointer: OverlayPosition) {
        self.drag_offset = Some((pointer.x - self.position.x, pointer.y - self.position.y));
    }

    pub fn update_drag(&mut self, pointer: OverlayPosition) {
        if let Some((dx, dy)) = self.drag_offset {
            self.position = self
                .bounds
                .clamp(OverlayPosition::new(pointer.x - dx, pointer.y - dy));
        }
    }

    /// Finishes the gesture and reports the final position once.
    /// Does nothing if no drag is in progress.
    pub fn end_drag<F>(&mut self, on_change: F)
    where
        F: FnOnce(OverlayPosition),
    {
        if self.drag_offset.take().is_some() {
            on_change(self.position);
        }
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new(OverlayPosition::default(), OVERLAY_BOUNDS)
    }
}
