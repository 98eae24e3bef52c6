//! Pointer drag tracking for the indicator.
//!
//! The indicator is moved by the pointer's travel since the drag began,
//! relative to where the indicator started, and is kept inside the
//! image's bounding box the whole time.

use focal_core::{Dimensions, PixelOffset};

/// An in-progress drag of the indicator by one pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pointer_id: i32,
    start_x: f64,
    start_y: f64,
    origin: PixelOffset,
    current: PixelOffset,
}

impl DragGesture {
    /// Start dragging an indicator at `origin` with the pointer at
    /// client position (`client_x`, `client_y`).
    #[must_use]
    pub const fn begin(pointer_id: i32, client_x: f64, client_y: f64, origin: PixelOffset) -> Self {
        Self {
            pointer_id,
            start_x: client_x,
            start_y: client_y,
            origin,
            current: origin,
        }
    }

    /// The pointer driving this drag.
    #[must_use]
    pub const fn pointer_id(&self) -> i32 {
        self.pointer_id
    }

    /// Where the indicator currently is.
    #[must_use]
    pub const fn current(&self) -> PixelOffset {
        self.current
    }

    /// The pointer moved to (`client_x`, `client_y`); returns the new,
    /// contained, indicator offset.
    pub fn move_to(&mut self, client_x: f64, client_y: f64, dimensions: Dimensions) -> PixelOffset {
        self.current = PixelOffset::new(
            self.origin.left + (client_x - self.start_x),
            self.origin.top + (client_y - self.start_y),
        )
        .contained(dimensions);
        self.current
    }
}
