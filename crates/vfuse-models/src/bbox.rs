//! Axis-aligned bounding boxes in pixel coordinates.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Bounding box in pixel coordinates, corner form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    /// Left edge x-coordinate
    pub x1: f64,
    /// Top edge y-coordinate
    pub y1: f64,
    /// Right edge x-coordinate
    pub x2: f64,
    /// Bottom edge y-coordinate
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Box height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Box area in pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Width divided by height, 0.0 for a box without height.
    pub fn aspect_ratio(&self) -> f64 {
        let height = self.height();
        if height > 0.0 {
            self.width() / height
        } else {
            0.0
        }
    }

    /// True when all corners are finite and the box has positive width and height.
    pub fn is_well_formed(&self) -> bool {
        self.x1.is_finite()
            && self.y1.is_finite()
            && self.x2.is_finite()
            && self.y2.is_finite()
            && self.x1 < self.x2
            && self.y1 < self.y2
    }

    /// Check the box, returning a descriptive error for degenerate corners.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.is_well_formed() {
            Ok(())
        } else {
            Err(ModelError::InvalidBox {
                x1: self.x1,
                y1: self.y1,
                x2: self.x2,
                y2: self.y2,
            })
        }
    }
}
