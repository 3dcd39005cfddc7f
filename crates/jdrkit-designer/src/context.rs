//! Coordinate spaces
//!
//! Geometry is stored in the drawing's storage unit. Exporters work in
//! PostScript points (bp) and an on-screen canvas works in component pixels.

use serde::{Deserialize, Serialize};

use jdrkit_core::{BoundingBox, Point, Unit};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawContext {
    pub storage_unit: Unit,
    /// Pixels per bp at magnification 1
    pub pixels_per_bp: f64,
    pub magnification: f64,
}

impl Default for DrawContext {
    fn default() -> Self {
        Self {
            storage_unit: Unit::Bp,
            pixels_per_bp: 1.0,
            magnification: 1.0,
        }
    }
}

impl DrawContext {
    pub fn new(storage_unit: Unit) -> Self {
        Self {
            storage_unit,
            ..Self::default()
        }
    }

    pub fn storage_to_bp(&self, value: f64) -> f64 {
        self.storage_unit.to_bp(value)
    }

    pub fn bp_to_storage(&self, value: f64) -> f64 {
        self.storage_unit.from_bp(value)
    }

    pub fn point_to_bp(&self, p: Point) -> Point {
        Point::new(self.storage_to_bp(p.x), self.storage_to_bp(p.y))
    }

    /// Component pixels per storage unit
    pub fn component_scale(&self) -> f64 {
        self.storage_to_bp(1.0) * self.pixels_per_bp * self.magnification
    }

    pub fn point_to_component(&self, p: Point) -> Point {
        let s = self.component_scale();
        Point::new(p.x * s, p.y * s)
    }

    pub fn component_to_storage(&self, p: Point) -> Point {
        let s = self.component_scale();
        Point::new(p.x / s, p.y / s)
    }

    pub fn bbox_to_bp(&self, bbox: &BoundingBox) -> BoundingBox {
        bbox.scaled(self.storage_to_bp(1.0))
    }

    pub fn bbox_to_component(&self, bbox: &BoundingBox) -> BoundingBox {
        bbox.scaled(self.component_scale())
    }
}
