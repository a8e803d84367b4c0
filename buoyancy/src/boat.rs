//! One-liter reference boat. Every boat in a scene is this design scaled by
//! `cbrt(displacement / BOAT_REFERENCE_VOLUME)`.

use std::sync::OnceLock;

use bevy_math::{DVec2, DVec3};

use crate::math::Outline;
use crate::profile::ProfileTable;
use crate::shape::{BodyShape, ShapeKind};

/// Exterior displacement of the reference design (m³).
pub const BOAT_REFERENCE_VOLUME: f64 = 0.001;

// Exterior box proportions relative to the width.
const HEIGHT_TO_WIDTH: f64 = 0.45;
const DEPTH_TO_WIDTH: f64 = 0.5;
// Interior depth relative to exterior depth (front/back walls).
const INTERIOR_DEPTH_FRACTION: f64 = 0.85;

#[derive(Debug, Clone)]
pub struct BoatDesign {
    /// Hull exterior, normalized over the exterior bounding box.
    pub exterior: ProfileTable,
    /// Hollow interior, normalized over the interior bounding box (floor to rim).
    pub interior: ProfileTable,
    /// Exterior box (width, height, depth) of the one-liter boat.
    pub exterior_size: DVec3,
    /// Interior box (width, height, depth) of the one-liter boat.
    pub interior_size: DVec3,
    /// Interior floor above the hull bottom.
    pub floor_height: f64,
    /// Interior side outline, origin at the hull's bottom center.
    pub interior_outline: Outline,
}

pub fn boat_design() -> &'static BoatDesign {
    static DESIGN: OnceLock<BoatDesign> = OnceLock::new();
    DESIGN.get_or_init(BoatDesign::reference)
}

impl BoatDesign {
    fn reference() -> Self {
        // Flared tub; unit box coordinates, x across, y up.
        let exterior_unit = Outline::new(vec![
            DVec2::new(-0.4, 0.0),
            DVec2::new(0.4, 0.0),
            DVec2::new(0.5, 1.0),
            DVec2::new(-0.5, 1.0),
        ]);
        let interior_unit = Outline::new(vec![
            DVec2::new(-0.34, 0.15),
            DVec2::new(0.34, 0.15),
            DVec2::new(0.44, 1.0),
            DVec2::new(-0.44, 1.0),
        ]);

        let exterior = ProfileTable::from_extruded(&exterior_unit);
        let width = (BOAT_REFERENCE_VOLUME
            / (exterior.fill_factor() * HEIGHT_TO_WIDTH * DEPTH_TO_WIDTH))
            .cbrt();
        let height = HEIGHT_TO_WIDTH * width;
        let depth = DEPTH_TO_WIDTH * width;

        let interior_outline = interior_unit.transformed(DVec2::new(width, height), DVec2::ZERO);
        let interior = ProfileTable::from_extruded(&interior_outline);
        let ib = interior_outline.bounds();

        Self {
            exterior,
            interior,
            exterior_size: DVec3::new(width, height, depth),
            interior_size: DVec3::new(ib.width(), ib.height(), INTERIOR_DEPTH_FRACTION * depth),
            floor_height: ib.min.y,
            interior_outline,
        }
    }

    /// Linear scale factor of a boat displacing `volume` m³.
    pub fn multiplier_for_volume(volume: f64) -> f64 {
        (volume.max(0.0) / BOAT_REFERENCE_VOLUME).cbrt()
    }

    /// Liquid the one-liter interior holds up to the rim (m³).
    pub fn interior_capacity(&self) -> f64 {
        let s = self.interior_size;
        self.interior.fill_factor() * s.x * s.y * s.z
    }

    pub fn hull_shape(&self, multiplier: f64) -> BodyShape {
        let s = self.exterior_size * multiplier;
        BodyShape::new(ShapeKind::BoatHull, s.x, s.y, s.z)
    }

    /// Volume of hull material (exterior minus interior), scaled.
    pub fn hull_material_volume(&self, multiplier: f64) -> f64 {
        (BOAT_REFERENCE_VOLUME - self.interior_capacity()) * multiplier.powi(3)
    }
}
