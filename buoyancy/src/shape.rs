use std::f64::consts::PI;
use std::sync::OnceLock;

use bevy_math::DVec2;
use serde::{Deserialize, Serialize};

use crate::boat::boat_design;
use crate::math::{ellipse_points, Outline};
use crate::profile::{ProfileTable, ShapeProfile};

const CURVE_SEGMENTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Cuboid,
    /// Upright, elliptical footprint spanning width and depth.
    Cylinder,
    /// Lying on its side with the axis along the depth direction.
    HorizontalCylinder,
    /// Apex up.
    Cone,
    /// Apex down.
    InvertedCone,
    Ellipsoid,
    Bottle,
    Duck,
    BoatHull,
}

impl ShapeKind {
    pub fn profile(self) -> ShapeProfile {
        match self {
            ShapeKind::Cuboid | ShapeKind::Cylinder => ShapeProfile::Prism,
            ShapeKind::HorizontalCylinder => ShapeProfile::HorizontalCylinder,
            ShapeKind::Cone => ShapeProfile::Cone,
            ShapeKind::InvertedCone => ShapeProfile::InvertedCone,
            ShapeKind::Ellipsoid => ShapeProfile::Ellipsoid,
            ShapeKind::Bottle => ShapeProfile::Table(bottle_table()),
            ShapeKind::Duck => ShapeProfile::Table(duck_table()),
            ShapeKind::BoatHull => ShapeProfile::Table(&boat_design().exterior),
        }
    }

    /// Shape volume over bounding-box volume.
    pub fn fill_factor(self) -> f64 {
        match self {
            ShapeKind::Cuboid => 1.0,
            ShapeKind::Cylinder | ShapeKind::HorizontalCylinder => PI / 4.0,
            ShapeKind::Cone | ShapeKind::InvertedCone => PI / 12.0,
            ShapeKind::Ellipsoid => PI / 6.0,
            ShapeKind::Bottle => bottle_table().fill_factor(),
            ShapeKind::Duck => duck_table().fill_factor(),
            ShapeKind::BoatHull => boat_design().exterior.fill_factor(),
        }
    }

    fn unit_outline(self) -> Vec<DVec2> {
        let rect = || {
            vec![
                DVec2::new(-0.5, 0.0),
                DVec2::new(0.5, 0.0),
                DVec2::new(0.5, 1.0),
                DVec2::new(-0.5, 1.0),
            ]
        };
        match self {
            ShapeKind::Cuboid | ShapeKind::Cylinder => rect(),
            ShapeKind::HorizontalCylinder | ShapeKind::Ellipsoid => {
                ellipse_points(DVec2::new(0.0, 0.5), DVec2::splat(0.5), CURVE_SEGMENTS)
            }
            ShapeKind::Cone => vec![DVec2::new(-0.5, 0.0), DVec2::new(0.5, 0.0), DVec2::new(0.0, 1.0)],
            ShapeKind::InvertedCone => {
                vec![DVec2::new(0.0, 0.0), DVec2::new(0.5, 1.0), DVec2::new(-0.5, 1.0)]
            }
            ShapeKind::Bottle => bottle_table().outline().points().to_vec(),
            ShapeKind::Duck => duck_table().outline().points().to_vec(),
            ShapeKind::BoatHull => boat_design().exterior.outline().points().to_vec(),
        }
    }
}

/// A shape kind sized by its bounding box (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyShape {
    pub kind: ShapeKind,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl BodyShape {
    pub const fn new(kind: ShapeKind, width: f64, height: f64, depth: f64) -> Self {
        Self { kind, width, height, depth }
    }

    pub fn cube(volume: f64) -> Self {
        let side = volume.max(0.0).cbrt();
        Self::new(ShapeKind::Cuboid, side, side, side)
    }

    /// Sizes a shape the way the shape sliders do: ratios in [0, 1] pick the
    /// proportions, then the box is scaled to hit `volume`. Round kinds keep a
    /// square footprint.
    pub fn from_ratios(kind: ShapeKind, volume: f64, width_ratio: f64, height_ratio: f64) -> Self {
        let w = 0.2 + 0.8 * width_ratio.clamp(0.0, 1.0);
        let h = 0.2 + 0.8 * height_ratio.clamp(0.0, 1.0);
        Self::new(kind, w, h, w).with_volume(volume)
    }

    pub fn volume(&self) -> f64 {
        self.kind.fill_factor() * self.width * self.height * self.depth
    }

    pub fn profile(&self) -> ShapeProfile { self.kind.profile() }

    /// Uniformly rescales the box so the shape encloses `volume`.
    pub fn with_volume(self, volume: f64) -> Self {
        let current = self.volume();
        if current <= 0.0 {
            return self;
        }
        let s = (volume.max(0.0) / current).cbrt();
        Self::new(self.kind, self.width * s, self.height * s, self.depth * s)
    }

    pub fn is_valid(&self) -> bool {
        [self.width, self.height, self.depth].iter().all(|d| d.is_finite() && *d > 0.0)
    }

    /// Side-view collision outline centered on the bounding box center.
    pub fn collision_outline(&self) -> Vec<DVec2> {
        let scale = DVec2::new(self.width, self.height);
        let offset = DVec2::new(0.0, -0.5 * self.height);
        Outline::new(self.kind.unit_outline()).transformed(scale, offset).points().to_vec()
    }
}

fn bottle_table() -> &'static ProfileTable {
    static TABLE: OnceLock<ProfileTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        ProfileTable::from_revolved(&[
            DVec2::new(0.45, 0.0),
            DVec2::new(0.5, 0.04),
            DVec2::new(0.5, 0.55),
            DVec2::new(0.3, 0.72),
            DVec2::new(0.18, 0.8),
            DVec2::new(0.18, 1.0),
        ])
    })
}

fn duck_table() -> &'static ProfileTable {
    static TABLE: OnceLock<ProfileTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        ProfileTable::from_revolved(&[
            DVec2::new(0.3, 0.0),
            DVec2::new(0.5, 0.18),
            DVec2::new(0.48, 0.42),
            DVec2::new(0.26, 0.55),
            DVec2::new(0.32, 0.75),
            DVec2::new(0.22, 0.94),
            DVec2::new(0.08, 1.0),
        ])
    })
}
