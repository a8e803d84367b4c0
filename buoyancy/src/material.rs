use bevy_math::DVec2;
use serde::{Deserialize, Serialize};

/// Custom densities and gravity are clamped to this floor (SI units).
const MIN_CUSTOM_VALUE: f64 = 1e-3;

/// Solid material of a body. Densities in kg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Styrofoam,
    #[default]
    Wood,
    Ice,
    Human,
    Brick,
    Aluminum,
    Steel,
    Copper,
    Platinum,
    Custom { density: f64 },
}

impl Material {
    pub fn density(self) -> f64 {
        match self {
            Material::Styrofoam => 14.0,
            Material::Wood => 400.0,
            Material::Ice => 919.0,
            Material::Human => 950.0,
            Material::Brick => 2000.0,
            Material::Aluminum => 2700.0,
            Material::Steel => 7800.0,
            Material::Copper => 8960.0,
            Material::Platinum => 21450.0,
            Material::Custom { density } => density.max(MIN_CUSTOM_VALUE),
        }
    }
}

/// Liquid filling every basin of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liquid {
    Gasoline,
    Oil,
    #[default]
    Water,
    Seawater,
    Honey,
    Mercury,
    Custom { density: f64 },
}

impl Liquid {
    pub fn density(self) -> f64 {
        match self {
            Liquid::Gasoline => 680.0,
            Liquid::Oil => 920.0,
            Liquid::Water => 1000.0,
            Liquid::Seawater => 1029.0,
            Liquid::Honey => 1440.0,
            Liquid::Mercury => 13593.0,
            Liquid::Custom { density } => density.max(MIN_CUSTOM_VALUE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
    Moon,
    #[default]
    Earth,
    Jupiter,
    Custom { g: f64 },
}

impl Gravity {
    /// Magnitude in m/s².
    pub fn magnitude(self) -> f64 {
        match self {
            Gravity::Moon => 1.62,
            Gravity::Earth => 9.8,
            Gravity::Jupiter => 24.8,
            Gravity::Custom { g } => g.max(MIN_CUSTOM_VALUE),
        }
    }

    /// Acceleration vector; +Y is up.
    pub fn vector(self) -> DVec2 { DVec2::new(0.0, -self.magnitude()) }
}
