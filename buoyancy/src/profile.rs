//! Cross-section profiles of displacing shapes.
//!
//! A profile maps a submersion ratio `r` in [0, 1] (0 = the shape's bottom at the
//! surface, 1 = its top at the surface) to two normalized quantities:
//!
//! - `area_fraction(r)`: horizontal cross-section area at `r`, scaled by
//!   `height / volume` so that it integrates to 1 over [0, 1];
//! - `volume_fraction(r)`: cumulative volume below `r` as a fraction of the
//!   total, 0 at `r = 0` and exactly 1 at `r = 1`.
//!
//! Every other component turns these into absolute areas and volumes by
//! multiplying with the owning shape's volume (and dividing by its height for
//! areas), so geometry math lives only here.

use bevy_math::DVec2;

use crate::math::Outline;

/// Sample count of piecewise-linear profile tables (including both ends).
pub const PROFILE_SAMPLES: usize = 65;

const INVERSE_ITERATIONS: u32 = 60;

#[derive(Debug, Clone, Copy)]
pub enum ShapeProfile {
    /// Constant cross-section: cuboids and upright cylinders.
    Prism,
    /// Cylinder lying on its side, axis along the depth direction.
    HorizontalCylinder,
    /// Apex up.
    Cone,
    /// Apex down.
    InvertedCone,
    Ellipsoid,
    Table(&'static ProfileTable),
}

impl ShapeProfile {
    pub fn area_fraction(self, ratio: f64) -> f64 {
        let r = ratio.clamp(0.0, 1.0);
        match self {
            ShapeProfile::Prism => 1.0,
            ShapeProfile::HorizontalCylinder => {
                let c = 2.0 * r - 1.0;
                (1.0 - c * c).max(0.0).sqrt() * 4.0 / std::f64::consts::PI
            }
            ShapeProfile::Cone => 3.0 * (1.0 - r) * (1.0 - r),
            ShapeProfile::InvertedCone => 3.0 * r * r,
            ShapeProfile::Ellipsoid => 6.0 * r * (1.0 - r),
            ShapeProfile::Table(table) => table.area_fraction(r),
        }
    }

    pub fn volume_fraction(self, ratio: f64) -> f64 {
        let r = ratio.clamp(0.0, 1.0);
        match self {
            ShapeProfile::Prism => r,
            ShapeProfile::HorizontalCylinder => {
                // Circular segment area over full circle area.
                let theta = 2.0 * (1.0 - 2.0 * r).clamp(-1.0, 1.0).acos();
                (theta - theta.sin()) / std::f64::consts::TAU
            }
            ShapeProfile::Cone => 1.0 - (1.0 - r).powi(3),
            ShapeProfile::InvertedCone => r.powi(3),
            ShapeProfile::Ellipsoid => r * r * (3.0 - 2.0 * r),
            ShapeProfile::Table(table) => table.volume_fraction(r),
        }
    }

    /// Inverse of `volume_fraction`. Where the profile has zero area the
    /// lowest matching ratio is returned, which keeps the inverse monotonic.
    pub fn ratio_for_volume_fraction(self, fraction: f64) -> f64 {
        let f = fraction.clamp(0.0, 1.0);
        match self {
            ShapeProfile::Prism => f,
            ShapeProfile::Cone => 1.0 - (1.0 - f).cbrt(),
            ShapeProfile::InvertedCone => f.cbrt(),
            ShapeProfile::Table(table) => table.ratio_for_volume_fraction(f),
            ShapeProfile::HorizontalCylinder | ShapeProfile::Ellipsoid => {
                let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
                for _ in 0..INVERSE_ITERATIONS {
                    let mid = 0.5 * (lo + hi);
                    if self.volume_fraction(mid) < f { lo = mid; } else { hi = mid; }
                }
                0.5 * (lo + hi)
            }
        }
    }
}

/// Piecewise-linear profile sampled at `PROFILE_SAMPLES` evenly spaced ratios.
///
/// Lookups interpolate between the two bracketing samples and never
/// extrapolate; callers clamp the ratio first.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    area_fractions: Vec<f64>,
    volume_fractions: Vec<f64>,
    /// Shape volume divided by its bounding-box volume.
    fill_factor: f64,
    /// Side outline normalized to the unit box (x in [-0.5, 0.5], y in [0, 1]).
    outline: Outline,
}

impl ProfileTable {
    /// Prism-like body whose side outline is extruded through a constant
    /// depth. Any polygon works; it is normalized into its bounding box.
    pub fn from_extruded(outline: &Outline) -> Self {
        let unit = outline.normalized();
        // Chords vanish exactly on the top and bottom vertices; sample just inside.
        let inset = 1e-9;
        let sampler = unit.clone();
        Self::from_area_fn(unit, move |y| sampler.width_at(y.clamp(inset, 1.0 - inset)))
    }

    /// Solid of revolution around the vertical axis. `radii` holds
    /// `(radius, y)` pairs in ascending `y`; they are normalized so the widest
    /// radius spans the unit box.
    pub fn from_revolved(radii: &[DVec2]) -> Self {
        let max_r = radii.iter().map(|p| p.x).fold(f64::EPSILON, f64::max);
        let y0 = radii.first().map(|p| p.y).unwrap_or(0.0);
        let y1 = radii.last().map(|p| p.y).unwrap_or(1.0);
        let span = (y1 - y0).max(f64::EPSILON);
        let unit: Vec<DVec2> = radii
            .iter()
            .map(|p| DVec2::new(0.5 * p.x / max_r, (p.y - y0) / span))
            .collect();

        let mut side: Vec<DVec2> = unit.clone();
        side.extend(unit.iter().rev().map(|p| DVec2::new(-p.x, p.y)));
        let outline = Outline::new(side);

        Self::from_area_fn(outline, move |y| {
            let r = radius_at(&unit, y);
            std::f64::consts::PI * r * r
        })
    }

    fn from_area_fn(outline: Outline, area: impl Fn(f64) -> f64) -> Self {
        let n = PROFILE_SAMPLES;
        let step = 1.0 / (n - 1) as f64;
        let areas: Vec<f64> = (0..n).map(|i| area(i as f64 * step).max(0.0)).collect();

        // Simpson per interval; exact for linear and quadratic area segments.
        let mut cumulative = Vec::with_capacity(n);
        cumulative.push(0.0);
        for i in 1..n {
            let mid = area((i as f64 - 0.5) * step).max(0.0);
            let prev = cumulative[i - 1];
            cumulative.push(prev + step / 6.0 * (areas[i - 1] + 4.0 * mid + areas[i]));
        }

        let total = cumulative[n - 1];
        if total <= 0.0 {
            return Self {
                area_fractions: vec![1.0; n],
                volume_fractions: (0..n).map(|i| i as f64 * step).collect(),
                fill_factor: 1.0,
                outline,
            };
        }

        let mut volume_fractions: Vec<f64> = cumulative.iter().map(|v| v / total).collect();
        volume_fractions[n - 1] = 1.0;
        Self {
            area_fractions: areas.iter().map(|a| a / total).collect(),
            volume_fractions,
            fill_factor: total,
            outline,
        }
    }

    pub fn fill_factor(&self) -> f64 { self.fill_factor }
    pub fn outline(&self) -> &Outline { &self.outline }

    pub fn area_fraction(&self, ratio: f64) -> f64 { lerp_samples(&self.area_fractions, ratio) }
    pub fn volume_fraction(&self, ratio: f64) -> f64 { lerp_samples(&self.volume_fractions, ratio) }

    pub fn ratio_for_volume_fraction(&self, fraction: f64) -> f64 {
        let fraction = fraction.clamp(0.0, 1.0);
        let v = &self.volume_fractions;
        let step = 1.0 / (v.len() - 1) as f64;
        let idx = v.partition_point(|x| *x < fraction);
        if idx == 0 {
            return 0.0;
        }
        if idx >= v.len() {
            return 1.0;
        }
        let (v0, v1) = (v[idx - 1], v[idx]);
        let t = if v1 > v0 { (fraction - v0) / (v1 - v0) } else { 0.0 };
        ((idx - 1) as f64 + t) * step
    }
}

#[inline]
fn lerp_samples(samples: &[f64], ratio: f64) -> f64 {
    let last = samples.len() - 1;
    let t = ratio.clamp(0.0, 1.0) * last as f64;
    let i = (t.floor() as usize).min(last - 1);
    let f = t - i as f64;
    samples[i] + (samples[i + 1] - samples[i]) * f
}

fn radius_at(points: &[DVec2], y: f64) -> f64 {
    let Some(first) = points.first() else { return 0.0; };
    if y <= first.y {
        return first.x;
    }
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        if y <= b.y {
            let span = b.y - a.y;
            return if span > 0.0 { a.x + (b.x - a.x) * (y - a.y) / span } else { b.x };
        }
    }
    points.last().map(|p| p.x).unwrap_or(0.0)
}
