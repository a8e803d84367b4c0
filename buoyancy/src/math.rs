use bevy_math::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds of a point set in the side-view (x, y) plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2 {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds2 {
    pub const fn new(min: DVec2, max: DVec2) -> Self { Self { min, max } }

    pub fn from_points(points: &[DVec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(DVec2::ZERO, DVec2::ZERO);
        };
        points.iter().skip(1).fold(Self::new(*first, *first), |b, p| Self {
            min: b.min.min(*p),
            max: b.max.max(*p),
        })
    }

    pub fn width(&self) -> f64 { self.max.x - self.min.x }
    pub fn height(&self) -> f64 { self.max.y - self.min.y }

    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Closed polygon in the side-view plane. The closing edge from the last
/// vertex back to the first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    points: Vec<DVec2>,
    bounds: Bounds2,
}

impl Outline {
    pub fn new(points: Vec<DVec2>) -> Self {
        let bounds = Bounds2::from_points(&points);
        Self { points, bounds }
    }

    pub fn points(&self) -> &[DVec2] { &self.points }
    pub fn bounds(&self) -> Bounds2 { self.bounds }

    /// Even-odd point containment with a bounds check as the fast reject.
    pub fn contains_point(&self, p: DVec2) -> bool {
        if self.points.len() < 3 || !self.bounds.contains(p) {
            return false;
        }
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Total length of the horizontal chord(s) through the outline at height `y`.
    pub fn width_at(&self, y: f64) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut xs: Vec<f64> = Vec::with_capacity(4);
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > y) != (b.y > y) {
                xs.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
            }
            j = i;
        }
        xs.sort_by(f64::total_cmp);
        xs.chunks_exact(2).map(|pair| pair[1] - pair[0]).sum()
    }

    /// Maps the outline into the unit box: x in [-0.5, 0.5], y in [0, 1].
    pub fn normalized(&self) -> Outline {
        let b = self.bounds;
        let w = b.width().max(f64::EPSILON);
        let h = b.height().max(f64::EPSILON);
        let cx = 0.5 * (b.min.x + b.max.x);
        Outline::new(
            self.points
                .iter()
                .map(|p| DVec2::new((p.x - cx) / w, (p.y - b.min.y) / h))
                .collect(),
        )
    }

    /// Scales every vertex component-wise, then translates.
    pub fn transformed(&self, scale: DVec2, offset: DVec2) -> Outline {
        Outline::new(self.points.iter().map(|p| *p * scale + offset).collect())
    }
}

/// Points on an axis-aligned ellipse, counter-clockwise from +X.
pub(crate) fn ellipse_points(center: DVec2, radii: DVec2, segments: usize) -> Vec<DVec2> {
    (0..segments)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / segments as f64;
            let (s, c) = a.sin_cos();
            center + DVec2::new(c * radii.x, s * radii.y)
        })
        .collect()
}
