use serde::{Deserialize, Serialize};

use super::Positionable;

/// An axis-aligned box given by its four edges. Y grows upward, so a well
/// formed box has `l <= r` and `d <= u`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub l: f64,
    pub r: f64,
    pub u: f64,
    pub d: f64,
}

impl Bounds {
    pub const fn new(l: f64, r: f64, u: f64, d: f64) -> Self { Self { l, r, u, d } }

    /// Box of the given size centered on `(x, y)`.
    pub fn centered(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x - width / 2.0, x + width / 2.0, y + height / 2.0, y - height / 2.0)
    }

    /// The total box currently occupied by an object.
    pub fn of<P: Positionable + ?Sized>(object: &P) -> Self {
        Self::new(object.l_bound(), object.r_bound(), object.u_bound(), object.d_bound())
    }

    pub fn width(&self) -> f64 { self.r - self.l }

    pub fn height(&self) -> f64 { self.u - self.d }

    pub fn aspect(&self) -> f64 { self.width() / self.height() }

    pub fn center_x(&self) -> f64 { (self.l + self.r) / 2.0 }

    pub fn center_y(&self) -> f64 { (self.d + self.u) / 2.0 }

    /// Scales the box about its own center by independent factors.
    pub fn scaled(&self, x_factor: f64, y_factor: f64) -> Self {
        let half_w = self.width() / 2.0 * x_factor;
        let half_h = self.height() / 2.0 * y_factor;
        let (cx, cy) = (self.center_x(), self.center_y());
        Self::new(cx - half_w, cx + half_w, cy + half_h, cy - half_h)
    }

    pub fn contains(&self, other: &Bounds, tolerance: f64) -> bool {
        other.l >= self.l - tolerance
            && other.r <= self.r + tolerance
            && other.u <= self.u + tolerance
            && other.d >= self.d - tolerance
    }

    pub fn contains_point(&self, x: f64, y: f64, tolerance: f64) -> bool {
        x >= self.l - tolerance
            && x <= self.r + tolerance
            && y <= self.u + tolerance
            && y >= self.d - tolerance
    }

    /// True when the interiors overlap. Shared edges do not count.
    pub fn intersects(&self, other: &Bounds, tolerance: f64) -> bool {
        self.l < other.r - tolerance
            && other.l < self.r - tolerance
            && self.d < other.u - tolerance
            && other.d < self.u - tolerance
    }
}
