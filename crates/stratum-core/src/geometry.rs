//! Geometric primitives for layout computation.
//!
//! Planar partitioning works on [`Rect`] footprints; stratification lifts the
//! result into 3D with [`Point3`]/[`Size3`] pairs, and camera framing consumes
//! the aggregate [`BoundingBox`].

use serde::Serialize;

/// An axis-aligned planar rectangle with minimum and maximum coordinates.
///
/// Used for partition footprints: the partitioner subdivides a canvas
/// rectangle into nested child rectangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Rect {
    /// Creates a rectangle from its minimum and maximum corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a rectangle from an origin corner and side lengths.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Returns the minimum x-coordinate.
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate.
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate.
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate.
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the width of the rectangle.
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the rectangle.
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the planar area.
    pub fn area(self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Returns the center as an `(x, y)` pair.
    pub fn center(self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Shrinks the rectangle by `amount` on every side.
    ///
    /// A rectangle too small to absorb the inset collapses to its center
    /// instead of inverting.
    pub fn inset(self, amount: f64) -> Self {
        let (cx, cy) = self.center();
        Self {
            min_x: (self.min_x + amount).min(cx),
            min_y: (self.min_y + amount).min(cy),
            max_x: (self.max_x - amount).max(cx),
            max_y: (self.max_y - amount).max(cy),
        }
    }

    /// Shrinks only the top edge by `amount`, clamped to the center.
    pub fn inset_top(self, amount: f64) -> Self {
        let (_, cy) = self.center();
        Self {
            min_y: (self.min_y + amount).min(cy),
            ..self
        }
    }

    /// Scales the rectangle about its own center by `factor`.
    pub fn scale_about_center(self, factor: f64) -> Self {
        let (cx, cy) = self.center();
        let half_w = self.width() / 2.0 * factor;
        let half_h = self.height() / 2.0 * factor;
        Self {
            min_x: cx - half_w,
            min_y: cy - half_h,
            max_x: cx + half_w,
            max_y: cy + half_h,
        }
    }

    /// Returns true if this rectangle and `other` share interior area.
    pub fn intersects(self, other: Rect) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// Returns true if `other` lies entirely within this rectangle.
    pub fn contains(self, other: Rect) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }
}

/// A point in 3D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Point3 {
    /// Creates a new point with the specified coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the x-coordinate.
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate (the vertical axis).
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns the z-coordinate.
    pub fn z(self) -> f64 {
        self.z
    }
}

/// Extents of a box in 3D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size3 {
    width: f64,
    height: f64,
    depth: f64,
}

impl Size3 {
    /// Creates a new size from width (x), height (y), and depth (z).
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Returns the extent along the x-axis.
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the extent along the y-axis (vertical).
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns the extent along the z-axis.
    pub fn depth(self) -> f64 {
        self.depth
    }
}

/// An axis-aligned 3D bounding volume.
///
/// Used to frame a viewing camera around all positioned nodes. The empty
/// case is represented by [`BoundingBox::zero`], never by an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    min_x: f64,
    min_y: f64,
    min_z: f64,
    max_x: f64,
    max_y: f64,
    max_z: f64,
}

impl BoundingBox {
    /// The canonical zero box: all extents collapsed at the origin.
    pub fn zero() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            min_z: 0.0,
            max_x: 0.0,
            max_y: 0.0,
            max_z: 0.0,
        }
    }

    /// Creates a bounding box that exactly encloses one positioned box.
    pub fn from_box(center: Point3, size: Size3) -> Self {
        let half_w = size.width() / 2.0;
        let half_h = size.height() / 2.0;
        let half_d = size.depth() / 2.0;
        Self {
            min_x: center.x() - half_w,
            min_y: center.y() - half_h,
            min_z: center.z() - half_d,
            max_x: center.x() + half_w,
            max_y: center.y() + half_h,
            max_z: center.z() + half_d,
        }
    }

    /// Expands this box so it also encloses the given positioned box.
    pub fn include(self, center: Point3, size: Size3) -> Self {
        self.merge(Self::from_box(center, size))
    }

    /// Merges two boxes into the smallest box containing both.
    pub fn merge(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            min_z: self.min_z.min(other.min_z),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
            max_z: self.max_z.max(other.max_z),
        }
    }

    /// Returns the geometric center of the box.
    pub fn center(self) -> Point3 {
        Point3::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Returns the extents of the box.
    pub fn size(self) -> Size3 {
        Size3::new(
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        )
    }

    /// Returns the minimum corner.
    pub fn min(self) -> Point3 {
        Point3::new(self.min_x, self.min_y, self.min_z)
    }

    /// Returns the maximum corner.
    pub fn max(self) -> Point3 {
        Point3::new(self.max_x, self.max_y, self.max_z)
    }

    /// Returns true if the box has no extent on any axis.
    pub fn is_zero(self) -> bool {
        self.size() == Size3::default()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}
