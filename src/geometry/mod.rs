//! Small extensions over [`geo_types`] geometry used by every generator:
//! a vector-ish view of [`geo_types::Point`] and a running bounding box.

use geo_types::{coord, CoordNum, Point, Rect};
use num_traits::real::Real;

/// Treats a [`geo_types::Point`] as a displacement vector. Addition,
/// subtraction and scalar multiply/divide come from `geo_types` itself and are
/// only defined between compatible types, so there is no runtime
/// "not a vector" failure mode to guard against.
pub trait VectorOps<T: CoordNum> {
    /// Scalar length of the vector.
    fn magnitude(&self) -> T;

    /// Squared length. Cheaper than [`VectorOps::magnitude`] when only
    /// comparisons are needed.
    fn magnitude_squared(&self) -> T;

    /// Distance to another point.
    fn dist(&self, other: &Point<T>) -> T;
}

impl<T> VectorOps<T> for Point<T>
where
    T: CoordNum,
    T: Real,
{
    fn magnitude(&self) -> T {
        self.magnitude_squared().sqrt()
    }

    fn magnitude_squared(&self) -> T {
        self.x().powi(2) + self.y().powi(2)
    }

    fn dist(&self, other: &Point<T>) -> T {
        (*self - *other).magnitude()
    }
}

/// Running min/max bounding box, grown one point at a time as a turtle walks
/// or an IFS generation is rebuilt. Starts out empty (inverted sentinels) and
/// stays cheap to update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Bounds {
    pub fn empty() -> Self {
        Bounds {
            x_min: f64::MAX,
            y_min: f64::MAX,
            x_max: f64::MIN,
            y_max: f64::MIN,
        }
    }

    /// A box containing exactly one point.
    pub fn of(point: Point<f64>) -> Self {
        let mut bounds = Bounds::empty();
        bounds.expand(point);
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    /// Grow the box to include `point`.
    pub fn expand(&mut self, point: Point<f64>) {
        self.x_min = self.x_min.min(point.x());
        self.y_min = self.y_min.min(point.y());
        self.x_max = self.x_max.max(point.x());
        self.y_max = self.y_max.max(point.y());
    }

    /// Grow the box to include an entire rectangle.
    pub fn expand_rect(&mut self, rect: &Rect<f64>) {
        self.expand(Point::new(rect.min().x, rect.min().y));
        self.expand(Point::new(rect.max().x, rect.max().y));
    }

    /// Centroid of the box. The origin for an empty box, which keeps
    /// centering a no-op instead of a NaN farm.
    pub fn center(&self) -> Point<f64> {
        if self.is_empty() {
            return Point::new(0.0, 0.0);
        }
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.x_max - self.x_min
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.y_max - self.y_min
        }
    }

    /// Shift the box in place. Exact for translations, so callers that moved
    /// their geometry by a constant offset can move the cached box with it.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        if self.is_empty() {
            return;
        }
        self.x_min += dx;
        self.x_max += dx;
        self.y_min += dy;
        self.y_max += dy;
    }

    /// The box as a [`geo_types::Rect`], or None when nothing was recorded.
    pub fn to_rect(&self) -> Option<Rect<f64>> {
        if self.is_empty() {
            return None;
        }
        Some(Rect::new(
            coord! {x: self.x_min, y: self.y_min},
            coord! {x: self.x_max, y: self.y_max},
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_add_then_subtract_roundtrip() {
        let v1 = Point::new(3.5f64, -2.0f64);
        let v2 = Point::new(-1.25f64, 7.0f64);
        let back = (v1 + v2) - v2;
        assert!(back.dist(&v1) < 1e-12);
    }

    #[test]
    fn test_scale_distributes_over_addition() {
        let v1 = Point::new(1.5f64, 2.0f64);
        let v2 = Point::new(-0.5f64, 4.0f64);
        let k = 3.25f64;
        let lhs = (v1 + v2) * k;
        let rhs = v1 * k + v2 * k;
        assert!(lhs.dist(&rhs) < 1e-12);
    }

    #[test]
    fn test_magnitude() {
        let v = Point::new(3.0f64, 4.0f64);
        assert!((v.magnitude() - 5.0).abs() < 1e-12);
        assert!((v.magnitude_squared() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_divide_is_inverse_scale() {
        let v = Point::new(8.0f64, -6.0f64);
        let scaled = (v / 4.0) * 4.0;
        assert!(scaled.dist(&v) < 1e-12);
    }

    #[test]
    fn test_bounds_grow_and_center() {
        let mut bounds = Bounds::empty();
        assert!(bounds.is_empty());
        bounds.expand(Point::new(0.0, 0.0));
        bounds.expand(Point::new(10.0, -4.0));
        bounds.expand(Point::new(2.0, 6.0));
        assert!(!bounds.is_empty());
        assert!((bounds.width() - 10.0).abs() < 1e-12);
        assert!((bounds.height() - 10.0).abs() < 1e-12);
        let c = bounds.center();
        assert!((c.x() - 5.0).abs() < 1e-12);
        assert!((c.y() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_translate() {
        let mut bounds = Bounds::of(Point::new(1.0, 1.0));
        bounds.expand(Point::new(3.0, 5.0));
        bounds.translate(-1.0, 2.0);
        let c = bounds.center();
        assert!((c.x() - 1.0).abs() < 1e-12);
        assert!((c.y() - 5.0).abs() < 1e-12);
        // Size is translation invariant.
        assert!((bounds.width() - 2.0).abs() < 1e-12);
        assert!((bounds.height() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_bounds_center_is_origin() {
        let bounds = Bounds::empty();
        assert_eq!(bounds.center(), Point::new(0.0, 0.0));
        assert!(bounds.to_rect().is_none());
    }
}
