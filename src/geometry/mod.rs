//! Geometric primitives shared by the parser, filter, and verifier.
//!
//! All values are double precision. A [`Rect`] does not know which
//! coordinate space it lives in; the space is part of every parameter and
//! function name that touches one (see [`crate::geometry::coords`]).

pub mod coords;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle described by its origin corner and size.
///
/// Width and height are expected to be non-negative; use
/// [`Rect::from_points`] to normalize corner pairs.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// X coordinate of the origin corner
    pub x: f64,
    /// Y coordinate of the origin corner
    pub y: f64,
    /// Width of rectangle
    pub width: f64,
    /// Height of rectangle
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a normalized rectangle from two corner points.
    ///
    /// The corners may be given in any order; the result always has
    /// non-negative width and height.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_redact::geometry::Rect;
    ///
    /// let rect = Rect::from_points(110.0, 70.0, 10.0, 20.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let x = x0.min(x1);
        let y = y0.min(y1);
        Self {
            x,
            y,
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the origin-side edge y-coordinate.
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Get the far-side edge y-coordinate.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this rectangle intersects another.
    ///
    /// The test is half-open with strict inequalities: rectangles that
    /// merely share an edge do not intersect. That is the removal rule the
    /// spatial filter relies on, so it lives here once.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_redact::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let r2 = Rect::new(50.0, 50.0, 100.0, 100.0);
    /// let touching = Rect::new(100.0, 0.0, 10.0, 10.0);
    ///
    /// assert!(r1.intersects(&r2));
    /// assert!(!r1.intersects(&touching));
    /// ```
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Check if a point lies strictly inside this rectangle.
    ///
    /// Points on an edge are outside; equality on an edge never triggers
    /// removal.
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x > self.left() && p.x < self.right() && p.y > self.top() && p.y < self.bottom()
    }

    /// Compute the union of this rectangle with another.
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.left().min(other.left());
        let y0 = self.top().min(other.top());
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::from_points(x0, y0, x1, y1)
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// Compute the area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_points_normalizes() {
        let r = Rect::from_points(110.0, 70.0, 10.0, 20.0);
        assert_eq!(r.x, 10.0);
        assert_eq!(r.y, 20.0);
        assert_eq!(r.width, 100.0);
        assert_eq!(r.height, 50.0);
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let center = r.center();
        assert_eq!(center.x, 50.0);
        assert_eq!(center.y, 25.0);
    }

    #[test]
    fn test_intersects_strict() {
        let r1 = Rect::new(0.0, 0.0, 100.0, 100.0);
        let r2 = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert!(r1.intersects(&r2));
        assert!(r2.intersects(&r1));

        // Shared edge only: not an intersection.
        let edge = Rect::new(100.0, 0.0, 50.0, 100.0);
        assert!(!r1.intersects(&edge));

        let far = Rect::new(200.0, 200.0, 10.0, 10.0);
        assert!(!r1.intersects(&far));
    }

    #[test]
    fn test_contains_point_strict() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(r.contains_point(&Point::new(50.0, 50.0)));
        assert!(!r.contains_point(&Point::new(0.0, 0.0)));
        assert!(!r.contains_point(&Point::new(100.0, 100.0)));
        assert!(!r.contains_point(&Point::new(150.0, 50.0)));
    }

    #[test]
    fn test_union() {
        let r1 = Rect::new(0.0, 0.0, 50.0, 50.0);
        let r2 = Rect::new(25.0, 25.0, 50.0, 50.0);
        let union = r1.union(&r2);
        assert_eq!(union.x, 0.0);
        assert_eq!(union.y, 0.0);
        assert_eq!(union.right(), 75.0);
        assert_eq!(union.bottom(), 75.0);
    }

    #[test]
    fn test_expand() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0).expand(5.0);
        assert_eq!(r.x, 5.0);
        assert_eq!(r.y, 5.0);
        assert_eq!(r.width, 30.0);
        assert_eq!(r.height, 30.0);
    }
}
