//! 2D geometry on normalized landmark coordinates

use serde::{Deserialize, Serialize};

/// A point in normalized (or pixel) 2D space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Convert a normalized point to canvas pixels
    pub fn to_pixels(self, width: f32, height: f32) -> Point {
        Point::new(self.x * width, self.y * height)
    }
}

/// Interior angle at `b` formed by `a-b-c`, in degrees within 0..=180.
///
/// Uses the difference of the two `atan2` headings; angles past 180 are
/// reflected back into range.
pub fn joint_angle(a: Point, b: Point, c: Point) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let angle = radians.to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Axis-aligned box in normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Smallest box containing every point, or `None` if there are none
    pub fn enclosing<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    min_x: p.x,
                    max_x: p.x,
                    min_y: p.y,
                    max_y: p.y,
                },
                Some(b) => Self {
                    min_x: b.min_x.min(p.x),
                    max_x: b.max_x.max(p.x),
                    min_y: b.min_y.min(p.y),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    pub fn expanded(self, padding: f32) -> Self {
        Self {
            min_x: self.min_x - padding,
            max_x: self.max_x + padding,
            min_y: self.min_y - padding,
            max_y: self.max_y + padding,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_joint() {
        let angle = joint_angle(Point::new(0.0, 0.0), Point::new(0.5, 0.0), Point::new(1.0, 0.0));
        assert!((angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_right_angle_joint() {
        let angle = joint_angle(Point::new(0.0, 0.0), Point::new(0.5, 0.0), Point::new(0.5, 0.5));
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_reflex_angle_is_reflected() {
        // Headings differ by 270 degrees, interior angle is 90
        let angle = joint_angle(Point::new(-1.0, 0.0), Point::new(0.0, 0.0), Point::new(0.0, -1.0));
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_distance_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.3, 0.4);
        assert!((a.distance(b) - 0.5).abs() < 1e-6);
        assert_eq!(a.midpoint(b), Point::new(0.15, 0.2));
    }

    #[test]
    fn test_bounds_padding() {
        let bounds = Bounds::enclosing([Point::new(0.4, 0.2), Point::new(0.6, 0.7)])
            .unwrap()
            .expanded(0.05);
        assert!(bounds.contains(Point::new(0.36, 0.16)));
        assert!(!bounds.contains(Point::new(0.34, 0.5)));
        assert!(Bounds::enclosing(std::iter::empty()).is_none());
    }
}
