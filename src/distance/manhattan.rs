//! Grid points and the Manhattan metric.

use serde::{Deserialize, Serialize};

/// Travel distance in grid blocks.
pub type Distance = i64;

/// An integer coordinate on the street grid.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::Point;
///
/// let p = Point::new(3, 4);
/// assert_eq!(p.x(), 3);
/// assert_eq!(p.manhattan_to(&Point::new(0, 0)), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: i64,
    y: i64,
}

impl Point {
    /// Creates a point at `(x, y)`.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// X-coordinate (street index).
    pub fn x(&self) -> i64 {
        self.x
    }

    /// Y-coordinate (avenue index).
    pub fn y(&self) -> i64 {
        self.y
    }

    /// Manhattan distance to another point.
    pub fn manhattan_to(&self, other: &Point) -> Distance {
        manhattan(*self, *other)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Manhattan (L1) distance between two grid points.
///
/// # Examples
///
/// ```
/// use u_rideshare::distance::{manhattan, Point};
///
/// assert_eq!(manhattan(Point::new(0, 0), Point::new(10, 10)), 20);
/// ```
pub fn manhattan(a: Point, b: Point) -> Distance {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Total length of a path visiting `stops` in order.
///
/// Empty and single-stop paths have length zero.
pub fn path_length<I>(stops: I) -> Distance
where
    I: IntoIterator<Item = Point>,
{
    let mut stops = stops.into_iter();
    let Some(mut prev) = stops.next() else {
        return 0;
    };
    let mut total = 0;
    for stop in stops {
        total += manhattan(prev, stop);
        prev = stop;
    }
    total
}
