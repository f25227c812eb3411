//! 2D geometry primitives for key placement and hit-testing.
//!
//! Coordinates follow screen conventions: the origin is the top-left corner and
//! `y` grows downward. Rotations are expressed in tenths of a degree and
//! positive angles turn clockwise on screen.

use serde::{Deserialize, Serialize};

/// Number of angle units in a full turn (tenths of a degree).
pub const FULL_TURN: i32 = 3600;

const QUARTER_TURN: u16 = 900;
const HALF_TURN: u16 = 1800;
const THREE_QUARTER_TURN: u16 = 2700;

/// Discrete rotation angle in tenths of a degree, normalized to `[0, 3600)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Angle(u16);

impl Angle {
    /// No rotation.
    pub const ZERO: Self = Self(0);

    /// Creates an angle from tenths of a degree. Any integer is accepted and
    /// wrapped into a single turn, so `3600` and `-3600` both become zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn from_tenths(tenths: i32) -> Self {
        Self(tenths.rem_euclid(FULL_TURN) as u16)
    }

    /// Normalized value in tenths of a degree.
    #[must_use]
    pub const fn tenths(self) -> u16 {
        self.0
    }

    /// Angle in degrees.
    #[must_use]
    pub fn degrees(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Angle in radians.
    #[must_use]
    pub fn radians(self) -> f64 {
        self.degrees().to_radians()
    }

    /// Returns `true` when the angle is a whole number of turns.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The angle that undoes this rotation.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn inverse(self) -> Self {
        Self::from_tenths(-(self.0 as i32))
    }
}

impl std::ops::Add for Angle {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::from_tenths(i32::from(self.0) + i32::from(other.0))
    }
}

impl From<i32> for Angle {
    fn from(tenths: i32) -> Self {
        Self::from_tenths(tenths)
    }
}

impl From<Angle> for i32 {
    fn from(angle: Angle) -> Self {
        Self::from(angle.0)
    }
}

/// 2D vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates the point about the origin.
    ///
    /// A zero angle (including whole turns) returns the point unchanged, and
    /// quarter turns are exact.
    #[must_use]
    pub fn rotate(self, angle: Angle) -> Self {
        match angle.tenths() {
            0 => self,
            QUARTER_TURN => Self::new(-self.y, self.x),
            HALF_TURN => Self::new(-self.x, -self.y),
            THREE_QUARTER_TURN => Self::new(self.y, -self.x),
            _ => {
                let (sin, cos) = angle.radians().sin_cos();
                Self::new(
                    self.x.mul_add(cos, -(self.y * sin)),
                    self.x.mul_add(sin, self.y * cos),
                )
            }
        }
    }

    /// Moves the point by the given offsets.
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    fn dot(self, other: Self) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    fn cross(self, other: Self) -> f64 {
        self.x.mul_add(other.y, -(self.y * other.x))
    }

    fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Axis-aligned rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// X coordinate of the top left point
    pub x: f64,
    /// Y coordinate of the top left point
    pub y: f64,
    /// Width of the box
    pub width: f64,
    /// Height of the box
    pub height: f64,
}

impl Bounds {
    /// Creates a new box. Negative extents are clamped to zero.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Zero-area box at the given position.
    #[must_use]
    pub const fn empty_at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// The longer of width and height, used to scale labels and icons.
    #[must_use]
    pub fn long_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Top-left origin of the box.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The same extent placed at the origin.
    #[must_use]
    pub const fn local(&self) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        }
    }

    /// Corners in clockwise order starting at the top left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        [
            Point::new(self.x, self.y),
            Point::new(right, self.y),
            Point::new(right, bottom),
            Point::new(self.x, bottom),
        ]
    }

    /// Returns `true` if the point lies inside the box or on its edge.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Axis-aligned box around this rectangle rotated about the origin.
    #[must_use]
    pub fn rotated(&self, angle: Angle) -> Self {
        if angle.is_zero() {
            return *self;
        }
        let corners = self.corners().map(|c| c.rotate(angle));
        Self::from_points(corners).unwrap_or(*self)
    }

    /// Moves the box by the given offsets.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Rounded polygon describing a key's shape, in key-local coordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Outline {
    /// Radius of the rounded corners
    pub corner_radius: f64,
    /// Polygon vertices in drawing order
    pub points: Vec<Point>,
}

impl Outline {
    /// Creates an outline. A negative radius is treated as square corners.
    #[must_use]
    pub fn new(corner_radius: f64, points: Vec<Point>) -> Self {
        Self {
            corner_radius: corner_radius.max(0.0),
            points,
        }
    }

    /// Rectangle outline with its top-left corner at the origin.
    #[must_use]
    pub fn rectangle(width: f64, height: f64, corner_radius: f64) -> Self {
        Self::new(corner_radius, Bounds::new(0.0, 0.0, width, height).corners().to_vec())
    }

    /// Number of vertices.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Box around all vertices, `None` when the outline has no points.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.points.iter().copied())
    }

    /// Returns `true` if the point lies inside the rounded polygon.
    ///
    /// The polygon itself is tested with the even-odd rule. At each convex
    /// vertex the sliver between the vertex and its corner arc is excluded.
    /// The arc radius is limited so both tangent points stay within the first
    /// half of the adjacent edges.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        if self.points.len() < 3 || !self.polygon_contains(point) {
            return false;
        }
        if self.corner_radius <= 0.0 {
            return true;
        }

        let orientation = self.signed_area().signum();
        let n = self.points.len();
        (0..n).all(|i| {
            let prev = self.points[(i + n - 1) % n];
            let vertex = self.points[i];
            let next = self.points[(i + 1) % n];
            !self.in_corner_cutoff(prev, vertex, next, orientation, point)
        })
    }

    fn polygon_contains(&self, point: Point) -> bool {
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if on_segment(a, b, point) {
                return true;
            }
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    fn signed_area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].cross(self.points[(i + 1) % n]))
            .sum::<f64>()
            / 2.0
    }

    fn in_corner_cutoff(
        &self,
        prev: Point,
        vertex: Point,
        next: Point,
        orientation: f64,
        point: Point,
    ) -> bool {
        // Only convex corners are rounded inward.
        let turn = vertex.sub(prev).cross(next.sub(vertex));
        if turn * orientation <= 0.0 {
            return false;
        }

        let to_prev = prev.sub(vertex);
        let to_next = next.sub(vertex);
        let (len_prev, len_next) = (to_prev.length(), to_next.length());
        if len_prev == 0.0 || len_next == 0.0 {
            return false;
        }
        let u_prev = to_prev.scale(1.0 / len_prev);
        let u_next = to_next.scale(1.0 / len_next);

        let half = u_prev.dot(u_next).clamp(-1.0, 1.0).acos() / 2.0;
        if half <= f64::EPSILON {
            return false;
        }

        let mut tangent = self.corner_radius / half.tan();
        let mut radius = self.corner_radius;
        let max_tangent = len_prev.min(len_next) / 2.0;
        if tangent > max_tangent {
            tangent = max_tangent;
            radius = tangent * half.tan();
        }

        let bisector = Point::new(u_prev.x + u_next.x, u_prev.y + u_next.y);
        let bisector = bisector.scale(1.0 / bisector.length());
        let center = vertex.translate(
            bisector.x * radius / half.sin(),
            bisector.y * radius / half.sin(),
        );
        let t_prev = vertex.translate(u_prev.x * tangent, u_prev.y * tangent);
        let t_next = vertex.translate(u_next.x * tangent, u_next.y * tangent);

        convex_contains(&[vertex, t_prev, center, t_next], point)
            && point.distance(center) > radius
    }
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let cross = b.sub(a).cross(p.sub(a));
    if cross.abs() > 1e-9 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Containment in a convex polygon given in either winding, edges included.
fn convex_contains(polygon: &[Point], p: Point) -> bool {
    const EPSILON: f64 = 1e-9;
    let n = polygon.len();
    let crosses = (0..n).map(|i| {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        b.sub(a).cross(p.sub(a))
    });
    let (mut has_neg, mut has_pos) = (false, false);
    for cross in crosses {
        has_neg |= cross < -EPSILON;
        has_pos |= cross > EPSILON;
    }
    !(has_neg && has_pos)
}
