use std::fmt;
use std::ops::Sub;

use serde::Serialize;

/// Integer vertex of a polyline, or the query point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    #[inline]
    pub fn new(x: i64, y: i64) -> Point {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    #[inline]
    pub fn new(x: f64, y: f64) -> PointF {
        PointF { x, y }
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Drops the fractional part of both coordinates, rounding toward zero.
    #[inline]
    pub fn truncate(&self) -> Point {
        Point::new(self.x.trunc() as i64, self.y.trunc() as i64)
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        PointF::new(p.x as f64, p.y as f64)
    }
}

impl Sub for PointF {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

pub fn distance(p: PointF, q: PointF) -> f64 {
    (q - p).norm()
}

#[inline]
pub fn y_intercept(point: PointF, slope: f64) -> f64 {
    point.y - slope * point.x
}

/// Infinite line. Vertical lines have no slope-intercept form and get their own variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Line {
    Sloped { slope: f64, intercept: f64 },
    Vertical { x: f64 },
}

impl Line {
    /// `None` when both points coincide.
    pub fn through(p1: Point, p2: Point) -> Option<Line> {
        if p1 == p2 {
            return None;
        }
        if p1.x == p2.x {
            return Some(Line::Vertical { x: p1.x as f64 });
        }
        let slope = (p2.y as f64 - p1.y as f64) / (p2.x as f64 - p1.x as f64);
        Some(Line::Sloped {
            slope,
            intercept: y_intercept(p1.into(), slope),
        })
    }

    pub fn perpendicular_through(&self, point: PointF) -> Line {
        match *self {
            Line::Vertical { .. } => Line::Sloped {
                slope: 0.0,
                intercept: point.y,
            },
            Line::Sloped { slope, .. } if slope == 0.0 => Line::Vertical { x: point.x },
            Line::Sloped { slope, .. } => {
                let slope = -1.0 / slope;
                Line::Sloped {
                    slope,
                    intercept: y_intercept(point, slope),
                }
            }
        }
    }

    pub fn y_at(&self, x: f64) -> Option<f64> {
        match *self {
            Line::Sloped { slope, intercept } => Some(slope * x + intercept),
            Line::Vertical { .. } => None,
        }
    }

    /// `None` for parallel (or identical) lines.
    pub fn intersection(&self, other: &Line) -> Option<PointF> {
        match (*self, *other) {
            (
                Line::Sloped {
                    slope: m1,
                    intercept: c1,
                },
                Line::Sloped {
                    slope: m2,
                    intercept: c2,
                },
            ) => {
                if m1 == m2 {
                    return None;
                }
                let x = (c2 - c1) / (m1 - m2);
                Some(PointF::new(x, m1 * x + c1))
            }
            (Line::Vertical { x }, line @ Line::Sloped { .. })
            | (line @ Line::Sloped { .. }, Line::Vertical { x }) => {
                line.y_at(x).map(|y| PointF::new(x, y))
            }
            (Line::Vertical { .. }, Line::Vertical { .. }) => None,
        }
    }
}

/// Whether `point` lies in the closed strip between two parallel lines.
/// Lines that are not parallel bound no strip and always yield `false`.
pub fn point_between_lines(point: PointF, line1: &Line, line2: &Line) -> bool {
    match (*line1, *line2) {
        (Line::Sloped { slope: m1, .. }, Line::Sloped { slope: m2, .. }) if m1 == m2 => {
            let (Some(y1), Some(y2)) = (line1.y_at(point.x), line2.y_at(point.x)) else {
                return false;
            };
            y1.min(y2) <= point.y && point.y <= y1.max(y2)
        }
        (Line::Vertical { x: x1 }, Line::Vertical { x: x2 }) => {
            x1.min(x2) <= point.x && point.x <= x1.max(x2)
        }
        _ => false,
    }
}

/// Whether the foot of the perpendicular dropped from `point` lands on the
/// segment `p1`-`p2`, i.e. `point` lies between the perpendiculars erected at
/// both endpoints. `None` for a zero-length segment.
pub fn is_perpendicular_to_segment(p1: Point, p2: Point, point: Point) -> Option<bool> {
    let line = Line::through(p1, p2)?;
    let at_start = line.perpendicular_through(p1.into());
    let at_end = line.perpendicular_through(p2.into());
    Some(point_between_lines(point.into(), &at_start, &at_end))
}

/// Distance from `point` to the infinite line through `p1` and `p2`.
pub fn perpendicular_distance(p1: Point, p2: Point, point: Point) -> Option<f64> {
    if p1 == p2 {
        return None;
    }
    let (x1, y1) = (p1.x as f64, p1.y as f64);
    let (x2, y2) = (p2.x as f64, p2.y as f64);
    let (x0, y0) = (point.x as f64, point.y as f64);
    let (dx, dy) = (x2 - x1, y2 - y1);

    let numerator = (dy * x0 - dx * y0 + x2 * y1 - y2 * x1).abs();
    Some(numerator / dx.hypot(dy))
}

/// Foot of the perpendicular from `point` onto the line through `p1` and `p2`.
pub fn intersection_point(p1: Point, p2: Point, point: Point) -> Option<PointF> {
    let line = Line::through(p1, p2)?;
    let perpendicular = line.perpendicular_through(point.into());
    line.intersection(&perpendicular)
}
