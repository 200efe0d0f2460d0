//! This module contains [`ControlPolygon`], the ordered set of control points that an editor builds up
//! by clicking and dragging, and [`Snapshot`], the frozen copy of it that the rest of the crate
//! works from. The editor owns the polygon and everything about how it is manipulated (which point
//! is being dragged, whether the mouse is down, and so on): the only thing the curve and
//! chromaticity computations ever see is a finished snapshot.
//!
//! [`ControlPolygon`]: struct.ControlPolygon.html
//! [`Snapshot`]: struct.Snapshot.html

use std::error::Error;
use std::fmt;

use geo::Point;

/// The distance, in canvas units, within which a click picks up an existing control point. This
/// is measured separately on each axis, so the pickable area is a square.
pub const PICK_RADIUS: f64 = 5.0;

/// The degree a new polygon starts with when none is given: a cubic curve.
pub const DEFAULT_DEGREE: usize = 3;

/// Errors from editing a [`ControlPolygon`].
///
/// [`ControlPolygon`]: struct.ControlPolygon.html
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PolygonError {
    /// The degree of a curve must be at least 1.
    InvalidDegree,
    /// The polygon already has `degree + 1` points.
    Full {
        /// The maximum number of points for the current degree.
        capacity: usize,
    },
    /// No control point exists at the given index.
    OutOfRange {
        /// The index that was asked for.
        index: usize,
        /// The number of control points.
        len: usize,
    },
}

impl fmt::Display for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PolygonError::InvalidDegree => write!(f, "curve degree must be a whole number of at least 1"),
            PolygonError::Full { capacity } => {
                write!(f, "control polygon is full ({} points)", capacity)
            }
            PolygonError::OutOfRange { index, len } => write!(
                f,
                "control point {} does not exist (polygon has {} points)",
                index, len
            ),
        }
    }
}

impl Error for PolygonError {}

/// The control points of a Bézier curve, in curve order: the first point is where the curve starts
/// and the last point is where it ends. Points can only be appended while there are fewer than
/// `degree + 1` of them. Lowering the degree never throws away points that are already there.
///
/// Every successful edit bumps a revision counter, which travels with each [`Snapshot`] so that
/// results computed from an old version of the polygon can be recognized and thrown away.
///
/// # Example
/// ```
/// # use chromacurve::Point;
/// # use chromacurve::polygon::{ControlPolygon, PolygonError};
/// let mut polygon = ControlPolygon::new(1).unwrap();
/// polygon.push(Point::new(50., 300.)).unwrap();
/// polygon.push(Point::new(450., 80.)).unwrap();
/// assert_eq!(polygon.push(Point::new(0., 0.)), Err(PolygonError::Full { capacity: 2 }));
/// // grab the second point and drag it
/// let picked = polygon.hit_test(Point::new(452., 77.)).unwrap();
/// polygon.replace(picked, Point::new(440., 60.)).unwrap();
/// assert_eq!(polygon.points()[1], Point::new(440., 60.));
/// ```
///
/// [`Snapshot`]: struct.Snapshot.html
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPolygon {
    points: Vec<Point<f64>>,
    degree: usize,
    revision: u64,
}

impl Default for ControlPolygon {
    fn default() -> ControlPolygon {
        ControlPolygon {
            points: Vec::with_capacity(DEFAULT_DEGREE + 1),
            degree: DEFAULT_DEGREE,
            revision: 0,
        }
    }
}

impl ControlPolygon {
    /// Creates an empty polygon for a curve of the given degree.
    ///
    /// # Errors
    /// Returns `PolygonError::InvalidDegree` if `degree` is 0.
    pub fn new(degree: usize) -> Result<ControlPolygon, PolygonError> {
        if degree == 0 {
            Err(PolygonError::InvalidDegree)
        } else {
            Ok(ControlPolygon {
                points: Vec::with_capacity(degree + 1),
                degree,
                revision: 0,
            })
        }
    }
    /// The control points, in order.
    pub fn points(&self) -> &[Point<f64>] {
        &self.points
    }
    /// The number of control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }
    /// Returns `true` if there are no control points yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    /// The curve degree this polygon is being built for.
    pub fn degree(&self) -> usize {
        self.degree
    }
    /// The most points this polygon will accept: `degree + 1`.
    pub fn capacity(&self) -> usize {
        self.degree + 1
    }
    /// Incremented on every successful change. Two snapshots with the same revision hold the same
    /// points.
    pub fn revision(&self) -> u64 {
        self.revision
    }
    /// Returns `true` if the polygon describes a curve, i.e., has at least two points.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Appends a control point, returning its index.
    ///
    /// # Errors
    /// Returns `PolygonError::Full` if there are already `degree + 1` points.
    pub fn push(&mut self, point: Point<f64>) -> Result<usize, PolygonError> {
        if self.points.len() >= self.capacity() {
            return Err(PolygonError::Full {
                capacity: self.capacity(),
            });
        }
        self.points.push(point);
        self.revision += 1;
        Ok(self.points.len() - 1)
    }

    /// Moves the control point at `index` to `point`.
    ///
    /// # Errors
    /// Returns `PolygonError::OutOfRange` if there is no point at `index`.
    pub fn replace(&mut self, index: usize, point: Point<f64>) -> Result<(), PolygonError> {
        let len = self.points.len();
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                self.revision += 1;
                Ok(())
            }
            None => Err(PolygonError::OutOfRange { index, len }),
        }
    }

    /// Changes the curve degree.
    ///
    /// # Errors
    /// Returns `PolygonError::InvalidDegree` for 0, leaving the degree as it was.
    pub fn set_degree(&mut self, degree: usize) -> Result<(), PolygonError> {
        if degree == 0 {
            return Err(PolygonError::InvalidDegree);
        }
        if degree != self.degree {
            self.degree = degree;
            self.revision += 1;
        }
        Ok(())
    }

    /// Changes the curve degree from user-typed text, such as the contents of a text box. Surrounding
    /// whitespace is allowed; anything that isn't a whole number of at least 1 is rejected and the
    /// degree is left unchanged.
    pub fn set_degree_str(&mut self, text: &str) -> Result<(), PolygonError> {
        let degree: usize = text.trim().parse().map_err(|_| PolygonError::InvalidDegree)?;
        self.set_degree(degree)
    }

    /// Finds the first control point within [`PICK_RADIUS`] of `point` on both axes.
    ///
    /// [`PICK_RADIUS`]: constant.PICK_RADIUS.html
    pub fn hit_test(&self, point: Point<f64>) -> Option<usize> {
        self.points.iter().position(|p| {
            (point.x() - p.x()).abs() < PICK_RADIUS && (point.y() - p.y()).abs() < PICK_RADIUS
        })
    }

    /// Removes every control point. The degree is kept.
    pub fn clear(&mut self) {
        if !self.points.is_empty() {
            self.points.clear();
            self.revision += 1;
        }
    }

    /// Freezes the current state of the polygon.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            points: self.points.clone(),
        }
    }
}

/// An immutable copy of a [`ControlPolygon`] at a given revision.
///
/// [`ControlPolygon`]: struct.ControlPolygon.html
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    revision: u64,
    points: Vec<Point<f64>>,
}

impl Snapshot {
    /// Creates a snapshot directly from a list of points, for callers that keep their own control
    /// points.
    pub fn new(revision: u64, points: Vec<Point<f64>>) -> Snapshot {
        Snapshot { revision, points }
    }
    /// The revision of the polygon this was taken from.
    pub fn revision(&self) -> u64 {
        self.revision
    }
    /// The control points.
    pub fn points(&self) -> &[Point<f64>] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_degree_limits_push() {
        let mut polygon = ControlPolygon::default();
        assert_eq!(polygon.degree(), 3);
        for i in 0..4 {
            assert_eq!(polygon.push(Point::new(i as f64, 0.)), Ok(i));
        }
        assert_eq!(
            polygon.push(Point::new(9., 9.)),
            Err(PolygonError::Full { capacity: 4 })
        );
        assert_eq!(polygon.len(), 4);
    }

    #[test]
    fn test_lowering_degree_keeps_points() {
        let mut polygon = ControlPolygon::new(4).unwrap();
        for i in 0..4 {
            polygon.push(Point::new(i as f64, i as f64)).unwrap();
        }
        polygon.set_degree(1).unwrap();
        assert_eq!(polygon.len(), 4);
        assert!(polygon.push(Point::new(0., 0.)).is_err());
        polygon.set_degree(5).unwrap();
        assert_eq!(polygon.push(Point::new(0., 0.)), Ok(4));
    }

    #[test]
    fn test_degree_text() {
        let mut polygon = ControlPolygon::default();
        assert!(polygon.set_degree_str(" 5 ").is_ok());
        assert_eq!(polygon.degree(), 5);
        assert_eq!(polygon.set_degree_str("0"), Err(PolygonError::InvalidDegree));
        assert_eq!(polygon.set_degree_str("-2"), Err(PolygonError::InvalidDegree));
        assert_eq!(polygon.set_degree_str("three"), Err(PolygonError::InvalidDegree));
        assert_eq!(polygon.set_degree_str(""), Err(PolygonError::InvalidDegree));
        assert_eq!(polygon.degree(), 5);
        assert_eq!(ControlPolygon::new(0), Err(PolygonError::InvalidDegree));
    }

    #[test]
    fn test_hit_test() {
        let mut polygon = ControlPolygon::default();
        polygon.push(Point::new(100., 100.)).unwrap();
        polygon.push(Point::new(103., 103.)).unwrap();
        // the first match wins even when a later point is closer
        assert_eq!(polygon.hit_test(Point::new(102., 102.)), Some(0));
        assert_eq!(polygon.hit_test(Point::new(107., 107.)), Some(1));
        // the radius is exclusive
        assert_eq!(polygon.hit_test(Point::new(95., 100.)), None);
        assert_eq!(polygon.hit_test(Point::new(200., 200.)), None);
    }

    #[test]
    fn test_replace_and_revision() {
        let mut polygon = ControlPolygon::default();
        assert_eq!(polygon.revision(), 0);
        polygon.push(Point::new(1., 1.)).unwrap();
        polygon.push(Point::new(2., 2.)).unwrap();
        let before = polygon.snapshot();
        polygon.replace(1, Point::new(5., 6.)).unwrap();
        assert_eq!(
            polygon.replace(2, Point::new(0., 0.)),
            Err(PolygonError::OutOfRange { index: 2, len: 2 })
        );
        let after = polygon.snapshot();
        assert_eq!(before.revision(), 2);
        assert_eq!(after.revision(), 3);
        assert_eq!(before.points()[1], Point::new(2., 2.));
        assert_eq!(after.points()[1], Point::new(5., 6.));
    }

    #[test]
    fn test_clear() {
        let mut polygon = ControlPolygon::new(2).unwrap();
        polygon.push(Point::new(1., 1.)).unwrap();
        polygon.push(Point::new(2., 1.)).unwrap();
        assert!(polygon.is_drawable());
        polygon.clear();
        assert!(polygon.is_empty());
        assert!(!polygon.is_drawable());
        assert_eq!(polygon.degree(), 2);
        assert_eq!(polygon.revision(), 3);
    }
}
