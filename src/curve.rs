//! This module evaluates and samples Bézier curves. A curve of degree N is given by N + 1 control
//! points, and every point on it is found by repeated linear interpolation between neighboring
//! control points (de Casteljau's algorithm). This is O(N²) per point, which is nothing for the
//! handful of points a person can place by hand, and it is numerically far better behaved than
//! expanding the Bernstein polynomials directly.

use std::error::Error;
use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use geo::{LineString, Point};

/// Errors that can occur when sampling a curve from a set of control points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CurveError {
    /// A curve needs at least two control points: one point has no direction to interpolate in.
    TooFewControlPoints {
        /// How many control points were actually given.
        found: usize,
    },
    /// A curve sampled with zero steps has no points at all.
    NoSteps,
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CurveError::TooFewControlPoints { found } => write!(
                f,
                "a curve needs at least 2 control points, but {} were given",
                found
            ),
            CurveError::NoSteps => write!(f, "a curve cannot be sampled with 0 steps"),
        }
    }
}

impl Error for CurveError {}

/// Linear interpolation between two points: `t = 0` gives `a`, `t = 1` gives `b`.
fn lerp(a: Point<f64>, b: Point<f64>, t: f64) -> Point<f64> {
    Point::new(
        (1.0 - t) * a.x() + t * b.x(),
        (1.0 - t) * a.y() + t * b.y(),
    )
}

/// Evaluates the Bézier curve with the given control points at the parameter `t`. The first control
/// point is the start of the curve (`t = 0`) and the last one is the end (`t = 1`). Values of `t`
/// outside of [0, 1] are not rejected: they extrapolate the same polynomial.
///
/// The control points are copied before reduction, so the slice is never modified.
///
/// # Panics
/// Panics if fewer than two control points are given. Use [`sample`] for a checked alternative.
///
/// # Example
/// ```
/// # use chromacurve::Point;
/// # use chromacurve::curve::bezier_point;
/// let points = [Point::new(0., 0.), Point::new(50., 100.), Point::new(100., 0.)];
/// let mid = bezier_point(&points, 0.5);
/// assert!((mid.x() - 50.).abs() <= 1e-10);
/// assert!((mid.y() - 50.).abs() <= 1e-10);
/// ```
///
/// [`sample`]: fn.sample.html
pub fn bezier_point(points: &[Point<f64>], t: f64) -> Point<f64> {
    assert!(
        points.len() >= 2,
        "Bézier evaluation needs at least 2 control points, got {}",
        points.len()
    );
    let mut work = points.to_vec();
    // each round shrinks the live prefix of `work` by one
    for round in 1..points.len() {
        for i in 0..points.len() - round {
            work[i] = lerp(work[i], work[i + 1], t);
        }
    }
    work[0]
}

/// A lazy iterator over the points of a sampled Bézier curve, at `t = i / steps` for `i` from 1 to
/// `steps` inclusive. The start of the curve (`t = 0`) is not produced: it is just the
/// first control point, which callers already have.
///
/// Every point is computed on demand and nothing is cached, so cloning a fresh `Samples` (or
/// calling [`samples`] again) restarts the sequence from scratch.
///
/// [`samples`]: fn.samples.html
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    points: &'a [Point<f64>],
    steps: usize,
    next: usize,
}

/// Creates a lazy sampler for the given control points. See [`Samples`] for details.
///
/// # Errors
/// Returns [`CurveError::TooFewControlPoints`] if there are fewer than two control points, and
/// [`CurveError::NoSteps`] if `steps` is 0.
///
/// [`Samples`]: struct.Samples.html
/// [`CurveError::TooFewControlPoints`]: enum.CurveError.html#variant.TooFewControlPoints
/// [`CurveError::NoSteps`]: enum.CurveError.html#variant.NoSteps
pub fn samples(points: &[Point<f64>], steps: usize) -> Result<Samples, CurveError> {
    if points.len() < 2 {
        Err(CurveError::TooFewControlPoints {
            found: points.len(),
        })
    } else if steps == 0 {
        Err(CurveError::NoSteps)
    } else {
        Ok(Samples {
            points,
            steps,
            next: 1,
        })
    }
}

impl<'a> Iterator for Samples<'a> {
    type Item = Point<f64>;

    fn next(&mut self) -> Option<Point<f64>> {
        if self.next > self.steps {
            return None;
        }
        let t = self.next as f64 / self.steps as f64;
        self.next += 1;
        Some(bezier_point(self.points, t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.steps + 1).saturating_sub(self.next);
        (left, Some(left))
    }
}

impl<'a> ExactSizeIterator for Samples<'a> {}

impl<'a> FusedIterator for Samples<'a> {}

/// A polyline approximation of a Bézier curve: exactly `steps` points, plus the start of the curve
/// kept on the side so that a renderer can draw the first segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    start: Point<f64>,
    points: Vec<Point<f64>>,
}

impl SampledCurve {
    /// The start of the curve, which is always the first control point. This is not one of the
    /// sampled points.
    pub fn start(&self) -> Point<f64> {
        self.start
    }
    /// The sampled points, in order of increasing `t`. The last one is the end of the curve.
    pub fn points(&self) -> &[Point<f64>] {
        &self.points
    }
    /// The number of sampled points: always the step count the curve was sampled with.
    pub fn len(&self) -> usize {
        self.points.len()
    }
    /// Never true for a curve built by [`sample`], which rejects 0 steps.
    ///
    /// [`sample`]: fn.sample.html
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    /// Iterates over the sampled points.
    pub fn iter(&self) -> slice::Iter<Point<f64>> {
        self.points.iter()
    }
    /// The full polyline for drawing: the start of the curve followed by every sampled point, so
    /// that `polyline().lines()` yields exactly one segment per sample.
    pub fn polyline(&self) -> LineString<f64> {
        let mut line = Vec::with_capacity(self.points.len() + 1);
        line.push(self.start);
        line.extend_from_slice(&self.points);
        LineString::from(line)
    }
}

impl<'a> IntoIterator for &'a SampledCurve {
    type Item = &'a Point<f64>;
    type IntoIter = slice::Iter<'a, Point<f64>>;

    fn into_iter(self) -> slice::Iter<'a, Point<f64>> {
        self.points.iter()
    }
}

/// Samples the Bézier curve with the given control points into a [`SampledCurve`] of exactly
/// `steps` points. This always recomputes everything from the control points.
///
/// # Errors
/// The same as [`samples`]: too few control points, or 0 steps.
///
/// # Example
/// ```
/// # use chromacurve::Point;
/// # use chromacurve::curve::sample;
/// let points = [Point::new(0., 0.), Point::new(10., 20.), Point::new(30., 0.), Point::new(40., 5.)];
/// let curve = sample(&points, 100).unwrap();
/// assert_eq!(curve.len(), 100);
/// assert_eq!(curve.start(), points[0]);
/// ```
///
/// [`SampledCurve`]: struct.SampledCurve.html
/// [`samples`]: fn.samples.html
pub fn sample(points: &[Point<f64>], steps: usize) -> Result<SampledCurve, CurveError> {
    let sampled = samples(points, steps)?.collect();
    Ok(SampledCurve {
        start: points[0],
        points: sampled,
    })
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    fn close(a: Point<f64>, b: Point<f64>) -> bool {
        approx_eq!(f64, a.x(), b.x(), epsilon = 1e-9) && approx_eq!(f64, a.y(), b.y(), epsilon = 1e-9)
    }

    #[test]
    fn test_endpoints() {
        let polygons = vec![
            vec![Point::new(3., 4.), Point::new(-7., 12.5)],
            vec![Point::new(0., 0.), Point::new(100., 300.), Point::new(250., 10.)],
            vec![
                Point::new(50., 400.),
                Point::new(120., 80.),
                Point::new(300., 90.),
                Point::new(380., 420.),
                Point::new(450., 50.),
            ],
        ];
        for points in polygons {
            assert_eq!(bezier_point(&points, 0.), points[0]);
            assert_eq!(bezier_point(&points, 1.), *points.last().unwrap());
        }
    }

    #[test]
    fn test_linear() {
        let p0 = Point::new(50., 450.);
        let p1 = Point::new(450., 50.);
        for &t in &[0.0, 0.1, 0.25, 1. / 3., 0.5, 0.9, 1.0, -0.5, 1.5] {
            let expected = Point::new((1. - t) * 50. + t * 450., (1. - t) * 450. + t * 50.);
            assert_eq!(bezier_point(&[p0, p1], t), expected);
        }
    }

    #[test]
    fn test_cubic_against_bernstein() {
        let p = [
            Point::new(0., 0.),
            Point::new(30., 90.),
            Point::new(70., -40.),
            Point::new(100., 20.),
        ];
        for i in 0..=20 {
            let t = i as f64 / 20.;
            let s = 1. - t;
            let (b0, b1, b2, b3) = (s * s * s, 3. * s * s * t, 3. * s * t * t, t * t * t);
            let expected = Point::new(
                b0 * p[0].x() + b1 * p[1].x() + b2 * p[2].x() + b3 * p[3].x(),
                b0 * p[0].y() + b1 * p[1].y() + b2 * p[2].y() + b3 * p[3].y(),
            );
            assert!(close(bezier_point(&p, t), expected));
        }
    }

    #[test]
    fn test_control_points_untouched() {
        let points = vec![Point::new(1., 2.), Point::new(3., 5.), Point::new(8., 13.)];
        let copy = points.clone();
        bezier_point(&points, 0.3);
        assert_eq!(points, copy);
    }

    #[test]
    #[should_panic]
    fn test_single_point_panics() {
        bezier_point(&[Point::new(1., 1.)], 0.5);
    }

    #[test]
    fn test_sample_count() {
        let mut points = vec![Point::new(0., 0.)];
        for n in 1..8 {
            points.push(Point::new(n as f64 * 10., (n * n) as f64));
            for &steps in &[1, 7, 100] {
                let curve = sample(&points, steps).unwrap();
                assert_eq!(curve.len(), steps);
                assert_eq!(samples(&points, steps).unwrap().len(), steps);
            }
        }
    }

    #[test]
    fn test_sample_excludes_start() {
        let points = [Point::new(50., 50.), Point::new(450., 50.)];
        let curve = sample(&points, 100).unwrap();
        assert!(close(curve.points()[0], Point::new(54., 50.)));
        assert_eq!(*curve.points().last().unwrap(), Point::new(450., 50.));
        assert_eq!(curve.start(), Point::new(50., 50.));
        assert_eq!(curve.polyline().0.len(), 101);
        assert_eq!(curve.polyline().lines().count(), 100);
    }

    #[test]
    fn test_samples_restart() {
        let points = [Point::new(0., 0.), Point::new(5., 9.), Point::new(10., 0.)];
        let lazy = samples(&points, 10).unwrap();
        let first: Vec<Point<f64>> = lazy.clone().collect();
        let second: Vec<Point<f64>> = lazy.collect();
        assert_eq!(first, second);
        assert_eq!(first, sample(&points, 10).unwrap().points().to_vec());
    }

    #[test]
    fn test_sample_errors() {
        assert_eq!(
            sample(&[], 100),
            Err(CurveError::TooFewControlPoints { found: 0 })
        );
        assert_eq!(
            sample(&[Point::new(1., 1.)], 100),
            Err(CurveError::TooFewControlPoints { found: 1 })
        );
        assert_eq!(
            sample(&[Point::new(1., 1.), Point::new(2., 2.)], 0),
            Err(CurveError::NoSteps)
        );
    }
}
