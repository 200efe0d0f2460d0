//! This module reduces a sampled curve to a single chromaticity coordinate. Each sampled point is
//! read as a wavelength (its horizontal position) and an intensity (its vertical position), as laid
//! out by a [`Calibration`]; the curve as a whole is then a spectral power distribution, and the
//! color it describes is found the same way as for any other spectrum: weight the color matching
//! functions by the power at each wavelength, sum them into tristimulus values X, Y, and Z, and
//! project those onto the chromaticity plane with `x = X / (X + Y + Z)` and `y = Y / (X + Y + Z)`.
//!
//! The projection throws away overall brightness, so only the *shape* of the curve matters: scaling
//! every intensity (or every coefficient) by the same amount gives the same coordinate.
//!
//! [`Calibration`]: ../calibration/struct.Calibration.html

use std::fmt;

use geo::Point;

use calibration::{Calibration, Viewport};
use spectrum::SpectrumTable;

/// A point on the CIE 1931 xy chromaticity diagram. Both components are usually between 0 and 1,
/// but they are not clamped: see [`clamped`](#method.clamped) for that.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Chromaticity {
    /// The x chromaticity, X / (X + Y + Z).
    pub x: f64,
    /// The y chromaticity, Y / (X + Y + Z).
    pub y: f64,
}

impl Chromaticity {
    /// Clamps each component to [0, 1].
    pub fn clamped(&self) -> Chromaticity {
        let clamp = |v: f64| {
            if v < 0. {
                0.
            } else if v > 1. {
                1.
            } else {
                v
            }
        };
        Chromaticity {
            x: clamp(self.x),
            y: clamp(self.y),
        }
    }

    /// Where a marker for this coordinate goes on a diagram image of the given size, whose bottom
    /// left corner is (0, 0) and top right corner is (1, 1). The coordinate is clamped first, and the
    /// returned position has its origin at the top left.
    pub fn diagram_position(&self, width: f64, height: f64) -> Point<f64> {
        let c = self.clamped();
        Point::new(c.x * width, (1. - c.y) * height)
    }
}

/// Formats as `(x, y)` with five decimal places.
impl fmt::Display for Chromaticity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.x, self.y)
    }
}

/// Tristimulus values accumulated over a curve, before normalization.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tristimulus {
    /// The X value.
    pub x: f64,
    /// The Y value (luminance).
    pub y: f64,
    /// The Z value.
    pub z: f64,
}

impl Tristimulus {
    /// X + Y + Z.
    pub fn sum(&self) -> f64 {
        self.x + self.y + self.z
    }

    /// Projects onto the chromaticity plane. If nothing was accumulated at all, so that the sum is
    /// exactly 0, this is (0, 0) rather than a division by zero.
    pub fn chromaticity(&self) -> Chromaticity {
        let sum = self.sum();
        if sum == 0. {
            Chromaticity::default()
        } else {
            Chromaticity {
                x: self.x / sum,
                y: self.y / sum,
            }
        }
    }
}

/// Turns sampled curve points into tristimulus values and chromaticity coordinates against a fixed
/// table, calibration, and canvas size. This holds nothing but borrowed, read-only data, so it is
/// cheap to build one per reduction.
///
/// # Example
/// ```
/// # use chromacurve::Point;
/// # use chromacurve::calibration::{Calibration, Viewport};
/// # use chromacurve::chromaticity::ChromaticityReducer;
/// # use chromacurve::spectrum::SpectrumTable;
/// let table: SpectrumTable = "480 1 0 0\n580 0 1 0".parse().unwrap();
/// let calibration = Calibration::default();
/// let reducer = ChromaticityReducer::new(&table, &calibration, Viewport::new(400., 400.));
/// // 480nm at full height, 580nm at half height, and one point that misses the table
/// let samples = [Point::new(150., 50.), Point::new(250., 250.), Point::new(300., 50.)];
/// let xy = reducer.reduce(&samples);
/// assert!((xy.x - 2. / 3.).abs() < 1e-10);
/// assert!((xy.y - 1. / 3.).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ChromaticityReducer<'a> {
    table: &'a SpectrumTable,
    calibration: &'a Calibration,
    viewport: Viewport,
}

impl<'a> ChromaticityReducer<'a> {
    /// Creates a reducer.
    pub fn new(
        table: &'a SpectrumTable,
        calibration: &'a Calibration,
        viewport: Viewport,
    ) -> ChromaticityReducer<'a> {
        ChromaticityReducer {
            table,
            calibration,
            viewport,
        }
    }

    /// Sums the contribution of every sample. Samples whose wavelength isn't in the table
    /// contribute nothing, as do samples at or below zero intensity.
    pub fn accumulate<'p, I>(&self, samples: I) -> Tristimulus
    where
        I: IntoIterator<Item = &'p Point<f64>>,
    {
        let mut total = Tristimulus::default();
        let mut hits = 0;
        for point in samples {
            let wavelength = self.calibration.wavelength_at(point.x(), self.viewport);
            let intensity = self.calibration.intensity_at(point.y(), self.viewport);
            if let Some(c) = self.table.lookup(wavelength) {
                total.x += c[0] * intensity;
                total.y += c[1] * intensity;
                total.z += c[2] * intensity;
                hits += 1;
            }
        }
        trace!("accumulated {:?} from {} table hits", total, hits);
        total
    }

    /// The chromaticity of the curve through the given samples.
    pub fn reduce<'p, I>(&self, samples: I) -> Chromaticity
    where
        I: IntoIterator<Item = &'p Point<f64>>,
    {
        self.accumulate(samples).chromaticity()
    }
}
