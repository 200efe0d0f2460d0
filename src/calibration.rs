//! This module describes how positions on the editing canvas are read as light. The horizontal axis
//! is wavelength, running from `wavelength_min` at `offset_x` to `wavelength_max` one canvas width
//! further right; the vertical axis is intensity, which is `scale_factor` at `offset_y` and falls
//! off linearly to 0 one canvas height further down. Canvas coordinates have their origin at the
//! top left, as is usual for windowing systems.

/// The size of the editing canvas, in the same units as the control points (usually pixels).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The canvas width. Must be positive.
    pub width: f64,
    /// The canvas height. Must be positive.
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport of the given size.
    pub fn new(width: f64, height: f64) -> Viewport {
        Viewport { width, height }
    }
}

/// The constants that map canvas positions to wavelength and intensity, and the number of steps
/// curves are sampled with. Every field has a default, so a configuration only needs to list what it
/// changes.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// The horizontal canvas position of `wavelength_min`.
    pub offset_x: f64,
    /// The vertical canvas position of full intensity.
    pub offset_y: f64,
    /// The intensity at `offset_y`. Because chromaticity is normalized, this has no effect on the
    /// final coordinate: it only scales the tristimulus sums.
    pub scale_factor: f64,
    /// The wavelength at the left edge of the mapped range, in nanometers.
    pub wavelength_min: f64,
    /// The wavelength one canvas width to the right of `wavelength_min`, in nanometers.
    pub wavelength_max: f64,
    /// How many points a curve is sampled into.
    pub step_count: usize,
}

impl Default for Calibration {
    fn default() -> Calibration {
        Calibration {
            offset_x: 50.0,
            offset_y: 50.0,
            scale_factor: 1.8,
            wavelength_min: 380.0,
            wavelength_max: 780.0,
            step_count: 100,
        }
    }
}

impl Calibration {
    /// The wavelength at a horizontal canvas position, rounded to the nearest whole nanometer. Exact
    /// halves round to the even neighbor.
    ///
    /// # Example
    /// ```
    /// # use chromacurve::calibration::{Calibration, Viewport};
    /// let calibration = Calibration::default();
    /// let viewport = Viewport::new(400., 400.);
    /// assert_eq!(calibration.wavelength_at(50., viewport), 380.);
    /// assert_eq!(calibration.wavelength_at(250.4, viewport), 580.);
    /// assert_eq!(calibration.wavelength_at(450., viewport), 780.);
    /// ```
    pub fn wavelength_at(&self, x: f64, viewport: Viewport) -> f64 {
        let span = self.wavelength_max - self.wavelength_min;
        (self.wavelength_min + (x - self.offset_x) / viewport.width * span).round_ties_even()
    }

    /// The intensity at a vertical canvas position. Positions far enough down to give a negative
    /// value give 0 instead.
    pub fn intensity_at(&self, y: f64, viewport: Viewport) -> f64 {
        let intensity = self.scale_factor * (1.0 - (y - self.offset_y) / viewport.height);
        if intensity < 0.0 {
            0.0
        } else {
            intensity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wavelength_mapping() {
        let calibration = Calibration::default();
        let viewport = Viewport::new(800., 600.);
        assert_eq!(calibration.wavelength_at(50., viewport), 380.);
        assert_eq!(calibration.wavelength_at(850., viewport), 780.);
        assert_eq!(calibration.wavelength_at(450., viewport), 580.);
        // left of the offset goes below the range, and is not clamped
        assert_eq!(calibration.wavelength_at(0., viewport), 355.);
        // 1nm is 2 pixels here, so odd pixels land exactly halfway
        assert_eq!(calibration.wavelength_at(51., viewport), 380.);
        assert_eq!(calibration.wavelength_at(53., viewport), 382.);
    }

    #[test]
    fn test_intensity_mapping() {
        let calibration = Calibration::default();
        let viewport = Viewport::new(400., 400.);
        assert!((calibration.intensity_at(50., viewport) - 1.8).abs() < 1e-12);
        assert!((calibration.intensity_at(250., viewport) - 0.9).abs() < 1e-12);
        assert_eq!(calibration.intensity_at(450., viewport), 0.);
        assert_eq!(calibration.intensity_at(700., viewport), 0.);
        // above the offset the intensity keeps growing
        assert!((calibration.intensity_at(-150., viewport) - 2.7).abs() < 1e-12);
    }

    #[test]
    fn test_alternative_calibration() {
        let calibration = Calibration {
            offset_x: 0.,
            wavelength_min: 400.,
            wavelength_max: 700.,
            ..Calibration::default()
        };
        let viewport = Viewport::new(300., 100.);
        assert_eq!(calibration.wavelength_at(0., viewport), 400.);
        assert_eq!(calibration.wavelength_at(123., viewport), 523.);
        assert_eq!(calibration.step_count, 100);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let data = "scale_factor,step_count\n3.5,250\n";
        let mut rdr = ::csv::Reader::from_reader(data.as_bytes());
        let calibration: Calibration = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(calibration.scale_factor, 3.5);
        assert_eq!(calibration.step_count, 250);
        assert_eq!(calibration.offset_x, 50.);
        assert_eq!(calibration.offset_y, 50.);
        assert_eq!(calibration.wavelength_min, 380.);
        assert_eq!(calibration.wavelength_max, 780.);

        let data = "offset_x\n0\n";
        let mut rdr = ::csv::Reader::from_reader(data.as_bytes());
        let calibration: Calibration = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(
            calibration,
            Calibration {
                offset_x: 0.,
                ..Calibration::default()
            }
        );
    }
}
