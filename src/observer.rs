//! Analytic approximations of the CIE 1931 2° standard observer's color matching functions, from
//! Wyman, Sloan, and Shirley, ["Simple Analytic Approximations to the CIE XYZ Color Matching
//! Functions"](https://research.nvidia.com/publication/2013-07_simple-analytic-approximations-cie-xyz-color-matching-functions)
//! (2013). Each function is a sum of piecewise Gaussians with a different width on each side of the
//! peak. These are close enough to the tabulated data for visualization, and they mean a usable
//! [`SpectrumTable`] exists even without a data file.
//!
//! [`SpectrumTable`]: ../spectrum/struct.SpectrumTable.html

/// A Gaussian lobe centered on `mu`, with inverse widths `below` and `above` on either side.
fn lobe(wavelength: f64, mu: f64, below: f64, above: f64) -> f64 {
    let p = (wavelength - mu) * if wavelength < mu { below } else { above };
    (-0.5 * p * p).exp()
}

/// The x̄ color matching function at the given wavelength, in nanometers.
pub fn x(wavelength: f64) -> f64 {
    0.362 * lobe(wavelength, 442.0, 0.0624, 0.0374) + 1.056 * lobe(wavelength, 599.8, 0.0264, 0.0323)
        - 0.065 * lobe(wavelength, 501.1, 0.0490, 0.0382)
}

/// The ȳ color matching function (the luminous efficiency function) at the given wavelength.
pub fn y(wavelength: f64) -> f64 {
    0.821 * lobe(wavelength, 568.8, 0.0213, 0.0247) + 0.286 * lobe(wavelength, 530.9, 0.0613, 0.0322)
}

/// The z̄ color matching function at the given wavelength.
pub fn z(wavelength: f64) -> f64 {
    1.217 * lobe(wavelength, 437.0, 0.0845, 0.0278) + 0.681 * lobe(wavelength, 459.0, 0.0385, 0.0725)
}

/// All three color matching functions at once, as `[x̄, ȳ, z̄]`.
pub fn xyz(wavelength: f64) -> [f64; 3] {
    [x(wavelength), y(wavelength), z(wavelength)]
}
