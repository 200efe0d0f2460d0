//! Chromacurve draws light as a curve. A Bézier curve on an editing canvas is read as a spectral
//! power distribution, with wavelength running left to right and intensity bottom to top, and is
//! reduced to the single point on the CIE 1931 chromaticity diagram that it looks like to a human
//! observer.
//!
//! The crate is the numeric core of such an editor and nothing else: windows, mouse handling, and
//! drawing are left to the caller, which hands over control points and gets back sampled curves and
//! chromaticity coordinates. The pieces are:
//!
//! - [`curve`]: Bézier evaluation and sampling;
//! - [`polygon`]: the editable control polygon and its snapshots;
//! - [`spectrum`]: color matching coefficient tables and how to load them;
//! - [`calibration`]: how canvas positions map to wavelength and intensity;
//! - [`chromaticity`]: the reduction from a sampled curve to a chromaticity coordinate;
//! - [`pipeline`]: all of the above in one call, with stale-result handling.
//!
//! [`curve`]: curve/index.html
//! [`polygon`]: polygon/index.html
//! [`spectrum`]: spectrum/index.html
//! [`calibration`]: calibration/index.html
//! [`chromaticity`]: chromaticity/index.html
//! [`pipeline`]: pipeline/index.html

// we don't mess around with documentation
#![deny(missing_docs)]

extern crate csv;
extern crate geo;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate float_cmp;

pub mod calibration;
pub mod chromaticity;
pub mod curve;
pub mod observer;
pub mod pipeline;
pub mod polygon;
pub mod prelude;
pub mod spectrum;

pub use geo::Point;
