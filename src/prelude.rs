//! This module brings the types needed to go from control points to a chromaticity coordinate under
//! a single namespace, to prevent excessive imports. The error types and the lower-level functions in
//! [`curve`](../curve/index.html) are not included.

pub use calibration::{Calibration, Viewport};
pub use chromaticity::{Chromaticity, ChromaticityReducer, Tristimulus};
pub use curve::SampledCurve;
pub use geo::Point;
pub use pipeline::{Frame, LatestFrame, Pipeline};
pub use polygon::{ControlPolygon, Snapshot};
pub use spectrum::SpectrumTable;
