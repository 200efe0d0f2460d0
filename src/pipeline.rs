//! This module ties everything together: a [`Pipeline`] takes a snapshot of the control polygon,
//! samples the curve, and reduces it to a chromaticity coordinate, all in one [`Frame`]. Every
//! recomputation starts over from the control points; nothing is updated incrementally.
//!
//! Recomputing is cheap enough to do on every mouse movement. Editors that would rather do it off the
//! UI thread can hand finished frames to a [`LatestFrame`], which keeps only the newest one and
//! throws away anything computed from a polygon that has since been edited again.
//!
//! [`Pipeline`]: struct.Pipeline.html
//! [`Frame`]: struct.Frame.html
//! [`LatestFrame`]: struct.LatestFrame.html

use std::sync::Arc;

use calibration::{Calibration, Viewport};
use chromaticity::{Chromaticity, ChromaticityReducer};
use curve::{sample, CurveError, SampledCurve};
use polygon::Snapshot;
use spectrum::SpectrumTable;

/// Everything computed from one revision of the control polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The revision of the control polygon this was computed from.
    pub revision: u64,
    /// The sampled curve, for drawing.
    pub curve: SampledCurve,
    /// The chromaticity of the curve.
    pub chromaticity: Chromaticity,
}

/// A spectrum table, calibration, and canvas size, ready to turn control polygons into frames. The
/// table is shared, so clones of a pipeline are cheap and can be sent to other threads.
///
/// # Example
/// ```
/// # use std::sync::Arc;
/// # use chromacurve::Point;
/// # use chromacurve::calibration::{Calibration, Viewport};
/// # use chromacurve::pipeline::Pipeline;
/// # use chromacurve::polygon::ControlPolygon;
/// # use chromacurve::spectrum::SpectrumTable;
/// let table = Arc::new(SpectrumTable::cie_1931_approximation(380, 780));
/// let pipeline = Pipeline::new(table, Calibration::default(), Viewport::new(400., 400.));
/// let mut polygon = ControlPolygon::default();
/// polygon.push(Point::new(50., 400.)).unwrap();
/// polygon.push(Point::new(250., 60.)).unwrap();
/// polygon.push(Point::new(450., 400.)).unwrap();
/// let frame = pipeline.recompute(&polygon.snapshot()).unwrap();
/// assert_eq!(frame.curve.len(), 100);
/// assert!(frame.chromaticity.x > 0. && frame.chromaticity.y > 0.);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    table: Arc<SpectrumTable>,
    calibration: Calibration,
    viewport: Viewport,
}

impl Pipeline {
    /// Creates a pipeline. Wavelengths are rounded to whole nanometers before lookup, so a table
    /// with any other spacing will mostly miss: this is logged as a warning, but not corrected.
    pub fn new(table: Arc<SpectrumTable>, calibration: Calibration, viewport: Viewport) -> Pipeline {
        if table.is_empty() {
            warn!("spectrum table is empty: every chromaticity will be (0, 0)");
        } else if table.len() > 1 {
            match table.uniform_step() {
                Some(step) if (step - 1.0).abs() <= 1e-6 => {}
                Some(step) => warn!(
                    "spectrum table has a {}nm step, but wavelengths are rounded to 1nm",
                    step
                ),
                None => warn!("spectrum table is unevenly spaced, but wavelengths are rounded to 1nm"),
            }
        }
        Pipeline {
            table,
            calibration,
            viewport,
        }
    }

    /// The shared spectrum table.
    pub fn table(&self) -> &SpectrumTable {
        &self.table
    }
    /// The calibration in use.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }
    /// The canvas size in use.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
    /// Changes the canvas size, as when the editor window is resized.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Samples the curve of the given snapshot and reduces it to a chromaticity coordinate.
    ///
    /// # Errors
    /// Fails with [`CurveError`] if the snapshot has fewer than two control points or the
    /// calibration's step count is 0.
    ///
    /// [`CurveError`]: ../curve/enum.CurveError.html
    pub fn recompute(&self, snapshot: &Snapshot) -> Result<Frame, CurveError> {
        let curve = sample(snapshot.points(), self.calibration.step_count)?;
        let chromaticity =
            ChromaticityReducer::new(&self.table, &self.calibration, self.viewport).reduce(&curve);
        debug!(
            "revision {}: {} control points, chromaticity {}",
            snapshot.revision(),
            snapshot.points().len(),
            chromaticity
        );
        Ok(Frame {
            revision: snapshot.revision(),
            curve,
            chromaticity,
        })
    }
}

/// Holds the most recent [`Frame`]. Frames from revisions older than (or the same as) the one it
/// already holds are rejected, so results that finish out of order can never replace newer ones.
///
/// [`Frame`]: struct.Frame.html
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    frame: Option<Frame>,
}

impl LatestFrame {
    /// Creates an empty holder.
    pub fn new() -> LatestFrame {
        LatestFrame::default()
    }
    /// Offers a frame, returning `true` if it was newer and has been kept.
    pub fn offer(&mut self, frame: Frame) -> bool {
        let newer = match self.frame {
            Some(ref current) => frame.revision > current.revision,
            None => true,
        };
        if newer {
            self.frame = Some(frame);
        } else {
            trace!("discarding stale frame for revision {}", frame.revision);
        }
        newer
    }
    /// The newest frame so far.
    pub fn get(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }
    /// Forgets the current frame, as when the polygon is cleared. Revision ordering starts over.
    pub fn clear(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;
    use geo::Point;
    use polygon::ControlPolygon;
    use std::thread;

    fn pipeline() -> Pipeline {
        Pipeline::new(
            Arc::new(SpectrumTable::cie_1931_approximation(380, 780)),
            Calibration::default(),
            Viewport::new(400., 400.),
        )
    }

    #[test]
    fn test_recompute_tracks_revision() {
        let pipeline = pipeline();
        let mut polygon = ControlPolygon::default();
        polygon.push(Point::new(50., 300.)).unwrap();
        assert_eq!(
            pipeline.recompute(&polygon.snapshot()),
            Err(CurveError::TooFewControlPoints { found: 1 })
        );
        polygon.push(Point::new(450., 100.)).unwrap();
        let frame = pipeline.recompute(&polygon.snapshot()).unwrap();
        assert_eq!(frame.revision, 2);
        assert_eq!(frame.curve.len(), 100);
        assert_eq!(frame.curve.start(), Point::new(50., 300.));
        // recomputing the same snapshot gives the same frame
        assert_eq!(pipeline.recompute(&polygon.snapshot()).unwrap(), frame);
    }

    #[test]
    fn test_step_count_from_calibration() {
        let calibration = Calibration {
            step_count: 37,
            ..Calibration::default()
        };
        let pipeline = Pipeline::new(
            Arc::new(SpectrumTable::cie_1931_approximation(380, 780)),
            calibration,
            Viewport::new(400., 400.),
        );
        let snapshot = Snapshot::new(1, vec![Point::new(50., 50.), Point::new(450., 450.)]);
        assert_eq!(pipeline.recompute(&snapshot).unwrap().curve.len(), 37);
        let none = Pipeline::new(
            pipeline.table().clone().into(),
            Calibration {
                step_count: 0,
                ..calibration
            },
            pipeline.viewport(),
        );
        assert_eq!(none.recompute(&snapshot), Err(CurveError::NoSteps));
    }

    #[test]
    fn test_latest_frame_discards_stale() {
        let pipeline = pipeline();
        let old = Snapshot::new(3, vec![Point::new(50., 50.), Point::new(450., 450.)]);
        let new = Snapshot::new(4, vec![Point::new(50., 450.), Point::new(450., 50.)]);
        let old_frame = pipeline.recompute(&old).unwrap();
        let new_frame = pipeline.recompute(&new).unwrap();

        let mut latest = LatestFrame::new();
        assert!(latest.get().is_none());
        assert!(latest.offer(new_frame.clone()));
        // the older result finishes late and must not win
        assert!(!latest.offer(old_frame.clone()));
        assert!(!latest.offer(new_frame.clone()));
        assert_eq!(latest.get(), Some(&new_frame));
        latest.clear();
        assert!(latest.offer(old_frame));
    }

    #[test]
    fn test_off_thread() {
        let pipeline = pipeline();
        let snapshots: Vec<Snapshot> = (1..5)
            .map(|r| {
                Snapshot::new(
                    r,
                    vec![Point::new(50., 50. * r as f64), Point::new(450., 400.)],
                )
            })
            .collect();
        let handles: Vec<_> = snapshots
            .into_iter()
            .rev()
            .map(|s| {
                let pipeline = pipeline.clone();
                thread::spawn(move || pipeline.recompute(&s).unwrap())
            })
            .collect();
        let mut latest = LatestFrame::new();
        for handle in handles {
            latest.offer(handle.join().unwrap());
        }
        assert_eq!(latest.get().unwrap().revision, 4);
    }
}
