//! Geometry probes
//!
//! A probe sits in the view hierarchy and reports the global rectangle of
//! its view on every layout pass. Two probes feed each refresh controller:
//! one on the non-scrolling container and one on a zero-height marker pinned
//! to the top of the scrolled content.

use refreshable_core::{Rect, RectSource};
use refreshable_runtime::{ControllerHandle, Result};
use tracing::trace;

/// Something that measures one role's rectangle every layout pass
pub trait GeometryProbe {
    /// Which rectangle this probe measures
    fn source(&self) -> RectSource;

    /// Report the rectangle measured by this layout pass
    ///
    /// Returns whether the report was forwarded to the controller.
    fn report(&mut self, rect: Rect) -> Result<bool>;
}

/// Probe forwarding measurements through a [`ControllerHandle`]
///
/// Identical consecutive measurements are dropped before they reach the
/// controller queue.
#[derive(Debug, Clone)]
pub struct BoundsReader {
    source: RectSource,
    handle: ControllerHandle,
    last: Option<Rect>,
}

impl BoundsReader {
    pub fn new(source: RectSource, handle: ControllerHandle) -> Self {
        Self {
            source,
            handle,
            last: None,
        }
    }

    /// Probe for the non-scrolling container
    pub fn fixed(handle: ControllerHandle) -> Self {
        Self::new(RectSource::Fixed, handle)
    }

    /// Probe for the content marker
    pub fn moving(handle: ControllerHandle) -> Self {
        Self::new(RectSource::Moving, handle)
    }

    /// Last rectangle forwarded to the controller
    pub fn last_reported(&self) -> Option<Rect> {
        self.last
    }
}

impl GeometryProbe for BoundsReader {
    fn source(&self) -> RectSource {
        self.source
    }

    fn report(&mut self, rect: Rect) -> Result<bool> {
        // The marker is laid out with zero height
        let rect = match self.source {
            RectSource::Moving => rect.with_height(0.0),
            RectSource::Fixed => rect,
        };

        if self.last == Some(rect) {
            return Ok(false);
        }

        self.handle.report(self.source, rect)?;
        self.last = Some(rect);
        trace!(source = ?self.source, top = rect.top(), "bounds reported");
        Ok(true)
    }
}
