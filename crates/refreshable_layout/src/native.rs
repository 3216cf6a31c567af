//! Platform refresh control host
//!
//! Some platforms ship their own refresh control attached to a native scroll
//! view. The control decides when a refresh starts; this host only forwards
//! that decision to the controller and mirrors the outstanding refresh back
//! onto the control. Geometry probes are not needed in this mode.

use refreshable_core::{RefreshSnapshot, Size};
use refreshable_runtime::{ControllerHandle, RefreshAction, Result};
use tracing::debug;

use crate::scroll_view::ScrollDirection;

/// What the native scroll view and its refresh control should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeControlState {
    /// Whether the control should display its spinning state
    pub refreshing: bool,
    pub show_vertical: bool,
    pub show_horizontal: bool,
}

/// Host wiring a platform refresh control to a refresh controller
#[derive(Debug, Clone)]
pub struct NativeRefreshControl {
    handle: ControllerHandle,
    direction: ScrollDirection,
    shows_indicators: bool,
}

impl NativeRefreshControl {
    pub fn new(handle: ControllerHandle) -> Self {
        Self {
            handle,
            direction: ScrollDirection::Vertical,
            shows_indicators: true,
        }
    }

    pub fn direction(mut self, direction: ScrollDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn shows_indicators(mut self, shows: bool) -> Self {
        self.shows_indicators = shows;
        self
    }

    /// Install the refresh action run when the control fires
    pub fn set_action(&self, action: Option<RefreshAction>) -> Result<()> {
        self.handle.set_action(action)
    }

    /// The platform control was pulled far enough to fire
    pub fn primary_action_triggered(&self) -> Result<()> {
        debug!("native refresh control triggered");
        self.handle.trigger()
    }

    /// Detach from the controller when the native view is torn down
    pub fn dismantle(self) -> Result<()> {
        self.handle.set_action(None)
    }

    pub fn is_refreshing(&self, snapshot: &RefreshSnapshot) -> bool {
        snapshot.refreshing
    }

    pub fn render(&self, snapshot: &RefreshSnapshot) -> NativeControlState {
        NativeControlState {
            refreshing: self.is_refreshing(snapshot),
            show_vertical: self.shows_indicators && self.direction.includes_vertical(),
            show_horizontal: self.shows_indicators && self.direction.includes_horizontal(),
        }
    }

    /// Content size for the native scroll view
    ///
    /// Axes that do not scroll are pinned to the viewport.
    pub fn content_size(&self, intrinsic: Size, viewport: Size) -> Size {
        Size::new(
            if self.direction.includes_horizontal() {
                intrinsic.width
            } else {
                viewport.width
            },
            if self.direction.includes_vertical() {
                intrinsic.height
            } else {
                viewport.height
            },
        )
    }
}
