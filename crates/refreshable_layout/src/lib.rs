//! Refreshable Layout
//!
//! Presentation-side collaborators of the refresh state machine. Nothing in
//! this crate draws; it turns published state into plain layout data and
//! feeds measured geometry back into the controller.
//!
//! - **Bounds readers**: Geometry probes for the fixed container and the
//!   moving content marker
//! - **Indicator**: Height, offset, opacity and animation flag of the
//!   activity indicator
//! - **Scroll view**: Composition of container, content and indicator
//! - **Native control**: Alternative host driven by a platform refresh control

pub mod bounds_reader;
pub mod indicator;
pub mod native;
pub mod scroll_view;

pub use bounds_reader::{BoundsReader, GeometryProbe};
pub use indicator::IndicatorModel;
pub use native::{NativeControlState, NativeRefreshControl};
pub use scroll_view::{
    RefreshEnvironment, RefreshLayout, RefreshableScroll, ScrollDirection, ScrollbarVisibility,
};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::bounds_reader::{BoundsReader, GeometryProbe};
    pub use crate::indicator::IndicatorModel;
    pub use crate::native::{NativeControlState, NativeRefreshControl};
    pub use crate::scroll_view::{
        RefreshEnvironment, RefreshLayout, RefreshableScroll, ScrollDirection, ScrollbarVisibility,
    };

    pub use refreshable_core::{Rect, RectSource, RefreshConfig, RefreshMode, RefreshSnapshot};
    pub use refreshable_runtime::{ControllerHandle, RefreshAction, RefreshController};
}
