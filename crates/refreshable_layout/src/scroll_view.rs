//! Refreshable scroll container
//!
//! Composes the three layers of a pull-to-refresh container:
//!
//! - A non-scrolling outer container carrying the fixed [`BoundsReader`]
//! - The scrolled content, topped by a zero-height marker carrying the moving
//!   [`BoundsReader`] and shifted down while the indicator slot is frozen open
//! - The activity indicator, described by an [`IndicatorModel`]
//!
//! # Example
//!
//! ```rust
//! use refreshable_layout::prelude::*;
//!
//! # async fn demo() -> refreshable_runtime::Result<()> {
//! let scroll = RefreshableScroll::new().mode(RefreshMode::Navigation).shows_indicators(false);
//! let mut controller = scroll.mount()?;
//!
//! let env = RefreshEnvironment::new().with_action(RefreshAction::new(|| async { Ok(()) }));
//! let layout = scroll.render(&mut controller, &env);
//! assert!(layout.scroll_enabled);
//! assert!(!layout.show_vertical_scrollbar);
//! # Ok(())
//! # }
//! ```

use refreshable_core::{RefreshMode, RefreshSnapshot};
use refreshable_runtime::{RefreshAction, RefreshController, Result};
use tracing::trace;

use crate::bounds_reader::BoundsReader;
use crate::indicator::IndicatorModel;

// ============================================================================
// Scroll Direction
// ============================================================================

/// Scroll direction for the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// Vertical scrolling only (default)
    #[default]
    Vertical,
    /// Horizontal scrolling only
    Horizontal,
    /// Both directions (free scroll)
    Both,
}

impl ScrollDirection {
    pub fn includes_vertical(&self) -> bool {
        matches!(self, ScrollDirection::Vertical | ScrollDirection::Both)
    }

    pub fn includes_horizontal(&self) -> bool {
        matches!(self, ScrollDirection::Horizontal | ScrollDirection::Both)
    }
}

/// Scrollbar visibility modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollbarVisibility {
    /// Shown on the enabled axes while scrolling is enabled
    #[default]
    Visible,
    /// Never shown (content still scrollable)
    Hidden,
}

impl ScrollbarVisibility {
    pub fn is_shown(&self) -> bool {
        matches!(self, ScrollbarVisibility::Visible)
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Values the surrounding UI hands to the container on every render pass
#[derive(Debug, Clone, Default)]
pub struct RefreshEnvironment {
    /// Refresh action installed by an ancestor, if any
    pub refresh_action: Option<RefreshAction>,
    /// Whether an attached search field is active
    pub is_searching: bool,
}

impl RefreshEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: RefreshAction) -> Self {
        self.refresh_action = Some(action);
        self
    }

    pub fn searching(mut self, is_searching: bool) -> Self {
        self.is_searching = is_searching;
        self
    }
}

// ============================================================================
// Layout Output
// ============================================================================

/// Everything a renderer needs to draw one frame of the container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshLayout {
    /// Whether the user can scroll at all (false while searching)
    pub scroll_enabled: bool,
    /// Configured scroll direction
    pub direction: ScrollDirection,
    pub show_vertical_scrollbar: bool,
    pub show_horizontal_scrollbar: bool,
    /// How far the content is pushed down to make room for the indicator
    pub content_offset_y: f32,
    pub indicator: IndicatorModel,
}

// ============================================================================
// RefreshableScroll
// ============================================================================

/// Builder describing one refreshable scroll container
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshableScroll {
    mode: RefreshMode,
    direction: ScrollDirection,
    scrollbar: ScrollbarVisibility,
}

impl RefreshableScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: RefreshMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn direction(mut self, direction: ScrollDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn vertical(self) -> Self {
        self.direction(ScrollDirection::Vertical)
    }

    pub fn horizontal(self) -> Self {
        self.direction(ScrollDirection::Horizontal)
    }

    pub fn both_directions(self) -> Self {
        self.direction(ScrollDirection::Both)
    }

    pub fn scrollbar_visibility(mut self, visibility: ScrollbarVisibility) -> Self {
        self.scrollbar = visibility;
        self
    }

    pub fn scrollbar_hidden(self) -> Self {
        self.scrollbar_visibility(ScrollbarVisibility::Hidden)
    }

    /// Show or hide scroll indicators on the configured axes
    pub fn shows_indicators(self, shows: bool) -> Self {
        if shows {
            self.scrollbar_visibility(ScrollbarVisibility::Visible)
        } else {
            self.scrollbar_hidden()
        }
    }

    pub fn get_mode(&self) -> RefreshMode {
        self.mode
    }

    pub fn get_direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn get_scrollbar_visibility(&self) -> ScrollbarVisibility {
        self.scrollbar
    }

    /// Create the controller backing this container
    ///
    /// Call once per mounted container; the controller lives as long as the
    /// container does.
    pub fn mount(&self) -> Result<RefreshController> {
        RefreshController::from_mode(self.mode)
    }

    /// Geometry probes for a mounted controller, fixed first
    pub fn bounds_readers(&self, controller: &RefreshController) -> (BoundsReader, BoundsReader) {
        let handle = controller.handle();
        (BoundsReader::fixed(handle.clone()), BoundsReader::moving(handle))
    }

    /// Produce the layout for one render pass
    ///
    /// Re-installs the environment's refresh action, which is withheld while
    /// searching, then lays out the current state.
    pub fn render(&self, controller: &mut RefreshController, env: &RefreshEnvironment) -> RefreshLayout {
        let action = if env.is_searching {
            None
        } else {
            env.refresh_action.clone()
        };
        controller.set_action(action);

        let layout = self.layout(controller, &controller.snapshot(), !env.is_searching);
        trace!(
            searching = env.is_searching,
            content_offset_y = layout.content_offset_y,
            "refreshable scroll rendered"
        );
        layout
    }

    fn layout(
        &self,
        controller: &RefreshController,
        snapshot: &RefreshSnapshot,
        scroll_enabled: bool,
    ) -> RefreshLayout {
        let shown = scroll_enabled && self.scrollbar.is_shown();
        RefreshLayout {
            scroll_enabled,
            direction: self.direction,
            show_vertical_scrollbar: shown && self.direction.includes_vertical(),
            show_horizontal_scrollbar: shown && self.direction.includes_horizontal(),
            content_offset_y: -snapshot.alignment_offset,
            indicator: IndicatorModel::from_snapshot(controller.config(), snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_axes() {
        assert!(ScrollDirection::Vertical.includes_vertical());
        assert!(!ScrollDirection::Vertical.includes_horizontal());
        assert!(ScrollDirection::Both.includes_vertical());
        assert!(ScrollDirection::Both.includes_horizontal());
        assert!(!ScrollDirection::Horizontal.includes_vertical());
    }

    #[test]
    fn test_builder_defaults() {
        let scroll = RefreshableScroll::new();
        assert_eq!(scroll.get_mode(), RefreshMode::Normal);
        assert_eq!(scroll.get_direction(), ScrollDirection::Vertical);
        assert_eq!(scroll.get_scrollbar_visibility(), ScrollbarVisibility::Visible);

        let hidden = scroll.shows_indicators(false).both_directions();
        assert_eq!(hidden.get_scrollbar_visibility(), ScrollbarVisibility::Hidden);
        assert_eq!(hidden.get_direction(), ScrollDirection::Both);
    }

    #[test]
    fn test_mount_rejects_invalid_custom_mode() {
        let scroll = RefreshableScroll::new().mode(RefreshMode::Custom {
            travel_distance: -1.0,
            activity_offset: 80.0,
            insert_activity: true,
        });
        assert!(scroll.mount().is_err());
    }

    #[test]
    fn test_searching_withholds_action_and_scrolling() {
        let scroll = RefreshableScroll::new();
        let mut controller = scroll.mount().unwrap();
        let env = RefreshEnvironment::new().with_action(RefreshAction::new(|| async { Ok(()) }));

        let layout = scroll.render(&mut controller, &env);
        assert!(controller.has_action());
        assert!(layout.scroll_enabled);
        assert!(layout.show_vertical_scrollbar);
        assert!(!layout.show_horizontal_scrollbar);

        let layout = scroll.render(&mut controller, &env.clone().searching(true));
        assert!(!controller.has_action());
        assert!(!layout.scroll_enabled);
        assert!(!layout.show_vertical_scrollbar);
    }

    #[test]
    fn test_idle_layout() {
        let scroll = RefreshableScroll::new().mode(RefreshMode::Navigation);
        let mut controller = scroll.mount().unwrap();
        let layout = scroll.render(&mut controller, &RefreshEnvironment::new());

        assert_eq!(layout.content_offset_y, 0.0);
        assert_eq!(layout.indicator.height, 160.0);
        assert_eq!(layout.indicator.offset_y, -160.0);
        assert!(!layout.indicator.is_visible());
    }
}
