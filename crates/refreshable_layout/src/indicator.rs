//! Activity indicator model
//!
//! The indicator is a spinner sized to the reserved activity slot. It fades
//! in once the drag passes the activity threshold and spins while a refresh
//! is outstanding.

use refreshable_core::{Rect, RefreshConfig, RefreshSnapshot};

/// Scale applied to the platform spinner so it matches a native refresh control
pub const INDICATOR_SCALE: f32 = 0.8;

/// Layout data for the activity indicator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorModel {
    /// Height of the indicator slot
    pub height: f32,
    /// Vertical offset relative to the top of the content
    pub offset_y: f32,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
    /// Uniform scale applied to the spinner
    pub scale: f32,
    /// Whether the spinner should animate
    pub animating: bool,
}

impl Default for IndicatorModel {
    fn default() -> Self {
        Self {
            height: 0.0,
            offset_y: 0.0,
            opacity: 0.0,
            scale: INDICATOR_SCALE,
            animating: false,
        }
    }
}

impl IndicatorModel {
    pub fn from_snapshot(config: &RefreshConfig, snapshot: &RefreshSnapshot) -> Self {
        Self {
            height: config.activity_offset(),
            offset_y: snapshot.indicator_offset,
            opacity: snapshot.indicator_opacity.clamp(0.0, 1.0),
            scale: INDICATOR_SCALE,
            animating: snapshot.refreshing,
        }
    }

    /// Whether anything would be drawn
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Frame of the indicator slot for content whose top edge is at `content_top`
    pub fn frame(&self, content_top: f32, width: f32) -> Rect {
        Rect::new(0.0, content_top + self.offset_y, width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(percentage: f32, opacity: f32, refreshing: bool, offset: f32) -> RefreshSnapshot {
        RefreshSnapshot {
            percentage,
            refreshing,
            indicator_offset: offset,
            indicator_opacity: opacity,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_indicator_is_hidden() {
        let model = IndicatorModel::from_snapshot(&RefreshConfig::normal(), &RefreshSnapshot::default());
        assert_eq!(model.height, 80.0);
        assert!(!model.is_visible());
        assert!(!model.animating);
    }

    #[test]
    fn test_refreshing_indicator_animates() {
        let model = IndicatorModel::from_snapshot(
            &RefreshConfig::navigation(),
            &snapshot(1.0, 1.0, true, -160.0),
        );
        assert_eq!(model.height, 160.0);
        assert_eq!(model.scale, INDICATOR_SCALE);
        assert!(model.is_visible());
        assert!(model.animating);
        assert_eq!(model.offset_y, -160.0);
    }

    #[test]
    fn test_frame_follows_offset() {
        let model = IndicatorModel::from_snapshot(
            &RefreshConfig::normal(),
            &snapshot(0.5, 0.0, false, -40.0),
        );
        assert_eq!(model.frame(100.0, 320.0), Rect::new(0.0, 60.0, 320.0, 80.0));
    }
}
