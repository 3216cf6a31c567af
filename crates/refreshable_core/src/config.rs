//! Refresh configuration presets
//!
//! A [`RefreshConfig`] is chosen once, when the scroll container is mounted,
//! and never changes afterwards. Most callers pick a [`RefreshMode`] preset
//! matching how the container is embedded:
//!
//! | mode | travel | activity offset | inline indicator |
//! |---|---|---|---|
//! | `normal` | 80 | 80 | yes |
//! | `navigation` | 80 | 160 | no |
//! | `searchable_navigation` | 80 | 240 | no |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RefreshError, Result};

/// How the scroll container is embedded, selecting a configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RefreshMode {
    /// Plain container, indicator inserted inline above the content
    #[default]
    Normal,
    /// Inside a navigation stack with a large title
    Navigation,
    /// Inside a navigation stack that also hosts a search field
    SearchableNavigation,
    /// Explicit values
    Custom {
        travel_distance: f32,
        activity_offset: f32,
        insert_activity: bool,
    },
}

impl RefreshMode {
    /// Preset name (`custom` for explicit values)
    pub fn name(&self) -> &'static str {
        match self {
            RefreshMode::Normal => "normal",
            RefreshMode::Navigation => "navigation",
            RefreshMode::SearchableNavigation => "searchable_navigation",
            RefreshMode::Custom { .. } => "custom",
        }
    }

    /// All named presets, in table order
    pub fn presets() -> [RefreshMode; 3] {
        [
            RefreshMode::Normal,
            RefreshMode::Navigation,
            RefreshMode::SearchableNavigation,
        ]
    }
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RefreshMode {
    type Err = RefreshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "normal" => Ok(RefreshMode::Normal),
            "navigation" => Ok(RefreshMode::Navigation),
            "searchable_navigation" | "searchable" => Ok(RefreshMode::SearchableNavigation),
            _ => Err(RefreshError::UnknownMode(s.to_string())),
        }
    }
}

/// Immutable configuration of one refresh state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RefreshConfig {
    travel_distance: f32,
    activity_offset: f32,
    insert_activity: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::normal()
    }
}

impl RefreshConfig {
    /// Drag distance shared by every named preset
    pub const DEFAULT_TRAVEL_DISTANCE: f32 = 80.0;

    /// Plain container with an inline indicator
    pub fn normal() -> Self {
        Self {
            travel_distance: Self::DEFAULT_TRAVEL_DISTANCE,
            activity_offset: 80.0,
            insert_activity: true,
        }
    }

    /// Floating indicator clear of a large navigation title
    pub fn navigation() -> Self {
        Self {
            travel_distance: Self::DEFAULT_TRAVEL_DISTANCE,
            activity_offset: 160.0,
            insert_activity: false,
        }
    }

    /// Floating indicator clear of a navigation title and search field
    pub fn searchable_navigation() -> Self {
        Self {
            travel_distance: Self::DEFAULT_TRAVEL_DISTANCE,
            activity_offset: 240.0,
            insert_activity: false,
        }
    }

    /// Explicit values
    ///
    /// Both distances must be finite and strictly positive.
    pub fn custom(travel_distance: f32, activity_offset: f32, insert_activity: bool) -> Result<Self> {
        validate_distance("travel_distance", travel_distance)?;
        validate_distance("activity_offset", activity_offset)?;
        Ok(Self {
            travel_distance,
            activity_offset,
            insert_activity,
        })
    }

    /// Build the configuration for a mode
    pub fn from_mode(mode: RefreshMode) -> Result<Self> {
        match mode {
            RefreshMode::Normal => Ok(Self::normal()),
            RefreshMode::Navigation => Ok(Self::navigation()),
            RefreshMode::SearchableNavigation => Ok(Self::searchable_navigation()),
            RefreshMode::Custom {
                travel_distance,
                activity_offset,
                insert_activity,
            } => Self::custom(travel_distance, activity_offset, insert_activity),
        }
    }

    /// How far the user must drag before a refresh starts
    pub fn travel_distance(&self) -> f32 {
        self.travel_distance
    }

    /// Vertical space reserved for the activity indicator
    pub fn activity_offset(&self) -> f32 {
        self.activity_offset
    }

    /// Whether the indicator is inserted into the content flow
    /// rather than floated above it
    pub fn insert_activity(&self) -> bool {
        self.insert_activity
    }
}

impl TryFrom<RefreshMode> for RefreshConfig {
    type Error = RefreshError;

    fn try_from(mode: RefreshMode) -> Result<Self> {
        Self::from_mode(mode)
    }
}

fn validate_distance(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RefreshError::InvalidConfig { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let normal = RefreshConfig::from_mode(RefreshMode::Normal).unwrap();
        assert_eq!(normal.travel_distance(), 80.0);
        assert_eq!(normal.activity_offset(), 80.0);
        assert!(normal.insert_activity());

        let nav = RefreshConfig::from_mode(RefreshMode::Navigation).unwrap();
        assert_eq!(nav.activity_offset(), 160.0);
        assert!(!nav.insert_activity());

        let search = RefreshConfig::from_mode(RefreshMode::SearchableNavigation).unwrap();
        assert_eq!(search.activity_offset(), 240.0);
        assert!(!search.insert_activity());
    }

    #[test]
    fn test_custom_validation() {
        assert!(RefreshConfig::custom(100.0, 50.0, false).is_ok());
        assert_eq!(
            RefreshConfig::custom(0.0, 50.0, true),
            Err(RefreshError::InvalidConfig {
                field: "travel_distance",
                value: 0.0
            })
        );
        assert!(matches!(
            RefreshConfig::custom(80.0, f32::INFINITY, true),
            Err(RefreshError::InvalidConfig {
                field: "activity_offset",
                ..
            })
        ));
        assert!(RefreshConfig::custom(-1.0, 50.0, true).is_err());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("normal".parse::<RefreshMode>(), Ok(RefreshMode::Normal));
        assert_eq!(
            "Searchable-Navigation".parse::<RefreshMode>(),
            Ok(RefreshMode::SearchableNavigation)
        );
        assert!(matches!(
            "sideways".parse::<RefreshMode>(),
            Err(RefreshError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_mode_serde_tagged() {
        let mode: RefreshMode = serde_json::from_str(
            r#"{"kind":"custom","travel_distance":100.0,"activity_offset":50.0,"insert_activity":false}"#,
        )
        .unwrap();
        assert_eq!(
            mode,
            RefreshMode::Custom {
                travel_distance: 100.0,
                activity_offset: 50.0,
                insert_activity: false,
            }
        );

        let nav: RefreshMode = serde_json::from_str(r#"{"kind":"navigation"}"#).unwrap();
        assert_eq!(nav, RefreshMode::Navigation);
    }
}
