//! Refreshable Core
//!
//! This crate provides the headless heart of a pull-to-refresh scroll container:
//!
//! - **Geometry**: Rectangles reported by the layout pass
//! - **Configuration**: Named presets (`normal`, `navigation`, ...) and custom values
//! - **State Machine**: Edge-triggered arming, freezing and derived indicator offsets
//! - **Store**: Subscriber registry notified after every recompute
//!
//! # Example
//!
//! ```rust
//! use refreshable_core::{Rect, RectSource, RefreshConfig, RefreshState};
//!
//! let mut state = RefreshState::new(RefreshConfig::normal());
//!
//! // Container pinned at the top of the window
//! state.update(RectSource::Fixed, Rect::new(0.0, 100.0, 320.0, 480.0));
//!
//! // Content dragged 40 points down
//! state.update(RectSource::Moving, Rect::new(0.0, 140.0, 320.0, 0.0));
//! assert_eq!(state.percentage(), 0.5);
//!
//! // Crossing the travel distance arms a refresh
//! let outcome = state.update(RectSource::Moving, Rect::new(0.0, 190.0, 320.0, 0.0));
//! assert!(outcome.armed().is_some());
//! assert!(state.is_refreshing());
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod state;
pub mod store;

pub use config::{RefreshConfig, RefreshMode};
pub use error::{RefreshError, Result};
pub use geometry::{Point, Rect, Size};
pub use state::{
    RectSource, RefreshSnapshot, RefreshState, RefreshTicket, RefreshTransition, UpdateOutcome,
    ACTIVITY_THRESHOLD,
};
pub use store::{RefreshStore, Subscriber, SubscriptionId};
