//! Refreshable Runtime
//!
//! Hosts a [`refreshable_core::RefreshStore`] on a single update context and
//! runs the injected refresh action as an independent tokio task.
//!
//! - **Controller**: applies geometry reports, launches armed refreshes and
//!   re-enters completions through its message queue
//! - **Handle**: cloneable sender for probes and hosts living elsewhere
//! - **Action**: the async capability supplied by the application
//!
//! # Example
//!
//! ```rust
//! use refreshable_core::{Rect, RectSource, RefreshConfig};
//! use refreshable_runtime::{RefreshAction, RefreshController};
//!
//! # async fn demo() -> refreshable_runtime::Result<()> {
//! let mut controller = RefreshController::new(RefreshConfig::normal());
//! controller.set_action(Some(RefreshAction::new(|| async {
//!     // reload data here
//!     Ok(())
//! })));
//!
//! controller.report(RectSource::Fixed, Rect::new(0.0, 0.0, 320.0, 480.0))?;
//! controller.report(RectSource::Moving, Rect::new(0.0, 90.0, 320.0, 0.0))?;
//! assert!(controller.snapshot().refreshing);
//!
//! // The completion is posted back onto the controller queue
//! controller.wait_until_idle().await?;
//! assert!(!controller.snapshot().refreshing);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod controller;
pub mod error;

pub use action::{RefreshAction, RefreshFuture};
pub use controller::{ControllerEvent, ControllerHandle, ControllerMessage, RefreshController};
pub use error::{Result, RuntimeError};
