//! Headless runtime primitives for scenario execution.

use std::future::Future;

use anyhow::{bail, Context, Result};
use refreshable_core::Rect;
use serde::{Deserialize, Serialize};

/// Configuration for deterministic headless scenario runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessRunConfig {
    /// Global y coordinate of the scroll container's top edge.
    pub container_top: f32,
    /// Logical container width.
    pub width: f32,
    /// Logical container height.
    pub height: f32,
    /// Logical milliseconds between frames.
    pub tick_ms: u64,
    /// How long a completed refresh may take to re-enter the controller.
    pub idle_timeout_ms: u64,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            container_top: 100.0,
            width: 390.0,
            height: 844.0,
            tick_ms: 16,
            idle_timeout_ms: 1000,
        }
    }
}

impl HeadlessRunConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.container_top.is_finite() {
            bail!("headless container_top must be finite");
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            bail!("headless dimensions must be positive");
        }
        if self.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        if self.idle_timeout_ms == 0 {
            bail!("headless idle_timeout_ms must be > 0");
        }
        Ok(())
    }

    /// Rectangle reported for the non-scrolling container.
    pub fn container_rect(&self) -> Rect {
        Rect::new(0.0, self.container_top, self.width, self.height)
    }

    /// Rectangle reported for the content marker dragged `offset` points down.
    pub fn marker_rect(&self, offset: f32) -> Rect {
        Rect::new(0.0, self.container_top + offset, self.width, 0.0)
    }
}

/// Single-threaded tokio host for headless runs.
///
/// Refresh actions and their completions interleave with scenario steps on
/// one thread, so a run replays identically every time.
pub struct HeadlessRuntime;

impl HeadlessRuntime {
    /// Block on `future` inside a fresh current-thread runtime.
    ///
    /// Must not be called from within another tokio runtime.
    pub fn block_on<F: Future>(cfg: &HeadlessRunConfig, future: F) -> Result<F::Output> {
        cfg.validate()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build headless runtime")?;
        Ok(runtime.block_on(future))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(HeadlessRunConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let cfg = HeadlessRunConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        assert!(HeadlessRuntime::block_on(&cfg, async {}).is_err());

        let cfg = HeadlessRunConfig {
            width: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_marker_tracks_container_top() {
        let cfg = HeadlessRunConfig::default();
        assert_eq!(cfg.marker_rect(40.0).top() - cfg.container_rect().top(), 40.0);
        assert_eq!(cfg.marker_rect(40.0).height(), 0.0);
    }

    #[test]
    fn test_block_on_runs_future() {
        let value = HeadlessRuntime::block_on(&HeadlessRunConfig::default(), async { 7 }).unwrap();
        assert_eq!(value, 7);
    }
}
