//! Scenario definition for headless refresh runs.

use anyhow::{Context, Result};
use refreshable_core::{Rect, RectSource, RefreshMode};
use serde::Deserialize;
use std::path::Path;

/// Sequence of headless steps, optionally pinned to a refresh mode.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    /// Mode for this scenario; falls back to the configured mode.
    #[serde(default)]
    pub mode: Option<RefreshMode>,
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to parse scenario")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw)
    }
}

/// One step of a headless scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Lay out the content dragged `offset` points below its rest position.
    Drag { offset: f32 },
    /// Report a raw rectangle for one source.
    Report { source: RectSource, rect: Rect },
    /// Fire the platform refresh control.
    Trigger,
    /// Let the running refresh action return.
    CompleteRefresh {
        #[serde(default)]
        fail: bool,
    },
    /// Toggle the search field.
    SetSearching { searching: bool },
    /// Install or remove the refresh action.
    SetAction { present: bool },
    /// Re-run `frames` layout passes without moving anything.
    Tick { frames: u32 },
    /// Sleep, then apply whatever the controller received meanwhile.
    Wait { ms: u64 },
    AssertState(StateExpectation),
    AssertRefreshCount { count: u64 },
    /// Number of times the refresh action actually ran.
    AssertActionRuns { count: usize },
    AssertLayout(LayoutExpectation),
}

impl ScenarioStep {
    /// Assertion name used in reports, `None` for actions.
    pub fn assertion_name(&self) -> Option<&'static str> {
        match self {
            ScenarioStep::AssertState(_) => Some("assert_state"),
            ScenarioStep::AssertRefreshCount { .. } => Some("assert_refresh_count"),
            ScenarioStep::AssertActionRuns { .. } => Some("assert_action_runs"),
            ScenarioStep::AssertLayout(_) => Some("assert_layout"),
            _ => None,
        }
    }
}

/// Expected published fields; absent fields are not checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateExpectation {
    pub percentage: Option<f32>,
    pub refreshing: Option<bool>,
    pub frozen: Option<bool>,
    pub indicator_offset: Option<f32>,
    pub alignment_offset: Option<f32>,
    pub indicator_opacity: Option<f32>,
}

/// Expected layout output; absent fields are not checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LayoutExpectation {
    pub scroll_enabled: Option<bool>,
    pub content_offset_y: Option<f32>,
    pub indicator_visible: Option<bool>,
    pub indicator_animating: Option<bool>,
}
