//! Scenario runner that drives a refreshable scroll container headlessly.
//!
//! The runner owns one mounted container for the whole scenario. Geometry is
//! fed through the same [`BoundsReader`] probes a renderer would use and every
//! step ends with a render pass, so assertions observe exactly what a frame
//! would draw. The installed refresh action blocks until a
//! `complete_refresh` step releases it.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use refreshable_core::{RectSource, RefreshMode};
use refreshable_layout::{
    BoundsReader, GeometryProbe, NativeRefreshControl, RefreshEnvironment, RefreshLayout,
    RefreshableScroll,
};
use refreshable_runtime::{ControllerEvent, RefreshAction, RefreshController};
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::headless_assert::{
    evaluate_assert_count, evaluate_assert_layout, evaluate_assert_state, AssertionResult,
};
use crate::headless_report::HeadlessReport;
use crate::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON with the default run configuration.
pub fn run_scenario(input: &str) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, RefreshMode::default(), HeadlessRunConfig::default())
}

/// Execute a pre-loaded scenario on a fresh headless runtime.
///
/// `default_mode` applies when the scenario does not name a mode.
pub fn run_loaded_scenario(
    scenario: &HeadlessScenario,
    default_mode: RefreshMode,
    runtime_cfg: HeadlessRunConfig,
) -> Result<RunOutcome> {
    HeadlessRuntime::block_on(
        &runtime_cfg,
        run_scenario_async(scenario, default_mode, runtime_cfg),
    )?
}

/// Execute a scenario on the current tokio runtime.
pub async fn run_scenario_async(
    scenario: &HeadlessScenario,
    default_mode: RefreshMode,
    runtime_cfg: HeadlessRunConfig,
) -> Result<RunOutcome> {
    runtime_cfg.validate()?;
    let mode = scenario.mode.unwrap_or(default_mode);
    let mut run = ScenarioRun::mount(mode, runtime_cfg)?;
    info!(mode = %mode, steps = scenario.steps.len(), "running headless scenario");

    for (step_index, step) in scenario.steps.iter().enumerate() {
        debug!(step_index, ?step, "scenario step");
        if let Some(report) = run.step(step_index, step).await? {
            info!(step_index, "headless scenario failed");
            return Ok(RunOutcome::Failed { report });
        }
    }

    info!(frames = run.elapsed_frames, "headless scenario passed");
    let report = HeadlessReport::passed(mode.name(), run.elapsed_frames, run.elapsed_ms);
    Ok(RunOutcome::Passed {
        report: run.finish(report),
    })
}

/// Refresh action whose runs block until the scenario releases them.
#[derive(Debug, Clone, Default)]
struct GatedAction {
    gate: Arc<Notify>,
    fail_next: Arc<AtomicBool>,
    runs: Arc<AtomicUsize>,
}

impl GatedAction {
    fn action(&self) -> RefreshAction {
        let gated = self.clone();
        RefreshAction::new(move || {
            let gated = gated.clone();
            async move {
                gated.runs.fetch_add(1, Ordering::SeqCst);
                gated.gate.notified().await;
                if gated.fail_next.swap(false, Ordering::SeqCst) {
                    Err(anyhow!("refresh failed on request"))
                } else {
                    Ok(())
                }
            }
        })
    }

    fn release(&self, fail: bool) {
        self.fail_next.store(fail, Ordering::SeqCst);
        self.gate.notify_one();
    }

    fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

struct ScenarioRun {
    cfg: HeadlessRunConfig,
    mode: RefreshMode,
    scroll: RefreshableScroll,
    controller: RefreshController,
    fixed: BoundsReader,
    moving: BoundsReader,
    native: NativeRefreshControl,
    gated: GatedAction,
    action: RefreshAction,
    action_installed: bool,
    searching: bool,
    /// A running refresh was launched with the gated action
    gated_in_flight: bool,
    layout: RefreshLayout,
    elapsed_frames: u64,
    elapsed_ms: u64,
}

impl ScenarioRun {
    fn mount(mode: RefreshMode, cfg: HeadlessRunConfig) -> Result<Self> {
        let scroll = RefreshableScroll::new().mode(mode);
        let mut controller = scroll.mount()?;
        let (fixed, moving) = scroll.bounds_readers(&controller);
        let native = NativeRefreshControl::new(controller.handle());
        let gated = GatedAction::default();
        let action = gated.action();

        let env = RefreshEnvironment::new().with_action(action.clone());
        let layout = scroll.render(&mut controller, &env);

        Ok(Self {
            cfg,
            mode,
            scroll,
            controller,
            fixed,
            moving,
            native,
            gated,
            action,
            action_installed: true,
            searching: false,
            gated_in_flight: false,
            layout,
            elapsed_frames: 0,
            elapsed_ms: 0,
        })
    }

    /// Run one step, returning a report if it failed
    async fn step(&mut self, step_index: usize, step: &ScenarioStep) -> Result<Option<HeadlessReport>> {
        let result = match step {
            ScenarioStep::Drag { offset } => {
                self.fixed.report(self.cfg.container_rect())?;
                self.moving.report(self.cfg.marker_rect(*offset))?;
                self.frame()?;
                AssertionResult::Passed
            }
            ScenarioStep::Report { source, rect } => {
                match source {
                    RectSource::Fixed => self.fixed.report(*rect)?,
                    RectSource::Moving => self.moving.report(*rect)?,
                };
                self.frame()?;
                AssertionResult::Passed
            }
            ScenarioStep::Trigger => {
                self.native.primary_action_triggered()?;
                self.frame()?;
                AssertionResult::Passed
            }
            ScenarioStep::CompleteRefresh { fail } => self.complete_refresh(*fail).await?,
            ScenarioStep::SetSearching { searching } => {
                self.searching = *searching;
                self.frame()?;
                AssertionResult::Passed
            }
            ScenarioStep::SetAction { present } => {
                self.action_installed = *present;
                self.frame()?;
                AssertionResult::Passed
            }
            ScenarioStep::Tick { frames } => {
                for _ in 0..*frames {
                    tokio::task::yield_now().await;
                    self.frame()?;
                }
                AssertionResult::Passed
            }
            ScenarioStep::Wait { ms } => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                self.drain()?;
                self.render();
                self.elapsed_ms = self.elapsed_ms.saturating_add(*ms);
                AssertionResult::Passed
            }
            ScenarioStep::AssertState(expect) => {
                evaluate_assert_state(expect, &self.controller.snapshot())
            }
            ScenarioStep::AssertRefreshCount { count } => evaluate_assert_count(
                "refresh_count",
                *count,
                self.controller.snapshot().refresh_count,
            ),
            ScenarioStep::AssertActionRuns { count } => {
                evaluate_assert_count("action_runs", *count, self.gated.runs())
            }
            ScenarioStep::AssertLayout(expect) => evaluate_assert_layout(expect, &self.layout),
        };

        Ok(match result {
            AssertionResult::Passed => None,
            AssertionResult::Failed { code, message } => {
                let assertion = step.assertion_name().unwrap_or(match step {
                    ScenarioStep::CompleteRefresh { .. } => "complete_refresh",
                    _ => "step",
                });
                let report = HeadlessReport::failed(
                    self.mode.name(),
                    assertion,
                    step_index,
                    code,
                    message,
                    self.elapsed_frames,
                    self.elapsed_ms,
                );
                Some(self.finish(report))
            }
        })
    }

    async fn complete_refresh(&mut self, fail: bool) -> Result<AssertionResult> {
        self.drain()?;
        if !self.controller.snapshot().refreshing {
            return Ok(AssertionResult::Failed {
                code: "no_refresh".to_string(),
                message: "no refresh is running".to_string(),
            });
        }

        if self.gated_in_flight {
            self.gated.release(fail);
        }

        let timeout = Duration::from_millis(self.cfg.idle_timeout_ms);
        match tokio::time::timeout(timeout, self.controller.wait_until_idle()).await {
            Ok(events) => self.absorb(&events?),
            Err(_) => {
                return Ok(AssertionResult::Failed {
                    code: "refresh_timeout".to_string(),
                    message: format!(
                        "refresh still running after {}ms",
                        self.cfg.idle_timeout_ms
                    ),
                })
            }
        }

        self.frame()?;
        Ok(AssertionResult::Passed)
    }

    /// Apply queued messages, render, and advance the clock by one frame
    fn frame(&mut self) -> Result<()> {
        self.drain()?;
        self.render();
        self.elapsed_frames = self.elapsed_frames.saturating_add(1);
        self.elapsed_ms = self.elapsed_ms.saturating_add(self.cfg.tick_ms);
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        let events = self.controller.process_pending()?;
        self.absorb(&events);
        Ok(())
    }

    fn absorb(&mut self, events: &[ControllerEvent]) {
        for event in events {
            if event.started().is_some() {
                self.gated_in_flight = self.controller.has_action();
            }
            if let ControllerEvent::RefreshFinished { accepted: true, .. } = event {
                self.gated_in_flight = false;
            }
        }
    }

    fn render(&mut self) {
        let mut env = RefreshEnvironment::new().searching(self.searching);
        if self.action_installed {
            env = env.with_action(self.action.clone());
        }
        self.layout = self.scroll.render(&mut self.controller, &env);
    }

    fn finish(&self, report: HeadlessReport) -> HeadlessReport {
        report.with_final_state(self.controller.snapshot(), self.gated.runs())
    }
}
