//! Refreshable App
//!
//! Application-level tooling around a refreshable scroll container:
//!
//! - **Config**: `refreshable.toml` with `[refresh]`, `[headless]` and `[logging]`
//! - **Headless scenarios**: JSON step lists that drag, trigger and complete
//!   refreshes and assert on the published state and layout
//! - **Reports**: Machine-readable JSON results
//!
//! # Example
//!
//! ```rust
//! use refreshable_app::run_scenario;
//!
//! let outcome = run_scenario(r#"{
//!     "steps": [
//!         { "type": "drag", "offset": 0 },
//!         { "type": "drag", "offset": 90 },
//!         { "type": "assert_state", "refreshing": true },
//!         { "type": "complete_refresh" },
//!         { "type": "assert_state", "refreshing": false }
//!     ]
//! }"#).unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod config;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;

pub use config::{LoggingConfig, RefreshSection, RefreshableConfig, CONFIG_FILE_NAME};
pub use headless_assert::AssertionResult;
pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{run_loaded_scenario, run_scenario, run_scenario_async, RunOutcome};
pub use headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
pub use headless_scenario::{HeadlessScenario, LayoutExpectation, ScenarioStep, StateExpectation};
