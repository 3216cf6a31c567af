//! Report output model for headless refresh runs.

use anyhow::{bail, Result};
use refreshable_core::RefreshSnapshot;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Machine-readable result of a headless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub mode: String,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    /// Times the refresh action actually ran.
    pub action_runs: usize,
    /// Published state when the run ended.
    pub final_state: RefreshSnapshot,
}

impl HeadlessReport {
    pub fn passed(mode: &str, elapsed_frames: u64, elapsed_ms: u64) -> Self {
        Self {
            status: ReportStatus::Passed,
            mode: mode.to_string(),
            failed_step_index: None,
            assertion: None,
            code: None,
            message: None,
            elapsed_frames,
            elapsed_ms,
            action_runs: 0,
            final_state: RefreshSnapshot::default(),
        }
    }

    pub fn failed(
        mode: &str,
        assertion: &str,
        failed_step_index: usize,
        code: String,
        message: String,
        elapsed_frames: u64,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            mode: mode.to_string(),
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            code: Some(code),
            message: Some(message),
            elapsed_frames,
            elapsed_ms,
            action_runs: 0,
            final_state: RefreshSnapshot::default(),
        }
    }

    /// Attach the state observed at the end of the run.
    pub fn with_final_state(mut self, final_state: RefreshSnapshot, action_runs: usize) -> Self {
        self.final_state = final_state;
        self.action_runs = action_runs;
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if path.is_absolute() || path.has_root() {
            bail!("report path must be relative and must not start with a separator");
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            bail!("report path cannot contain '..' or drive prefixes");
        }
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_escaping_paths() {
        let report = HeadlessReport::passed("normal", 0, 0);
        assert!(report.write_to_path(Path::new("/tmp/report.json")).is_err());
        assert!(report.write_to_path(Path::new("../report.json")).is_err());
    }

    #[test]
    fn test_writer_output_is_json() {
        let report = HeadlessReport::failed(
            "navigation",
            "assert_state",
            3,
            "frozen_mismatch".to_string(),
            "frozen: expected true, got false".to_string(),
            4,
            64,
        )
        .with_final_state(
            RefreshSnapshot {
                refreshing: true,
                refresh_count: 1,
                ..Default::default()
            },
            1,
        );

        let mut out = Vec::new();
        report.write_to_writer(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["mode"], "navigation");
        assert_eq!(value["failed_step_index"], 3);
        assert_eq!(value["code"], "frozen_mismatch");
        assert_eq!(value["action_runs"], 1);
        assert_eq!(value["final_state"]["refreshing"], true);
        assert_eq!(value["final_state"]["refresh_count"], 1);
        assert!(!report.is_passed());
    }
}
