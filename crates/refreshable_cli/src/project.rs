//! Project scaffolding

use anyhow::{bail, Result};
use refreshable_app::{RefreshableConfig, CONFIG_FILE_NAME};
use refreshable_core::RefreshMode;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding scaffolded scenarios
pub const SCENARIO_DIR: &str = "scenarios";

/// Write `refreshable.toml` and a starter scenario into `path`
///
/// Returns the files written.
pub fn init_project(path: &Path, mode: RefreshMode, force: bool) -> Result<Vec<PathBuf>> {
    let config_path = path.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        bail!(
            "{} already exists. Pass --force to overwrite it.",
            config_path.display()
        );
    }

    fs::create_dir_all(path.join(SCENARIO_DIR))?;

    let mut config = RefreshableConfig::default();
    config.refresh.mode = mode;
    config.validate()?;
    fs::write(&config_path, config.to_toml()?)?;

    let scenario_path = path.join(SCENARIO_DIR).join("pull_to_refresh.json");
    fs::write(&scenario_path, starter_scenario())?;

    Ok(vec![config_path, scenario_path])
}

fn starter_scenario() -> &'static str {
    r#"{
  "steps": [
    { "type": "drag", "offset": 0 },
    { "type": "drag", "offset": 40 },
    { "type": "assert_state", "percentage": 0.5, "refreshing": false },
    { "type": "drag", "offset": 90 },
    { "type": "assert_state", "refreshing": true },
    { "type": "drag", "offset": 20 },
    { "type": "assert_state", "frozen": true },
    { "type": "complete_refresh" },
    { "type": "drag", "offset": 0 },
    { "type": "assert_state", "refreshing": false, "frozen": false },
    { "type": "assert_refresh_count", "count": 1 }
  ]
}
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use refreshable_app::HeadlessScenario;

    #[test]
    fn test_starter_scenario_parses() {
        let scenario = HeadlessScenario::from_json(starter_scenario()).unwrap();
        assert_eq!(scenario.steps.len(), 11);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("refreshable-init-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let written = init_project(&dir, RefreshMode::Navigation, false).unwrap();
        assert_eq!(written.len(), 2);
        let config = RefreshableConfig::load_from_dir(&dir).unwrap();
        assert_eq!(config.refresh.mode, RefreshMode::Navigation);

        assert!(init_project(&dir, RefreshMode::Normal, false).is_err());
        assert!(init_project(&dir, RefreshMode::Normal, true).is_ok());

        fs::remove_dir_all(&dir).unwrap();
    }
}
