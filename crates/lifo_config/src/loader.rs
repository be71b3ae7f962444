//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "lifo.toml";

/// Loads and validates a `lifo.toml` configuration from a project directory.
///
/// Reads `<project_dir>/lifo.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `lifo.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates required fields and checks that every duration and frequency
/// string resolves.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.version.is_empty() {
        return Err(ConfigError::MissingField("project.version".to_string()));
    }
    config.clock.to_clock()?;
    config.sim.time_limit_fs()?;
    if config.sim.stimulus_dir.is_empty() {
        return Err(ConfigError::MissingField("sim.stimulus_dir".to_string()));
    }
    if config.waveform.enabled && config.waveform.output_dir.is_empty() {
        return Err(ConfigError::MissingField("waveform.output_dir".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifo_model::{ReadIdlePolicy, UnderflowPolicy};

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "lifo_stack"
version = "0.1.0"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "lifo_stack");
        assert_eq!(config.project.version, "0.1.0");
        assert!(config.project.description.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "lifo_stack"
version = "0.2.0"
description = "16-deep LIFO"

[clock]
frequency = "50MHz"

[model]
underflow = "poison"
read_idle = "hold"

[sim]
time_limit = "1ms"
stimulus_dir = "stim"

[waveform]
enabled = false
output_dir = "waves"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.description, "16-deep LIFO");
        assert_eq!(config.clock.frequency.as_deref(), Some("50MHz"));
        assert_eq!(config.model.underflow, UnderflowPolicy::Poison);
        assert_eq!(config.model.read_idle, ReadIdlePolicy::Hold);
        assert_eq!(config.sim.time_limit.as_deref(), Some("1ms"));
        assert_eq!(config.sim.stimulus_dir, "stim");
        assert!(!config.waveform.enabled);
        assert_eq!(config.waveform.output_dir, "waves");
    }

    #[test]
    fn default_values() {
        let toml = r#"
[project]
name = "test"
version = "0.1.0"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.clock.period.is_none());
        assert!(config.clock.frequency.is_none());
        assert_eq!(config.model.underflow, UnderflowPolicy::Ignore);
        assert_eq!(config.model.read_idle, ReadIdlePolicy::Zero);
        assert!(config.sim.time_limit.is_none());
        assert_eq!(config.sim.stimulus_dir, "stimulus");
        assert!(config.waveform.enabled);
        assert_eq!(config.waveform.output_dir, "out");
    }

    #[test]
    fn missing_name_errors() {
        let toml = r#"
[project]
name = ""
version = "0.1.0"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "project.name"));
    }

    #[test]
    fn missing_project_table_errors() {
        let err = load_config_from_str("[clock]\nperiod = \"10ns\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let toml = "this is not valid toml {{{}}}";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn conflicting_clock_errors() {
        let toml = r#"
[project]
name = "test"
version = "0.1.0"

[clock]
period = "10ns"
frequency = "100MHz"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn bad_policy_name_errors() {
        let toml = r#"
[project]
name = "test"
version = "0.1.0"

[model]
underflow = "explode"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn bad_time_limit_errors() {
        let toml = r#"
[project]
name = "test"
version = "0.1.0"

[sim]
time_limit = "forever"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("sim.time_limit"));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nname = \"disk\"\nversion = \"1.0.0\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "disk");
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
