//! Resolution of a project configuration into simulation settings.

use std::path::{Path, PathBuf};

use lifo_model::StackPolicy;
use lifo_sim::{Clock, SimConfig};

use crate::error::ConfigError;
use crate::types::ProjectConfig;

/// Simulation settings with every string parsed and every path anchored at
/// the project directory.
#[derive(Debug, Clone)]
pub struct ResolvedSim {
    /// The simulation clock.
    pub clock: Clock,
    /// Stack behavior policies.
    pub policy: StackPolicy,
    /// Time limit in femtoseconds.
    pub time_limit: Option<u64>,
    /// Directory holding stimulus scripts.
    pub stimulus_dir: PathBuf,
    /// Directory for waveform files, or `None` when waveforms are disabled.
    pub waveform_dir: Option<PathBuf>,
}

impl ResolvedSim {
    /// Builds a [`SimConfig`] whose waveform, if enabled, is written to
    /// `<waveform_dir>/<stem>.vcd`.
    pub fn sim_config(&self, stem: &str) -> SimConfig {
        let waveform_path = self
            .waveform_dir
            .as_ref()
            .map(|dir| dir.join(format!("{stem}.vcd")));
        SimConfig {
            clock: self.clock,
            policy: self.policy,
            time_limit: self.time_limit,
            record_waveform: waveform_path.is_some(),
            waveform_path,
        }
    }
}

impl Default for ResolvedSim {
    /// Settings used when no `lifo.toml` is present.
    fn default() -> Self {
        Self {
            clock: Clock::default(),
            policy: StackPolicy::default(),
            time_limit: None,
            stimulus_dir: PathBuf::from("stimulus"),
            waveform_dir: Some(PathBuf::from("out")),
        }
    }
}

/// Resolves the simulation settings of a loaded configuration.
pub fn resolve_sim(config: &ProjectConfig, project_dir: &Path) -> Result<ResolvedSim, ConfigError> {
    let waveform_dir = config
        .waveform
        .enabled
        .then(|| project_dir.join(&config.waveform.output_dir));
    Ok(ResolvedSim {
        clock: config.clock.to_clock()?,
        policy: config.model,
        time_limit: config.sim.time_limit_fs()?,
        stimulus_dir: project_dir.join(&config.sim.stimulus_dir),
        waveform_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use lifo_model::UnderflowPolicy;

    #[test]
    fn resolve_full() {
        let config = load_config_from_str(
            r#"
[project]
name = "p"
version = "0.1.0"

[clock]
period = "8ns"

[model]
underflow = "poison"

[sim]
time_limit = "2us"
"#,
        )
        .unwrap();
        let r = resolve_sim(&config, Path::new("/proj")).unwrap();
        assert_eq!(r.clock.period_fs(), 8_000_000);
        assert_eq!(r.policy.underflow, UnderflowPolicy::Poison);
        assert_eq!(r.time_limit, Some(2_000_000_000));
        assert_eq!(r.stimulus_dir, PathBuf::from("/proj/stimulus"));
        assert_eq!(r.waveform_dir, Some(PathBuf::from("/proj/out")));
    }

    #[test]
    fn sim_config_paths() {
        let r = ResolvedSim {
            waveform_dir: Some(PathBuf::from("/proj/out")),
            ..ResolvedSim::default()
        };
        let sc = r.sim_config("push_pop");
        assert!(sc.record_waveform);
        assert_eq!(sc.waveform_path, Some(PathBuf::from("/proj/out/push_pop.vcd")));
    }

    #[test]
    fn disabled_waveform() {
        let config = load_config_from_str(
            "[project]\nname = \"p\"\nversion = \"0.1.0\"\n\n[waveform]\nenabled = false\n",
        )
        .unwrap();
        let r = resolve_sim(&config, Path::new(".")).unwrap();
        assert!(r.waveform_dir.is_none());
        let sc = r.sim_config("x");
        assert!(!sc.record_waveform);
        assert!(sc.waveform_path.is_none());
    }
}
