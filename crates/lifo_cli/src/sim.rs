//! `lifo sim` — run a single stimulus script.
//!
//! Resolves the script, builds a simulation from the project settings and
//! command-line overrides, runs it, prints failed expectations to stderr and
//! optionally records a VCD waveform.

use std::path::{Path, PathBuf};

use lifo_sim::{parse_duration, Stimulus};

use crate::project::load_project;
use crate::{GlobalArgs, SimArgs};

/// Runs the `lifo sim` command.
///
/// Returns exit code 0 if every expectation held, 1 otherwise.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let path = resolve_stimulus(&args.stimulus, &project.root, &project.sim.stimulus_dir)?;
    let stimulus = Stimulus::load(&path)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("stimulus")
        .to_string();
    let name = stimulus.name.clone().unwrap_or_else(|| stem.clone());

    if !global.quiet {
        eprintln!("   Simulating {name} ({} steps)", stimulus.steps.len());
    }

    let mut sim_config = project.sim.sim_config(&stem);
    if let Some(t) = &args.time {
        sim_config.time_limit = Some(parse_duration(t)?);
    }
    if let Some(out) = &args.output {
        sim_config.waveform_path = Some(PathBuf::from(out));
        sim_config.record_waveform = true;
    }
    if args.no_waveform {
        sim_config.record_waveform = false;
    }

    let result = lifo_sim::simulate(&stimulus, &sim_config)?;

    for failure in &result.check_failures {
        eprintln!("CHECK FAILED: {failure}");
    }

    if !global.quiet {
        eprintln!(
            "   Simulation finished at {} ({} cycles)",
            result.final_time, result.cycles
        );
        if sim_config.record_waveform {
            if let Some(path) = &sim_config.waveform_path {
                eprintln!("   Waveform: {}", path.display());
            }
        }
    }

    if result.check_failures.is_empty() {
        Ok(0)
    } else {
        if !global.quiet {
            eprintln!(
                "   FAILED: {} expectation(s) failed",
                result.check_failures.len()
            );
        }
        Ok(1)
    }
}

/// Resolves a stimulus argument to a file path.
///
/// Tries: (1) the path as given, (2) relative to the project root,
/// (3) a script of that name in the stimulus directory, with or without
/// the `.toml` extension.
fn resolve_stimulus(
    arg: &str,
    project_dir: &Path,
    stimulus_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = PathBuf::from(arg);
    if path.is_file() {
        return Ok(path);
    }

    let rel_path = project_dir.join(arg);
    if rel_path.is_file() {
        return Ok(rel_path);
    }

    let in_dir = stimulus_dir.join(arg);
    if in_dir.is_file() {
        return Ok(in_dir);
    }
    let with_ext = stimulus_dir.join(format!("{arg}.toml"));
    if with_ext.is_file() {
        return Ok(with_ext);
    }

    Err(format!("stimulus not found: '{arg}'").into())
}
