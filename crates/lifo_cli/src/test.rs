//! `lifo test` — run the built-in testbenches.
//!
//! Runs the selected testbenches in suite order on one simulation, then
//! reports per-test pass/fail status and a summary line.

use lifo_sim::{run_harness, TestOutcome, TestSelector};

use crate::project::load_project;
use crate::{GlobalArgs, TestArgs};

/// Stem of the waveform file written for a harness run.
const WAVEFORM_STEM: &str = "harness";

/// Runs the `lifo test` command.
///
/// Returns exit code 0 if all selected testbenches pass, 1 if any fail.
pub fn run(args: &TestArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;

    if !global.quiet {
        eprintln!("   Testing {} v{}", project.name, project.version);
    }

    let selector = selector(args.name.as_deref(), args.filter.as_deref());
    let mut sim_config = project.sim.sim_config(WAVEFORM_STEM);
    if args.no_waveform {
        sim_config.record_waveform = false;
    }

    let (outcomes, result) = run_harness(&selector, &sim_config)?;

    if outcomes.is_empty() {
        if !global.quiet {
            eprintln!("warning: no testbenches match the given filter");
        }
        return Ok(0);
    }

    if !global.quiet {
        for outcome in &outcomes {
            print_test_result(outcome);
        }
    }

    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = outcomes.len() - passed;

    if !global.quiet {
        eprintln!();
        eprintln!(
            "   Result: {passed} passed, {failed} failed out of {} testbench(es) ({} cycles)",
            outcomes.len(),
            result.cycles
        );
        if sim_config.record_waveform {
            if let Some(path) = &sim_config.waveform_path {
                eprintln!("   Waveform: {}", path.display());
            }
        }
    }

    if failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Builds a selector from the positional name and the `--filter` substring.
/// The exact name wins when both are given.
fn selector(name: Option<&str>, filter: Option<&str>) -> TestSelector {
    match (name, filter) {
        (Some(n), _) => TestSelector::Exact(n.to_string()),
        (None, Some(f)) => TestSelector::Contains(f.to_string()),
        (None, None) => TestSelector::All,
    }
}

/// Prints the result of a single testbench run.
fn print_test_result(outcome: &TestOutcome) {
    if outcome.passed {
        eprintln!(
            "   PASS  {name} ({time})",
            name = outcome.name,
            time = outcome.end_time,
        );
    } else if let Some(ref err) = outcome.error {
        eprintln!("   FAIL  {name}: {err}", name = outcome.name);
    } else {
        eprintln!(
            "   FAIL  {name}: {count} check(s) failed",
            name = outcome.name,
            count = outcome.failures.len(),
        );
        for failure in &outcome.failures {
            eprintln!("         {failure}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn global(project_dir: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(project_dir.join("lifo.toml").to_str().unwrap().to_string()),
        }
    }

    fn init_project(tmp: &TempDir) -> std::path::PathBuf {
        let dir = tmp.path().join("test_proj");
        crate::init::run(Some(dir.to_str().unwrap().to_string())).unwrap();
        dir
    }

    #[test]
    fn selector_from_args() {
        assert_eq!(selector(None, None), TestSelector::All);
        assert_eq!(
            selector(Some("full_flag"), None),
            TestSelector::Exact("full_flag".into())
        );
        assert_eq!(
            selector(None, Some("flag")),
            TestSelector::Contains("flag".into())
        );
        assert_eq!(
            selector(Some("pop_operation"), Some("flag")),
            TestSelector::Exact("pop_operation".into())
        );
    }

    #[test]
    fn test_end_to_end_on_init_project() {
        let tmp = TempDir::new().unwrap();
        let dir = init_project(&tmp);
        let args = TestArgs {
            name: None,
            filter: None,
            no_waveform: false,
        };
        assert_eq!(run(&args, &global(&dir)).unwrap(), 0);
        assert!(dir.join("out").join("harness.vcd").is_file());
    }

    #[test]
    fn filtered_run_without_waveform() {
        let tmp = TempDir::new().unwrap();
        let dir = init_project(&tmp);
        fs::remove_dir_all(dir.join("out")).unwrap();
        let args = TestArgs {
            name: None,
            filter: Some("flag".to_string()),
            no_waveform: true,
        };
        assert_eq!(run(&args, &global(&dir)).unwrap(), 0);
        assert!(!dir.join("out").exists());
    }

    #[test]
    fn poison_policy_fails_empty_flag() {
        let tmp = TempDir::new().unwrap();
        let dir = init_project(&tmp);
        let toml = fs::read_to_string(dir.join("lifo.toml"))
            .unwrap()
            .replace("underflow = \"ignore\"", "underflow = \"poison\"");
        fs::write(dir.join("lifo.toml"), toml).unwrap();
        let args = TestArgs {
            name: Some("empty_flag".to_string()),
            filter: None,
            no_waveform: true,
        };
        assert_eq!(run(&args, &global(&dir)).unwrap(), 1);
    }

    #[test]
    fn no_match_is_not_failure() {
        let tmp = TempDir::new().unwrap();
        let dir = init_project(&tmp);
        let args = TestArgs {
            name: Some("bogus".to_string()),
            filter: None,
            no_waveform: true,
        };
        assert_eq!(run(&args, &global(&dir)).unwrap(), 0);
    }
}
