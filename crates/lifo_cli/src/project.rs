//! Project discovery shared by `lifo sim` and `lifo test`.

use std::path::{Path, PathBuf};

use lifo_config::{load_config_from_str, resolve_sim, ResolvedSim, CONFIG_FILE};

use crate::GlobalArgs;

/// A project: its root directory, metadata and resolved simulation settings.
#[derive(Debug)]
pub struct Project {
    /// Directory containing `lifo.toml` (or the working directory).
    pub root: PathBuf,
    /// Project name.
    pub name: String,
    /// Project version.
    pub version: String,
    /// Resolved simulation settings.
    pub sim: ResolvedSim,
}

impl Project {
    /// Default settings rooted at `root`, used when no `lifo.toml` exists.
    fn defaults(root: PathBuf) -> Self {
        let sim = ResolvedSim {
            stimulus_dir: root.join("stimulus"),
            waveform_dir: Some(root.join("out")),
            ..ResolvedSim::default()
        };
        Self {
            root,
            name: "lifo_stack".to_string(),
            version: "0.1.0".to_string(),
            sim,
        }
    }
}

/// Walks up from `start` looking for the nearest directory containing `lifo.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Loads the project selected by the global flags.
///
/// With `--config`, that file (or `lifo.toml` inside that directory) must
/// exist. Without it, the nearest `lifo.toml` above the working directory is
/// used, falling back to defaults when there is none.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    let config_path = match &global.config {
        Some(path) => {
            let p = PathBuf::from(path);
            if p.is_dir() {
                p.join(CONFIG_FILE)
            } else {
                p
            }
        }
        None => {
            let cwd = std::env::current_dir()?;
            match find_project_root(&cwd) {
                Some(root) => root.join(CONFIG_FILE),
                None => {
                    log::debug!("no {CONFIG_FILE} found above {}, using defaults", cwd.display());
                    return Ok(Project::defaults(cwd));
                }
            }
        }
    };
    load_project_file(&config_path)
}

/// Loads a project from an explicit configuration file.
pub fn load_project_file(config_path: &Path) -> Result<Project, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(config_path)
        .map_err(|e| format!("cannot read {}: {e}", config_path.display()))?;
    let config = load_config_from_str(&content)?;
    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    log::debug!("loaded {}", config_path.display());
    let sim = resolve_sim(&config, &root)?;
    Ok(Project {
        root,
        name: config.project.name,
        version: config.project.version,
        sim,
    })
}
