//! `lifo init` — project scaffolding command.
//!
//! Creates a project directory with a `lifo.toml` config file, a `stimulus/`
//! directory holding an example push/pop script, and an `out/` directory for
//! waveforms.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lifo_config::CONFIG_FILE;

/// Runs the `lifo init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
pub fn run(name: Option<String>) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        return Err(format!("{CONFIG_FILE} already exists in {}", project_dir.display()).into());
    }

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("lifo_stack");

    eprintln!("  Creating new LIFO project `{project_name}`");

    create_directories(&project_dir)?;
    write_config(&project_dir, project_name)?;
    write_stimulus(&project_dir)?;

    eprintln!("     Created {}", project_dir.join(CONFIG_FILE).display());
    eprintln!(
        "     Created {}",
        project_dir.join("stimulus").join("push_pop.toml").display()
    );

    Ok(0)
}

/// Creates the standard project directories.
fn create_directories(root: &Path) -> io::Result<()> {
    for dir in &["stimulus", "out"] {
        fs::create_dir_all(root.join(dir))?;
    }
    Ok(())
}

/// Writes the `lifo.toml` configuration file.
fn write_config(root: &Path, name: &str) -> io::Result<()> {
    let content = format!(
        r#"[project]
name = "{name}"
version = "0.1.0"

[clock]
period = "10ns"

[model]
# "ignore" leaves the pointer at 0; "poison" makes it unknown until reset.
underflow = "ignore"
# "zero" drives stack_data_out low when stack_re is 0; "hold" keeps it
# until the next reset.
read_idle = "zero"

[sim]
stimulus_dir = "stimulus"

[waveform]
enabled = true
output_dir = "out"
"#
    );
    fs::write(root.join(CONFIG_FILE), content)
}

/// Writes the example stimulus script.
fn write_stimulus(root: &Path) -> io::Result<()> {
    fs::write(root.join("stimulus").join("push_pop.toml"), PUSH_POP)
}

const PUSH_POP: &str = r#"# Push one value and pop it back.
name = "push_pop"

[[step]]
log = "reset"
drive = { stack_reset = 1 }
cycles = 2
expect = { stack_addr_w = 0, empty_o = 1, full_o = 0, stack_data_out = 0 }

[[step]]
log = "write 0xA at the pointer"
drive = { stack_reset = 0, stack_mux_sel = 1, stack_data_1_in = 0xA, stack_we = 1 }
cycles = 1
expect = { stack_data_in_w = 0xA }

[[step]]
log = "push"
drive = { stack_we = 0, stack_push = 1 }
cycles = 1
expect = { stack_addr_w = 1, empty_o = 0 }

[[step]]
log = "pop"
drive = { stack_push = 0, stack_pop = 1 }
cycles = 1
expect = { stack_addr_w = 0, empty_o = 1 }

[[step]]
log = "read back"
drive = { stack_pop = 0, stack_re = 1 }
cycles = 1
expect = { stack_data_out = 0xA }
"#;
