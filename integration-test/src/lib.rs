//! Test driver for cmdline integration tests.
//!
//! Builds `cmdline-probe` once per test binary and runs it with a clean
//! environment, capturing exit status, stdout and stderr.

use std::process::Command;
use std::sync::Once;

static BUILD_INIT: Once = Once::new();

/// Result of one probe run.
#[derive(Debug)]
pub struct ProbeRun {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProbeRun {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout lines, in order.
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }

    /// Value printed for `name`, if any.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.stdout
            .lines()
            .find_map(|line| line.strip_prefix(name)?.strip_prefix('='))
    }

    pub fn operands(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .filter_map(|line| line.strip_prefix("operand: "))
            .collect()
    }

    pub fn ignored(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .filter_map(|line| line.strip_prefix("ignored: "))
            .collect()
    }
}

fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    format!("{manifest_dir}/..")
}

fn target_dir() -> String {
    match std::env::var("CARGO_TARGET_DIR") {
        Ok(dir) => format!("{dir}/debug"),
        Err(_) => format!("{}/target/debug", workspace_root()),
    }
}

pub fn probe_binary() -> String {
    format!("{}/cmdline-probe", target_dir())
}

/// Build the probe binary if not already done.
pub fn ensure_probe() {
    BUILD_INIT.call_once(|| {
        let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".into());
        let status = Command::new(cargo)
            .args(["build", "-p", "cmdline", "--bin", "cmdline-probe"])
            .current_dir(workspace_root())
            .status()
            .expect("failed to run cargo build");
        assert!(status.success(), "cargo build -p cmdline failed");
    });
}

/// Run the probe with `args` and extra environment `env`.
///
/// `POSIXLY_CORRECT`, `CMDLINE_PROBE_IGNORE_ERRORS` and `RUST_LOG` are
/// cleared first so the caller's environment does not leak in.
pub fn run_probe(args: &[&str], env: &[(&str, &str)]) -> std::io::Result<ProbeRun> {
    ensure_probe();
    let mut cmd = Command::new(probe_binary());
    cmd.args(args)
        .env_remove("POSIXLY_CORRECT")
        .env_remove("CMDLINE_PROBE_IGNORE_ERRORS")
        .env_remove("RUST_LOG");
    for (k, v) in env {
        cmd.env(k, v);
    }
    let output = cmd.output()?;
    Ok(ProbeRun {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
