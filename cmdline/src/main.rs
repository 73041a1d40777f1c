//! `cmdline-probe`: loads its own command line against a small built-in
//! registry and prints what ended up in the store.
//!
//! Set `CMDLINE_PROBE_IGNORE_ERRORS` to scan permissively and
//! `POSIXLY_CORRECT` to stop at the first operand. Logging goes through
//! `RUST_LOG` (default `warn`).

use std::path::Path;
use std::process::ExitCode;

use cmdline::{descriptors, Component, Loader, MemoryStore, OptionDescriptor, OptionKind, Ordering};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn registry() -> Vec<Component> {
    vec![
        Component::new("core")
            .option(OptionDescriptor::hint("Interface"))
            .option(OptionDescriptor::new("verbose", OptionKind::Integer).short('v'))
            .option(OptionDescriptor::new("quiet", OptionKind::Bool).short('q'))
            .option(OptionDescriptor::new("intf", OptionKind::ModuleName).short('I'))
            .option(OptionDescriptor::new("config", OptionKind::File))
            .option(OptionDescriptor::new("key-play-pause", OptionKind::Key))
            .option(OptionDescriptor::hint("Video"))
            .option(OptionDescriptor::new("fullscreen", OptionKind::Bool).short('f'))
            .option(OptionDescriptor::new("width", OptionKind::Integer))
            .option(OptionDescriptor::new("zoom", OptionKind::Float))
            .option(OptionDescriptor::new("scale", OptionKind::Float).deprecated_by("zoom"))
            .option(
                OptionDescriptor::new("overlay", OptionKind::Bool)
                    .deprecated_by("fullscreen")
                    .removed(),
            ),
        Component::new("audio")
            .option(OptionDescriptor::hint("Audio"))
            .option(OptionDescriptor::new("audio", OptionKind::Bool))
            .option(OptionDescriptor::new("volume", OptionKind::Integer))
            .option(OptionDescriptor::new("aout", OptionKind::ModuleList).short('A'))
            .option(OptionDescriptor::new("rate", OptionKind::Float)),
    ]
}

/// Final path component of `argv[0]`, used in diagnostics.
fn program_name(argv0: Option<&str>) -> String {
    argv0
        .and_then(|p| Path::new(p).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or("cmdline-probe")
        .to_string()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut argv: Vec<String> = std::env::args().collect();
    let program = program_name(argv.first().map(String::as_str));

    let loader = Loader::builder(&program)
        .ignore_errors(std::env::var_os("CMDLINE_PROBE_IGNORE_ERRORS").is_some())
        .ordering(Ordering::from_env())
        .build();

    let components = registry();
    let mut store = MemoryStore::new();
    let outcome = match loader.load(descriptors(&components), &mut argv, &mut store) {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!(error = %e, status = e.status(), "command line rejected");
            return ExitCode::FAILURE;
        }
    };

    for (name, value) in store.iter() {
        println!("{}={}", name, value);
    }
    for token in &outcome.unknown_tokens {
        println!("ignored: {}", token);
    }
    for operand in &outcome.operands {
        println!("operand: {}", operand);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_name_is_last_path_component() {
        assert_eq!(program_name(Some("/usr/local/bin/player")), "player");
        assert_eq!(program_name(Some("player")), "player");
        assert_eq!(program_name(None), "cmdline-probe");
        assert_eq!(program_name(Some("")), "cmdline-probe");
    }

    #[cfg(windows)]
    #[test]
    fn program_name_handles_windows_paths() {
        assert_eq!(program_name(Some(r"C:\Program Files\player.exe")), "player.exe");
    }
}
