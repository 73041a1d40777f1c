//! Loading a command line into a configuration store.
//!
//! [`Loader`] owns the policy: it builds the option tables for the call,
//! drives the scanner, hands each match to the [`Resolver`], and decides
//! whether a bad option aborts the call (strict) or is skipped (permissive).
//! Permissive mode scans a private copy of `argv`, so the caller's array
//! keeps its order. Strict mode scans the caller's array in place.

use std::io::Write;
use getopt::{Event, Ordering, Scanner, ShortSpec};
use tracing::{debug, error, trace, warn};

use crate::descriptor::{OptionDescriptor, OptionKind};
use crate::error::{CmdlineError, Result};
use crate::index::DescriptorIndex;
use crate::keys::{KeyTranslator, StandardKeys};
use crate::resolve::{redirect, Redirect, Resolver};
use crate::store::ConfigStore;
use crate::tables::{build_long_options, build_short_options};

/// One matched option.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognized<'a> {
    /// Descriptor the token matched, before any redirection.
    pub descriptor: &'a OptionDescriptor,
    pub raw: Option<String>,
    pub negated: bool,
    /// Descriptor the value was written under, `None` if it was dropped.
    pub stored_as: Option<&'a OptionDescriptor>,
}

#[derive(Debug, Default)]
pub struct ParseOutcome<'a> {
    pub recognized: Vec<Recognized<'a>>,
    /// Skipped options (permissive mode only).
    pub unknown_tokens: Vec<String>,
    /// Non-option arguments in their final order.
    pub operands: Vec<String>,
    /// Logical argument count, after platform argument stripping.
    pub argc: usize,
}

/// `0` on success, `-1` on failure.
pub fn status<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.status(),
    }
}

/// True when `argv[1]` is a process serial number injected by the macOS
/// launcher (`-psn_0_9306113`).
pub fn has_platform_argument(argv: &[String]) -> bool {
    argv.get(1).is_some_and(|arg| arg.starts_with("-psn"))
}

// ============================================================================
// LoaderBuilder
// ============================================================================

pub struct LoaderBuilder {
    program: String,
    ignore_errors: bool,
    verbosity_flag: char,
    ordering: Ordering,
    keys: Box<dyn KeyTranslator + Send + Sync>,
}

impl LoaderBuilder {
    pub fn new(program: &str) -> Self {
        LoaderBuilder {
            program: program.to_string(),
            ignore_errors: false,
            verbosity_flag: 'v',
            ordering: Ordering::Permute,
            keys: Box::new(StandardKeys),
        }
    }

    /// Skip unknown options and redirect deprecated ones instead of failing.
    pub fn ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    pub fn verbosity_flag(mut self, flag: char) -> Self {
        self.verbosity_flag = flag;
        self
    }

    pub fn ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn keys<K>(mut self, keys: K) -> Self
    where
        K: KeyTranslator + Send + Sync + 'static,
    {
        self.keys = Box::new(keys);
        self
    }

    pub fn build(self) -> Loader {
        Loader {
            program: self.program,
            ignore_errors: self.ignore_errors,
            verbosity_flag: self.verbosity_flag,
            ordering: self.ordering,
            keys: self.keys,
        }
    }
}

// ============================================================================
// Loader
// ============================================================================

pub struct Loader {
    program: String,
    ignore_errors: bool,
    verbosity_flag: char,
    ordering: Ordering,
    keys: Box<dyn KeyTranslator + Send + Sync>,
}

impl Loader {
    pub fn builder(program: &str) -> LoaderBuilder {
        LoaderBuilder::new(program)
    }

    /// Load `argv` into `store`, printing diagnostics on standard error.
    pub fn load<'a, I, S>(
        &self,
        descriptors: I,
        argv: &mut [String],
        store: &mut S,
    ) -> Result<ParseOutcome<'a>>
    where
        I: IntoIterator<Item = &'a OptionDescriptor>,
        S: ConfigStore + ?Sized,
    {
        let stderr = std::io::stderr();
        let mut diagnostics = stderr.lock();
        self.load_with(descriptors, argv, store, &mut diagnostics)
    }

    /// Like [`load`](Self::load), with diagnostics written to `diagnostics`.
    pub fn load_with<'a, I, S, W>(
        &self,
        descriptors: I,
        argv: &mut [String],
        store: &mut S,
        diagnostics: &mut W,
    ) -> Result<ParseOutcome<'a>>
    where
        I: IntoIterator<Item = &'a OptionDescriptor>,
        S: ConfigStore + ?Sized,
        W: Write + ?Sized,
    {
        if cfg!(target_os = "macos") && has_platform_argument(argv) {
            debug!(argument = %argv[1], "launcher argument, command line skipped");
            return Ok(ParseOutcome {
                argc: argv.len() - 1,
                ..ParseOutcome::default()
            });
        }

        let index = DescriptorIndex::new(descriptors);
        let longs = build_long_options(&index).inspect_err(|e| error!("{}", e))?;
        let shorts = build_short_options(&index, self.verbosity_flag).inspect_err(|e| error!("{}", e))?;
        let spec = ShortSpec::parse(shorts.spec())?;
        debug!(
            options = index.len(),
            bools = index.bool_count(),
            long_entries = longs.len(),
            short_spec = shorts.spec(),
            ignore_errors = self.ignore_errors,
            "option tables ready"
        );

        let mut outcome = ParseOutcome {
            argc: argv.len(),
            ..ParseOutcome::default()
        };

        let mut private = Vec::new();
        let args: &mut [String] = if self.ignore_errors {
            private
                .try_reserve_exact(argv.len())
                .map_err(|e| CmdlineError::Allocation(format!("argument copy: {}", e)))
                .inspect_err(|e| error!("{}", e))?;
            private.extend_from_slice(argv);
            private.as_mut_slice()
        } else {
            argv
        };

        let mut resolver = Resolver::new(store, &*self.keys, self.verbosity_flag);
        let mut scanner = Scanner::new(args, &spec, longs.entries()).ordering(self.ordering);

        while let Some(event) = scanner.next_event() {
            trace!(?event, "scanned");
            let (matched, raw, negated, flag) = match event {
                Event::Long { index: position, arg } => {
                    let entry = &longs.entries()[position];
                    match index.find(entry.base_name()) {
                        Some(d) => (d, arg, entry.is_negation_form(), None),
                        None => {
                            let token = format!("--{}", entry.base_name());
                            self.unknown(diagnostics, &mut outcome, None, token)?;
                            continue;
                        }
                    }
                }
                Event::Short { flag, arg } => match shorts.get(flag) {
                    Some(d) => (d, arg, false, Some(flag)),
                    None => {
                        let token = format!("-{}", flag);
                        self.unknown(diagnostics, &mut outcome, Some(flag), token)?;
                        continue;
                    }
                },
                Event::Unknown { flag, token } => {
                    self.unknown(diagnostics, &mut outcome, flag, token)?;
                    continue;
                }
            };

            let mut stored_as = self.settle(&index, matched, diagnostics)?;
            if let Some(target) = stored_as {
                if flag == Some(self.verbosity_flag) && target.kind() == OptionKind::Integer {
                    resolver.bump_verbosity(target, raw.as_deref());
                } else if !resolver.store(target, raw.as_deref(), negated) {
                    stored_as = None;
                }
            }
            outcome.recognized.push(Recognized {
                descriptor: matched,
                raw,
                negated,
                stored_as,
            });
        }

        outcome.operands = scanner.operands().to_vec();
        Ok(outcome)
    }

    /// Apply the deprecation policy to a matched descriptor.
    fn settle<'a, W: Write + ?Sized>(
        &self,
        index: &DescriptorIndex<'a>,
        matched: &'a OptionDescriptor,
        diagnostics: &mut W,
    ) -> Result<Option<&'a OptionDescriptor>> {
        match redirect(index, matched) {
            Redirect::Direct(d) => Ok(Some(d)),
            Redirect::Removed(d) => {
                let _ = writeln!(diagnostics, "Warning: option --{} no longer exists.", d.name());
                Ok(None)
            }
            Redirect::Deprecated {
                old,
                replacement,
                target,
            } => {
                let severity = if self.ignore_errors { "Warning" } else { "Error" };
                let _ = writeln!(
                    diagnostics,
                    "{}: option --{} is deprecated. Use --{} instead.",
                    severity,
                    old.name(),
                    replacement
                );
                if !self.ignore_errors {
                    return Err(CmdlineError::DeprecatedOption {
                        name: old.name().to_string(),
                        replacement: replacement.to_string(),
                    });
                }
                if target.is_none() {
                    warn!(option = old.name(), replacement, "replacement not registered, value dropped");
                }
                Ok(target)
            }
        }
    }

    /// Skip the option, or fail with a diagnostic in strict mode.
    fn unknown<W: Write + ?Sized>(
        &self,
        diagnostics: &mut W,
        outcome: &mut ParseOutcome<'_>,
        flag: Option<char>,
        token: String,
    ) -> Result<()> {
        let option = match flag {
            Some(c) => format!("-{}", c),
            None => token,
        };
        if self.ignore_errors {
            trace!(%option, "unknown option ignored");
            outcome.unknown_tokens.push(option);
            return Ok(());
        }

        let error = CmdlineError::UnknownOption {
            program: self.program.clone(),
            option,
        };
        let _ = writeln!(diagnostics, "{}", error);
        let _ = writeln!(
            diagnostics,
            "Try `{} --help' for more information.",
            self.program
        );
        Err(error)
    }
}
