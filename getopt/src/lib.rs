//! POSIX/GNU style argument scanner.
//!
//! The scanner is driven by two caller-supplied tables:
//! - a packed short-option spec (`"ab:v::"`), parsed into a [`ShortSpec`]
//! - a slice of long options implementing [`LongSpec`]
//!
//! Scanning yields [`Event`]s. Once the scan ends, operands are moved behind
//! the options in the scanned slice, which is how `getopt_long` leaves `argv`
//! after permuting it. Every [`Scanner`] starts from a fresh cursor, so there
//! is no state shared between scans.

use std::fmt;

// ============================================================================
// Result and Error types
// ============================================================================

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    BadSpec(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadSpec(s) => write!(f, "invalid short option spec: {}", s),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Argument arity and scan ordering
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasArg {
    No,
    Required,
    /// Only an attached value counts (`-v2`, `--name=value`).
    Optional,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ordering {
    /// Operands are skipped and moved to the end once the scan is over.
    #[default]
    Permute,
    /// Scanning stops at the first operand.
    RequireOrder,
}

impl Ordering {
    /// `RequireOrder` when `POSIXLY_CORRECT` is set, `Permute` otherwise.
    pub fn from_env() -> Self {
        if std::env::var_os("POSIXLY_CORRECT").is_some() {
            Ordering::RequireOrder
        } else {
            Ordering::Permute
        }
    }
}

// ============================================================================
// ShortSpec — parsed packed short-option string
// ============================================================================

#[derive(Debug, Clone)]
pub struct ShortSpec {
    slots: [Option<HasArg>; 256],
    ordering: Option<Ordering>,
}

impl ShortSpec {
    /// Parse a packed spec: each flag optionally followed by `:` (required
    /// argument) or `::` (optional argument). A leading `+` selects
    /// [`Ordering::RequireOrder`].
    ///
    /// A flag listed more than once takes the arity of its last occurrence.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut slots = [None; 256];
        let mut ordering = None;
        let mut chars = spec.chars().peekable();

        if chars.peek() == Some(&'+') {
            chars.next();
            ordering = Some(Ordering::RequireOrder);
        }

        while let Some(c) = chars.next() {
            if c == ':' || c == '-' || !c.is_ascii_graphic() {
                return Err(Error::BadSpec(format!(
                    "'{}' cannot be a short option",
                    c.escape_default()
                )));
            }
            let mut colons = 0;
            while chars.peek() == Some(&':') {
                chars.next();
                colons += 1;
            }
            let has_arg = match colons {
                0 => HasArg::No,
                1 => HasArg::Required,
                2 => HasArg::Optional,
                _ => return Err(Error::BadSpec(format!("too many ':' after '{}'", c))),
            };
            slots[c as usize] = Some(has_arg);
        }

        Ok(ShortSpec { slots, ordering })
    }

    pub fn get(&self, flag: char) -> Option<HasArg> {
        u8::try_from(flag)
            .ok()
            .and_then(|byte| self.slots[byte as usize])
    }

    /// `RequireOrder` when the spec string starts with `+`.
    pub fn ordering(&self) -> Option<Ordering> {
        self.ordering
    }
}

// ============================================================================
// LongSpec — what the scanner needs to know about a long option
// ============================================================================

pub trait LongSpec {
    fn name(&self) -> &str;
    fn has_arg(&self) -> HasArg;
}

// ============================================================================
// Event
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `index` points into the long-option slice given to the scanner.
    Long { index: usize, arg: Option<String> },
    Short { flag: char, arg: Option<String> },
    /// Unknown option, unwanted argument, or missing required argument.
    /// `flag` is set when the failure is tied to a short flag.
    Unknown { flag: Option<char>, token: String },
}

// ============================================================================
// Scanner
// ============================================================================

pub struct Scanner<'a, 't, L> {
    args: &'a mut [String],
    shorts: &'t ShortSpec,
    longs: &'t [L],
    ordering: Ordering,
    cursor: usize,
    // (arg index, byte offset) of the next flag inside a short cluster
    cluster: Option<(usize, usize)>,
    consumed: Vec<usize>,
    operands: Vec<usize>,
    first_operand: Option<usize>,
}

impl<'a, 't, L: LongSpec> Scanner<'a, 't, L> {
    /// `args[0]` is the program name and is never scanned.
    pub fn new(args: &'a mut [String], shorts: &'t ShortSpec, longs: &'t [L]) -> Self {
        Scanner {
            args,
            shorts,
            longs,
            ordering: shorts.ordering().unwrap_or_default(),
            cursor: 1,
            cluster: None,
            consumed: Vec::new(),
            operands: Vec::new(),
            first_operand: None,
        }
    }

    /// Select the ordering. A `+` at the start of the short spec wins.
    pub fn ordering(mut self, ordering: Ordering) -> Self {
        if self.shorts.ordering().is_none() {
            self.ordering = ordering;
        }
        self
    }

    /// Index of the first operand once the scan has finished.
    pub fn optind(&self) -> Option<usize> {
        self.first_operand
    }

    /// Operands in their final order. Empty until the scan has finished.
    pub fn operands(&self) -> &[String] {
        match self.first_operand {
            Some(first) => &self.args[first..],
            None => &[],
        }
    }

    pub fn next_event(&mut self) -> Option<Event> {
        if self.first_operand.is_some() {
            return None;
        }
        loop {
            if let Some((index, offset)) = self.cluster {
                match self.short_step(index, offset) {
                    Some(event) => return Some(event),
                    None => continue,
                }
            }

            if self.cursor >= self.args.len() {
                self.finish();
                return None;
            }

            let arg = self.args[self.cursor].as_str();
            let is_terminator = arg == "--";
            let is_operand = arg == "-" || !arg.starts_with('-');
            let is_long = arg.starts_with("--");

            if is_terminator {
                self.consumed.push(self.cursor);
                self.operands.extend(self.cursor + 1..self.args.len());
                self.cursor = self.args.len();
                self.finish();
                return None;
            }

            if is_operand {
                match self.ordering {
                    Ordering::RequireOrder => {
                        self.operands.extend(self.cursor..self.args.len());
                        self.cursor = self.args.len();
                        self.finish();
                        return None;
                    }
                    Ordering::Permute => {
                        self.operands.push(self.cursor);
                        self.cursor += 1;
                        continue;
                    }
                }
            }

            let index = self.cursor;
            self.consumed.push(index);
            self.cursor += 1;
            if is_long {
                return Some(self.long_step(index));
            }
            self.cluster = Some((index, 1));
        }
    }

    fn short_step(&mut self, index: usize, offset: usize) -> Option<Event> {
        let token = self.args[index].clone();
        let flag = match token[offset..].chars().next() {
            Some(c) => c,
            None => {
                self.cluster = None;
                return None;
            }
        };
        let next = offset + flag.len_utf8();
        let rest = &token[next..];
        self.cluster = if rest.is_empty() {
            None
        } else {
            Some((index, next))
        };

        let event = match self.shorts.get(flag) {
            None => Event::Unknown {
                flag: Some(flag),
                token: token.clone(),
            },
            Some(HasArg::No) => Event::Short { flag, arg: None },
            Some(HasArg::Optional) => {
                self.cluster = None;
                Event::Short {
                    flag,
                    arg: (!rest.is_empty()).then(|| rest.to_string()),
                }
            }
            Some(HasArg::Required) => {
                self.cluster = None;
                if !rest.is_empty() {
                    Event::Short {
                        flag,
                        arg: Some(rest.to_string()),
                    }
                } else if let Some(value) = self.take_next() {
                    Event::Short {
                        flag,
                        arg: Some(value),
                    }
                } else {
                    Event::Unknown {
                        flag: Some(flag),
                        token: token.clone(),
                    }
                }
            }
        };
        Some(event)
    }

    fn long_step(&mut self, index: usize) -> Event {
        let token = self.args[index].clone();
        let body = &token[2..];
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (body, None),
        };

        // Exact match only: the table holds fully spelled-out names.
        let found = if name.is_empty() {
            None
        } else {
            self.longs.iter().position(|l| l.name() == name)
        };
        let position = match found {
            Some(p) => p,
            None => return Event::Unknown { flag: None, token },
        };

        let arg = match (self.longs[position].has_arg(), value) {
            (HasArg::No, Some(_)) => return Event::Unknown { flag: None, token },
            (HasArg::No, None) => None,
            (HasArg::Optional, value) => value,
            (HasArg::Required, Some(value)) => Some(value),
            (HasArg::Required, None) => match self.take_next() {
                Some(value) => Some(value),
                None => return Event::Unknown { flag: None, token },
            },
        };
        Event::Long {
            index: position,
            arg,
        }
    }

    fn take_next(&mut self) -> Option<String> {
        if self.cursor >= self.args.len() {
            return None;
        }
        let value = self.args[self.cursor].clone();
        self.consumed.push(self.cursor);
        self.cursor += 1;
        Some(value)
    }

    /// Partition `args` into program name, options, operands.
    fn finish(&mut self) {
        if self.first_operand.is_some() {
            return;
        }
        let mut order = Vec::with_capacity(self.args.len());
        if !self.args.is_empty() {
            order.push(0);
        }
        order.extend(self.consumed.iter().copied());
        let first = order.len();
        order.extend(self.operands.iter().copied());

        let taken: Vec<String> = order
            .iter()
            .map(|&i| std::mem::take(&mut self.args[i]))
            .collect();
        for (slot, value) in self.args.iter_mut().zip(taken) {
            *slot = value;
        }
        self.first_operand = Some(first);
    }
}

impl<L: LongSpec> Iterator for Scanner<'_, '_, L> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.next_event()
    }
}
