//! Long and short option tables synthesized from a [`DescriptorIndex`].
//!
//! The long table gets one entry per descriptor plus `--no<name>` and
//! `--no-<name>` for every Bool, and ends with a terminator slot. The short
//! table is a 256-slot direct-address array keyed by flag byte, together with
//! the packed spec string the scanner parses.

use getopt::{HasArg, LongSpec};
use tracing::warn;

use crate::descriptor::{OptionDescriptor, OptionKind};
use crate::error::{CmdlineError, Result};
use crate::index::DescriptorIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakesArgument {
    None,
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LongOptionEntry {
    Primary {
        name: String,
        takes_argument: TakesArgument,
    },
    /// `no<name>` or, when `hyphenated`, `no-<name>`.
    Negation { name: String, hyphenated: bool },
    Terminator,
}

impl LongOptionEntry {
    pub fn external_name(&self) -> Option<&str> {
        match self {
            LongOptionEntry::Primary { name, .. } | LongOptionEntry::Negation { name, .. } => {
                Some(name)
            }
            LongOptionEntry::Terminator => None,
        }
    }

    pub fn takes_argument(&self) -> TakesArgument {
        match self {
            LongOptionEntry::Primary { takes_argument, .. } => *takes_argument,
            _ => TakesArgument::None,
        }
    }

    pub fn is_negation_form(&self) -> bool {
        matches!(self, LongOptionEntry::Negation { .. })
    }

    /// Name of the descriptor this entry was generated from.
    pub fn base_name(&self) -> &str {
        match self {
            LongOptionEntry::Primary { name, .. } => name,
            LongOptionEntry::Negation { name, hyphenated } => {
                let prefix = if *hyphenated { "no-" } else { "no" };
                name.strip_prefix(prefix).unwrap_or(name)
            }
            LongOptionEntry::Terminator => "",
        }
    }
}

impl LongSpec for LongOptionEntry {
    fn name(&self) -> &str {
        self.external_name().unwrap_or("")
    }

    fn has_arg(&self) -> HasArg {
        match self.takes_argument() {
            TakesArgument::None => HasArg::No,
            TakesArgument::Required => HasArg::Required,
        }
    }
}

pub struct LongOptionTable {
    slots: Vec<LongOptionEntry>,
}

impl LongOptionTable {
    /// Live entries, terminator excluded.
    pub fn entries(&self) -> &[LongOptionEntry] {
        match self.slots.split_last() {
            Some((LongOptionEntry::Terminator, live)) => live,
            _ => &self.slots,
        }
    }

    /// Every slot, terminator included.
    pub fn slots(&self) -> &[LongOptionEntry] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Allocate `prefix + name`, or `None` if the allocation cannot be made.
fn owned_name(prefix: &str, name: &str) -> Option<String> {
    let mut s = String::new();
    s.try_reserve_exact(prefix.len() + name.len()).ok()?;
    s.push_str(prefix);
    s.push_str(name);
    Some(s)
}

pub fn build_long_options(index: &DescriptorIndex<'_>) -> Result<LongOptionTable> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(index.long_slot_count())
        .map_err(|e| CmdlineError::Allocation(format!("long option table: {}", e)))?;

    for descriptor in index.iter() {
        let takes_argument = if descriptor.kind().is_bool() {
            TakesArgument::None
        } else {
            TakesArgument::Required
        };
        match owned_name("", descriptor.name()) {
            Some(name) => slots.push(LongOptionEntry::Primary {
                name,
                takes_argument,
            }),
            None => warn!(option = descriptor.name(), "skipping long option"),
        }

        if descriptor.kind().is_bool() {
            for (prefix, hyphenated) in [("no", false), ("no-", true)] {
                match owned_name(prefix, descriptor.name()) {
                    Some(name) => slots.push(LongOptionEntry::Negation { name, hyphenated }),
                    None => warn!(option = descriptor.name(), prefix, "skipping negation"),
                }
            }
        }
    }

    slots.push(LongOptionEntry::Terminator);
    Ok(LongOptionTable { slots })
}

pub struct ShortOptionTable<'a> {
    slots: [Option<&'a OptionDescriptor>; 256],
    spec: String,
}

impl<'a> ShortOptionTable<'a> {
    pub fn get(&self, flag: char) -> Option<&'a OptionDescriptor> {
        u8::try_from(flag)
            .ok()
            .and_then(|byte| self.slots[byte as usize])
    }

    /// Packed spec: `c`, `c:` or, for the verbosity flag, `c::`.
    pub fn spec(&self) -> &str {
        &self.spec
    }
}

pub fn build_short_options<'a>(
    index: &DescriptorIndex<'a>,
    verbosity_flag: char,
) -> Result<ShortOptionTable<'a>> {
    let mut spec = String::new();
    spec.try_reserve_exact(3 * index.len() + 1)
        .map_err(|e| CmdlineError::Allocation(format!("short option spec: {}", e)))?;
    let mut slots = [None; 256];

    for descriptor in index.iter() {
        let Some(flag) = descriptor.short_flag() else {
            continue;
        };
        if flag == ':' || flag == '-' || !flag.is_ascii_graphic() {
            warn!(option = descriptor.name(), %flag, "short flag cannot be scanned");
            continue;
        }

        // Last claimant wins, silently.
        slots[flag as usize] = Some(descriptor);
        spec.push(flag);
        if !descriptor.kind().is_bool() {
            spec.push(':');
            if flag == verbosity_flag && descriptor.kind() == OptionKind::Integer {
                spec.push(':');
            }
        }
    }

    Ok(ShortOptionTable { slots, spec })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Vec<OptionDescriptor> {
        vec![
            OptionDescriptor::hint("General"),
            OptionDescriptor::new("verbose", OptionKind::Integer).short('v'),
            OptionDescriptor::new("quiet", OptionKind::Bool).short('q'),
            OptionDescriptor::new("intf", OptionKind::ModuleName).short('I'),
            OptionDescriptor::new("fullscreen", OptionKind::Bool),
            OptionDescriptor::new("rate", OptionKind::Float),
        ]
    }

    #[test]
    fn long_table_size_and_terminator() {
        let descriptors = registry();
        let index = DescriptorIndex::new(&descriptors);
        let table = build_long_options(&index).unwrap();
        assert_eq!(table.len(), index.len() + 2 * index.bool_count());
        assert_eq!(table.slots().len(), index.long_slot_count());
        assert_eq!(table.slots().last(), Some(&LongOptionEntry::Terminator));
        assert!(table
            .entries()
            .iter()
            .all(|e| e.external_name().is_some()));
    }

    #[test]
    fn long_table_contains_no_hint() {
        let descriptors = registry();
        let index = DescriptorIndex::new(&descriptors);
        let table = build_long_options(&index).unwrap();
        assert!(table
            .entries()
            .iter()
            .all(|e| e.external_name() != Some("General")));
    }

    #[test]
    fn negations_follow_their_bool() {
        let descriptors = registry();
        let index = DescriptorIndex::new(&descriptors);
        let table = build_long_options(&index).unwrap();
        let names: Vec<&str> = table
            .entries()
            .iter()
            .filter_map(|e| e.external_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "verbose",
                "quiet",
                "noquiet",
                "no-quiet",
                "intf",
                "fullscreen",
                "nofullscreen",
                "no-fullscreen",
                "rate",
            ]
        );
        let entries = table.entries();
        assert!(!entries[1].is_negation_form());
        assert!(entries[2].is_negation_form());
        assert!(entries[3].is_negation_form());
        assert_eq!(entries[2].base_name(), "quiet");
        assert_eq!(entries[3].base_name(), "quiet");
        assert_eq!(entries[2].takes_argument(), TakesArgument::None);
        assert_eq!(entries[4].takes_argument(), TakesArgument::Required);
        assert_eq!(entries[1].takes_argument(), TakesArgument::None);
    }

    #[test]
    fn negation_of_name_starting_with_no() {
        let descriptors = vec![OptionDescriptor::new("no-overlay", OptionKind::Bool)];
        let index = DescriptorIndex::new(&descriptors);
        let table = build_long_options(&index).unwrap();
        let entries = table.entries();
        assert_eq!(entries[1].external_name(), Some("nono-overlay"));
        assert_eq!(entries[1].base_name(), "no-overlay");
        assert_eq!(entries[2].external_name(), Some("no-no-overlay"));
        assert_eq!(entries[2].base_name(), "no-overlay");
    }

    #[test]
    fn empty_index_gives_terminator_only() {
        let index = DescriptorIndex::new(std::iter::empty());
        let table = build_long_options(&index).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.slots(), &[LongOptionEntry::Terminator]);
        let shorts = build_short_options(&index, 'v').unwrap();
        assert_eq!(shorts.spec(), "");
    }

    #[test]
    fn short_spec_marks_arities() {
        let descriptors = registry();
        let index = DescriptorIndex::new(&descriptors);
        let shorts = build_short_options(&index, 'v').unwrap();
        assert_eq!(shorts.spec(), "v::qI:");
        assert_eq!(shorts.get('q').map(|d| d.name()), Some("quiet"));
        assert_eq!(shorts.get('v').map(|d| d.name()), Some("verbose"));
        assert!(shorts.get('x').is_none());
    }

    #[test]
    fn verbosity_flag_needs_integer_kind() {
        let descriptors = vec![OptionDescriptor::new("verbose", OptionKind::String).short('v')];
        let index = DescriptorIndex::new(&descriptors);
        let shorts = build_short_options(&index, 'v').unwrap();
        assert_eq!(shorts.spec(), "v:");
    }

    #[test]
    fn verbosity_flag_is_configurable() {
        let descriptors = registry();
        let index = DescriptorIndex::new(&descriptors);
        let shorts = build_short_options(&index, 'd').unwrap();
        assert_eq!(shorts.spec(), "v:qI:");
    }

    #[test]
    fn duplicate_short_flag_last_writer_wins() {
        let descriptors = vec![
            OptionDescriptor::new("first", OptionKind::Bool).short('x'),
            OptionDescriptor::new("second", OptionKind::String).short('x'),
        ];
        let index = DescriptorIndex::new(&descriptors);
        let shorts = build_short_options(&index, 'v').unwrap();
        assert_eq!(shorts.get('x').map(|d| d.name()), Some("second"));
        let spec = getopt::ShortSpec::parse(shorts.spec()).unwrap();
        assert_eq!(spec.get('x'), Some(HasArg::Required));
    }

    #[test]
    fn unscannable_short_flags_are_skipped() {
        let descriptors = vec![
            OptionDescriptor::new("colon", OptionKind::Bool).short(':'),
            OptionDescriptor::new("accent", OptionKind::Bool).short('é'),
            OptionDescriptor::new("ok", OptionKind::Bool).short('k'),
        ];
        let index = DescriptorIndex::new(&descriptors);
        let shorts = build_short_options(&index, 'v').unwrap();
        assert_eq!(shorts.spec(), "k");
        assert!(shorts.get('é').is_none());
    }
}
