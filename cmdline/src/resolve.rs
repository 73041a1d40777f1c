//! Resolution of matched options: deprecation redirection, type coercion and
//! the write to the configuration store.

use tracing::trace;

use crate::coerce::{parse_decimal, parse_float, parse_integer};
use crate::descriptor::{OptionDescriptor, OptionKind};
use crate::index::DescriptorIndex;
use crate::keys::KeyTranslator;
use crate::store::ConfigStore;

/// Where a matched descriptor's value should go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Redirect<'a> {
    Direct(&'a OptionDescriptor),
    /// The option is gone; its value is dropped.
    Removed(&'a OptionDescriptor),
    /// `target` is `None` when the replacement is not registered.
    Deprecated {
        old: &'a OptionDescriptor,
        replacement: &'a str,
        target: Option<&'a OptionDescriptor>,
    },
}

/// Follow at most one level of replacement.
pub fn redirect<'a>(index: &DescriptorIndex<'a>, matched: &'a OptionDescriptor) -> Redirect<'a> {
    match matched.replacement() {
        None => Redirect::Direct(matched),
        Some(_) if matched.is_strictly_removed() => Redirect::Removed(matched),
        Some(replacement) => Redirect::Deprecated {
            old: matched,
            replacement,
            target: index.find(replacement),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Text(String),
    Int(i64),
    Float(f32),
}

/// Convert the raw argument for `kind`. A missing argument reads as empty text.
pub fn coerce(
    kind: OptionKind,
    raw: Option<&str>,
    negated: bool,
    keys: &dyn KeyTranslator,
) -> Option<Coerced> {
    let text = raw.unwrap_or("");
    match kind {
        OptionKind::String
        | OptionKind::Password
        | OptionKind::File
        | OptionKind::Directory
        | OptionKind::ModuleName
        | OptionKind::ModuleList
        | OptionKind::ModuleListCategory
        | OptionKind::ModuleCategory => Some(Coerced::Text(text.to_string())),
        OptionKind::Integer => Some(Coerced::Int(parse_integer(text))),
        OptionKind::Float => Some(Coerced::Float(parse_float(text))),
        OptionKind::Key => Some(Coerced::Int(keys.key_code(text))),
        OptionKind::Bool => Some(Coerced::Int(if negated { 0 } else { 1 })),
        OptionKind::Hint => None,
    }
}

/// Amount one occurrence of the verbosity `flag` adds: `-v` is 1, `-vN` is N,
/// and `-v` followed by k more `v`s is k + 1.
pub fn verbosity_increment(flag: char, raw: Option<&str>) -> i64 {
    match raw {
        None => 1,
        Some(text) if text.starts_with(flag) => {
            1 + text.chars().take_while(|&c| c == flag).count() as i64
        }
        Some(text) => parse_decimal(text),
    }
}

pub struct Resolver<'s, S: ?Sized> {
    store: &'s mut S,
    keys: &'s dyn KeyTranslator,
    verbosity_flag: char,
    verbosity: i64,
}

impl<'s, S: ConfigStore + ?Sized> Resolver<'s, S> {
    pub fn new(store: &'s mut S, keys: &'s dyn KeyTranslator, verbosity_flag: char) -> Self {
        Resolver {
            store,
            keys,
            verbosity_flag,
            verbosity: 0,
        }
    }

    /// Coerce and write. Returns `false` when nothing could be written.
    pub fn store(&mut self, descriptor: &OptionDescriptor, raw: Option<&str>, negated: bool) -> bool {
        let name = descriptor.name();
        match coerce(descriptor.kind(), raw, negated, self.keys) {
            Some(Coerced::Text(text)) => self.store.put_string(name, &text),
            Some(Coerced::Int(n)) => self.store.put_int(name, n),
            Some(Coerced::Float(x)) => self.store.put_float(name, x),
            None => {
                trace!(option = name, "no settable kind, value dropped");
                return false;
            }
        }
        trace!(option = name, negated, "stored");
        true
    }

    /// Add one verbosity occurrence and write the running total.
    pub fn bump_verbosity(&mut self, descriptor: &OptionDescriptor, raw: Option<&str>) -> i64 {
        self.verbosity = self.verbosity.saturating_add(verbosity_increment(self.verbosity_flag, raw));
        self.store.put_int(descriptor.name(), self.verbosity);
        trace!(option = descriptor.name(), total = self.verbosity, "verbosity");
        self.verbosity
    }

    pub fn verbosity(&self) -> i64 {
        self.verbosity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::StandardKeys;
    use crate::store::{MemoryStore, StoredValue};

    fn coerce_std(kind: OptionKind, raw: Option<&str>, negated: bool) -> Option<Coerced> {
        coerce(kind, raw, negated, &StandardKeys)
    }

    #[test]
    fn textual_kinds_store_verbatim() {
        for kind in [
            OptionKind::String,
            OptionKind::Password,
            OptionKind::File,
            OptionKind::Directory,
            OptionKind::ModuleName,
            OptionKind::ModuleList,
            OptionKind::ModuleListCategory,
            OptionKind::ModuleCategory,
        ] {
            assert_eq!(
                coerce_std(kind, Some(" a,b "), false),
                Some(Coerced::Text(" a,b ".to_string()))
            );
        }
    }

    #[test]
    fn numeric_kinds() {
        assert_eq!(coerce_std(OptionKind::Integer, Some("0x10"), false), Some(Coerced::Int(16)));
        assert_eq!(
            coerce_std(OptionKind::Integer, Some("notanumber"), false),
            Some(Coerced::Int(0))
        );
        assert_eq!(coerce_std(OptionKind::Float, Some("2.5"), false), Some(Coerced::Float(2.5)));
        assert_eq!(coerce_std(OptionKind::Float, Some("x"), false), Some(Coerced::Float(0.0)));
    }

    #[test]
    fn bool_and_key_kinds() {
        assert_eq!(coerce_std(OptionKind::Bool, None, false), Some(Coerced::Int(1)));
        assert_eq!(coerce_std(OptionKind::Bool, None, true), Some(Coerced::Int(0)));
        assert_eq!(coerce_std(OptionKind::Key, Some("Space"), false), Some(Coerced::Int(0x20)));
        let doubled = |name: &str| -> i64 { 2 * name.len() as i64 };
        assert_eq!(
            coerce(OptionKind::Key, Some("abc"), false, &doubled),
            Some(Coerced::Int(6))
        );
    }

    #[test]
    fn hint_has_no_value() {
        assert_eq!(coerce_std(OptionKind::Hint, Some("x"), false), None);
    }

    #[test]
    fn verbosity_increments() {
        assert_eq!(verbosity_increment('v', None), 1);
        assert_eq!(verbosity_increment('v', Some("v")), 2);
        assert_eq!(verbosity_increment('v', Some("vv")), 3);
        assert_eq!(verbosity_increment('v', Some("2")), 2);
        assert_eq!(verbosity_increment('v', Some("vx")), 2);
        assert_eq!(verbosity_increment('v', Some("x")), 0);
    }

    #[test]
    fn verbosity_increments_follow_the_flag() {
        assert_eq!(verbosity_increment('d', None), 1);
        assert_eq!(verbosity_increment('d', Some("d")), 2);
        assert_eq!(verbosity_increment('d', Some("dd")), 3);
        assert_eq!(verbosity_increment('d', Some("2")), 2);
        assert_eq!(verbosity_increment('d', Some("vv")), 0);
    }

    #[test]
    fn redirect_variants() {
        let descriptors = vec![
            OptionDescriptor::new("rate", OptionKind::Float),
            OptionDescriptor::new("speed", OptionKind::Integer).deprecated_by("rate"),
            OptionDescriptor::new("turbo", OptionKind::Bool)
                .deprecated_by("rate")
                .removed(),
            OptionDescriptor::new("orphan", OptionKind::Bool).deprecated_by("missing"),
        ];
        let index = DescriptorIndex::new(&descriptors);

        assert_eq!(redirect(&index, &descriptors[0]), Redirect::Direct(&descriptors[0]));
        assert_eq!(
            redirect(&index, &descriptors[1]),
            Redirect::Deprecated {
                old: &descriptors[1],
                replacement: "rate",
                target: Some(&descriptors[0]),
            }
        );
        assert_eq!(redirect(&index, &descriptors[2]), Redirect::Removed(&descriptors[2]));
        assert!(matches!(
            redirect(&index, &descriptors[3]),
            Redirect::Deprecated { target: None, .. }
        ));
    }

    #[test]
    fn redirect_follows_one_level_only() {
        let descriptors = vec![
            OptionDescriptor::new("a", OptionKind::Integer).deprecated_by("b"),
            OptionDescriptor::new("b", OptionKind::Integer).deprecated_by("c"),
            OptionDescriptor::new("c", OptionKind::Integer),
        ];
        let index = DescriptorIndex::new(&descriptors);
        match redirect(&index, &descriptors[0]) {
            Redirect::Deprecated { target, .. } => assert_eq!(target.map(|d| d.name()), Some("b")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn resolver_writes_and_accumulates() {
        let verbose = OptionDescriptor::new("verbose", OptionKind::Integer).short('v');
        let width = OptionDescriptor::new("width", OptionKind::Integer);
        let hint = OptionDescriptor::hint("Video");
        let mut store = MemoryStore::new();
        {
            let mut resolver = Resolver::new(&mut store, &StandardKeys, 'v');
            assert!(resolver.store(&width, Some("010"), false));
            assert!(!resolver.store(&hint, None, false));
            assert_eq!(resolver.bump_verbosity(&verbose, None), 1);
            assert_eq!(resolver.bump_verbosity(&verbose, Some("v")), 3);
            assert_eq!(resolver.verbosity(), 3);
        }
        assert_eq!(store.value("width"), Some(&StoredValue::Int(8)));
        assert_eq!(store.get::<i64>("verbose").unwrap(), 3);
        assert!(!store.contains("Video"));
    }
}
