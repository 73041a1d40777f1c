use std::collections::HashMap;

use crate::descriptor::OptionDescriptor;

/// Read-only view over the descriptors of one load call.
///
/// Hint entries are dropped on the way in; traversal order is registration
/// order. When two descriptors share a name, lookup finds the first one.
pub struct DescriptorIndex<'a> {
    entries: Vec<&'a OptionDescriptor>,
    by_name: HashMap<&'a str, usize>,
    bool_count: usize,
}

impl<'a> DescriptorIndex<'a> {
    pub fn new<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'a OptionDescriptor>,
    {
        let mut entries = Vec::new();
        let mut by_name = HashMap::new();
        let mut bool_count = 0;

        for descriptor in descriptors {
            if descriptor.kind().is_hint() {
                continue;
            }
            if descriptor.kind().is_bool() {
                bool_count += 1;
            }
            by_name.entry(descriptor.name()).or_insert(entries.len());
            entries.push(descriptor);
        }

        DescriptorIndex {
            entries,
            by_name,
            bool_count,
        }
    }

    /// Number of non-Hint descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bool_count(&self) -> usize {
        self.bool_count
    }

    /// Slots needed by the long-option table, terminator included.
    pub fn long_slot_count(&self) -> usize {
        self.len() + 2 * self.bool_count + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OptionDescriptor> + '_ {
        self.entries.iter().copied()
    }

    pub fn find(&self, name: &str) -> Option<&'a OptionDescriptor> {
        self.by_name.get(name).map(|&i| self.entries[i])
    }
}
