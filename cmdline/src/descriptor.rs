//! Option descriptors as contributed by components.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Password,
    File,
    Directory,
    ModuleName,
    ModuleList,
    ModuleListCategory,
    ModuleCategory,
    Integer,
    Float,
    Key,
    Bool,
    /// Section headings and other descriptive entries; never on the command line.
    Hint,
}

impl OptionKind {
    pub fn is_hint(self) -> bool {
        matches!(self, OptionKind::Hint)
    }

    pub fn is_bool(self) -> bool {
        matches!(self, OptionKind::Bool)
    }

    /// Kinds whose raw text is stored verbatim.
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            OptionKind::String
                | OptionKind::Password
                | OptionKind::File
                | OptionKind::Directory
                | OptionKind::ModuleName
                | OptionKind::ModuleList
                | OptionKind::ModuleListCategory
                | OptionKind::ModuleCategory
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor {
    name: String,
    short_flag: Option<char>,
    kind: OptionKind,
    replacement: Option<String>,
    strictly_removed: bool,
}

impl OptionDescriptor {
    pub fn new(name: &str, kind: OptionKind) -> Self {
        OptionDescriptor {
            name: name.to_string(),
            short_flag: None,
            kind,
            replacement: None,
            strictly_removed: false,
        }
    }

    pub fn hint(title: &str) -> Self {
        Self::new(title, OptionKind::Hint)
    }

    pub fn short(mut self, c: char) -> Self {
        self.short_flag = Some(c);
        self
    }

    /// Mark the option as deprecated in favour of `replacement`.
    pub fn deprecated_by(mut self, replacement: &str) -> Self {
        self.replacement = Some(replacement.to_string());
        self
    }

    /// The option is gone: its value is dropped instead of redirected.
    /// Only meaningful together with [`deprecated_by`](Self::deprecated_by).
    pub fn removed(mut self) -> Self {
        self.strictly_removed = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_flag(&self) -> Option<char> {
        self.short_flag
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn replacement(&self) -> Option<&str> {
        self.replacement.as_deref()
    }

    pub fn is_strictly_removed(&self) -> bool {
        self.strictly_removed
    }
}

/// The options exported by one loaded component.
#[derive(Debug, Clone, Default)]
pub struct Component {
    name: String,
    options: Vec<OptionDescriptor>,
}

impl Component {
    pub fn new(name: &str) -> Self {
        Component {
            name: name.to_string(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, descriptor: OptionDescriptor) -> Self {
        self.options.push(descriptor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }
}

/// Every descriptor of every component, in registration order.
pub fn descriptors(components: &[Component]) -> impl Iterator<Item = &OptionDescriptor> {
    components.iter().flat_map(|c| c.options.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let d = OptionDescriptor::new("old-rate", OptionKind::Float)
            .short('r')
            .deprecated_by("rate")
            .removed();
        assert_eq!(d.name(), "old-rate");
        assert_eq!(d.short_flag(), Some('r'));
        assert_eq!(d.kind(), OptionKind::Float);
        assert_eq!(d.replacement(), Some("rate"));
        assert!(d.is_strictly_removed());
    }

    #[test]
    fn kind_classes() {
        assert!(OptionKind::ModuleListCategory.is_textual());
        assert!(OptionKind::Password.is_textual());
        assert!(!OptionKind::Key.is_textual());
        assert!(!OptionKind::Bool.is_textual());
        assert!(OptionKind::Bool.is_bool());
        assert!(OptionDescriptor::hint("Audio").kind().is_hint());
    }

    #[test]
    fn descriptors_flatten_in_registration_order() {
        let components = vec![
            Component::new("core")
                .option(OptionDescriptor::new("verbose", OptionKind::Integer))
                .option(OptionDescriptor::new("quiet", OptionKind::Bool)),
            Component::new("empty"),
            Component::new("audio").option(OptionDescriptor::new("volume", OptionKind::Integer)),
        ];
        let names: Vec<&str> = descriptors(&components).map(|d| d.name()).collect();
        assert_eq!(names, vec!["verbose", "quiet", "volume"]);
        assert_eq!(components[2].name(), "audio");
        assert_eq!(components[0].options().len(), 2);
    }
}
