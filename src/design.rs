//! The record describing one boxes design.

/// Metadata collected for a single design.
///
/// Optional fields stay `None` until a value is discovered, and the YAML
/// writer omits them entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Design {
    /// Primary design name as listed by boxes.
    pub name: String,

    /// Alternative names, in the order boxes lists them.
    pub alias: Option<Vec<String>>,

    /// Original designer of the artwork, without email address.
    pub designer: Option<String>,

    /// Author of the design definition, without email address.
    pub coder: Option<String>,

    /// Sorted tags, never containing the `none` placeholder.
    pub tags: Option<Vec<String>>,

    /// Sample output, either plain text or inline-styled HTML.
    pub sample: Option<String>,
}

impl Design {
    /// Create a design with only its name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append an alias, creating the alias list on first use.
    pub fn add_alias(&mut self, alias: impl Into<String>) {
        self.alias.get_or_insert_with(Vec::new).push(alias.into());
    }

    /// Check whether the design carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_deref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }
}
