//! Enumeration of the designs contained in a boxes config file.

use crate::design::Design;
use crate::runner::{Boxes, RunError};
use std::path::Path;

/// Suffix boxes appends to alias names in query output.
const ALIAS_SUFFIX: &str = " (alias)";

/// Name of the placeholder record that collects aliases listed before any design.
pub const ORPHAN_PLACEHOLDER: &str = "ERROR";

/// The designs listed by boxes, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub designs: Vec<Design>,
    orphans: bool,
}

impl Catalog {
    /// True when boxes listed an alias before any design name.
    ///
    /// Those aliases sit on a placeholder record named [`ORPHAN_PLACEHOLDER`].
    pub fn has_orphans(&self) -> bool {
        self.orphans
    }

    /// Aliases that could not be attached to a real design.
    pub fn orphaned_aliases(&self) -> Vec<String> {
        if !self.orphans {
            return Vec::new();
        }
        self.designs
            .first()
            .and_then(|design| design.alias.clone())
            .unwrap_or_default()
    }

    /// Number of designs, placeholder included.
    pub fn len(&self) -> usize {
        self.designs.len()
    }

    /// True when boxes listed no designs at all.
    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }

    /// Take the designs in listing order.
    pub fn into_designs(self) -> Vec<Design> {
        self.designs
    }
}

/// Parse the output of `boxes -q (all)`.
///
/// Each line names a design, unless it ends in ` (alias)`, in which case it
/// is an alias of the most recent design.
pub fn parse_catalog<'a>(lines: impl IntoIterator<Item = &'a str>) -> Catalog {
    let mut catalog = Catalog::default();

    for line in lines {
        if let Some(alias) = line.strip_suffix(ALIAS_SUFFIX) {
            if catalog.designs.is_empty() {
                tracing::warn!(alias, "alias listed before any design");
                catalog.designs.push(Design::new(ORPHAN_PLACEHOLDER));
                catalog.orphans = true;
            }
            if let Some(current) = catalog.designs.last_mut() {
                current.add_alias(alias);
            }
        } else if !line.is_empty() {
            catalog.designs.push(Design::new(line));
        }
    }

    catalog
}

/// Ask boxes for all designs in `config`.
pub fn read_design_names(boxes: &dyn Boxes, config: &Path) -> Result<Catalog, RunError> {
    let config = config.to_string_lossy();
    let output = boxes.run(&["-f", &*config, "-q", "(all)"])?;
    let catalog = parse_catalog(output.lines());
    tracing::debug!(designs = catalog.len(), "parsed design list");
    Ok(catalog)
}
