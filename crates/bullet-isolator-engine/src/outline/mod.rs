//! # Outline Syntax
//!
//! Line-level facts about bulleted outlines: whether a line is a list item and
//! how deeply it is nested. Both the marker and the indentation unit are
//! supplied by the host so other list conventions can reuse the isolation
//! machinery.

pub mod indent;
pub mod marker;

pub use indent::IndentUnit;
pub use marker::BulletMarker;

/// The list conventions of a document
#[derive(Debug, Clone, Default)]
pub struct ListSyntax {
    pub marker: BulletMarker,
    pub indent: IndentUnit,
}

impl ListSyntax {
    pub fn new(marker: BulletMarker, indent: IndentUnit) -> Self {
        Self { marker, indent }
    }

    /// Whether the line is a list item once leading whitespace is removed
    pub fn is_bullet(&self, line: &str) -> bool {
        self.marker.matches(line.trim_start())
    }

    /// Nesting depth of a line in indentation units
    pub fn depth(&self, line: &str) -> usize {
        self.indent.depth(line)
    }
}
