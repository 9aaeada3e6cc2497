use crate::isolation::Provenance;
use crate::outline::{IndentUnit, ListSyntax};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    #[error("Line {line} is not a bullet line")]
    NotABulletLine { line: usize },
}

/// A bullet subtree lifted out of its document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtree {
    /// Captured lines with the root's indentation removed
    pub body_lines: Vec<String>,
    /// Indentation depth of the root line in the source document
    pub root_depth: usize,
    /// Index of the root line (0-based)
    pub start_line: usize,
    /// Index of the last captured line (0-based, inclusive)
    pub end_line: usize,
}

impl Subtree {
    /// Number of source lines the subtree occupied
    pub fn span(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    /// Provenance record pointing back at `origin`
    pub fn provenance(&self, origin: impl Into<String>) -> Provenance {
        Provenance {
            origin: origin.into(),
            start_line: self.start_line,
            end_line: self.end_line,
            root_depth: self.root_depth,
        }
    }
}

/// Find the subtree rooted at `root_line`.
///
/// The subtree is the root plus every following bullet line nested strictly
/// deeper than it; the first line that is not a bullet, or is a bullet at the
/// root's depth or shallower, ends it.
pub fn locate<S: AsRef<str>>(
    lines: &[S],
    root_line: usize,
    syntax: &ListSyntax,
) -> Result<Subtree, LocateError> {
    let root = lines
        .get(root_line)
        .map(AsRef::as_ref)
        .filter(|line| syntax.is_bullet(line))
        .ok_or(LocateError::NotABulletLine { line: root_line })?;

    let root_depth = syntax.depth(root);

    let descendants = lines[root_line + 1..]
        .iter()
        .map(AsRef::as_ref)
        .take_while(|line| syntax.is_bullet(line) && syntax.depth(line) > root_depth)
        .count();
    let end_line = root_line + descendants;

    Ok(Subtree {
        body_lines: strip_depth(&lines[root_line..=end_line], root_depth, syntax.indent),
        root_depth,
        start_line: root_line,
        end_line,
    })
}

/// Remove `depth` indentation units from every line
pub fn strip_depth<S: AsRef<str>>(lines: &[S], depth: usize, indent: IndentUnit) -> Vec<String> {
    lines
        .iter()
        .map(|line| indent.strip(line.as_ref(), depth).to_string())
        .collect()
}

/// Prepend `depth` indentation units to every non-empty line
pub fn apply_depth<S: AsRef<str>>(lines: &[S], depth: usize, indent: IndentUnit) -> Vec<String> {
    let prefix = indent.prefix(depth);
    lines
        .iter()
        .map(AsRef::as_ref)
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect()
}
