use crate::isolation::{Provenance, locator::apply_depth};
use crate::outline::IndentUnit;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpliceError {
    #[error(
        "Recorded lines {start}..={end} no longer fit the origin document ({len} lines); it was changed during isolation"
    )]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
}

/// Write edited subtree lines back over their recorded range.
///
/// The range `[start_line, end_line]` is removed and the re-indented body is
/// inserted in its place, so the document grows or shrinks by the difference
/// between the edited and original line counts.
pub fn splice_back<S: AsRef<str>, T: AsRef<str>>(
    origin_lines: &[S],
    provenance: &Provenance,
    edited_body: &[T],
    indent: IndentUnit,
) -> Result<Vec<String>, SpliceError> {
    let len = origin_lines.len();
    let Provenance {
        start_line: start,
        end_line: end,
        ..
    } = *provenance;

    if end < start || end >= len {
        return Err(SpliceError::RangeOutOfBounds { start, end, len });
    }

    let replacement = apply_depth(edited_body, provenance.root_depth, indent);

    let mut spliced = Vec::with_capacity(len - provenance.span() + replacement.len());
    spliced.extend(origin_lines[..start].iter().map(|line| line.as_ref().to_string()));
    spliced.extend(replacement);
    spliced.extend(origin_lines[end + 1..].iter().map(|line| line.as_ref().to_string()));

    Ok(spliced)
}
