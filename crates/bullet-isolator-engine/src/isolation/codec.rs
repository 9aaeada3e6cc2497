use std::fmt;

use relative_path::{Component, RelativePath};

/// Line that opens and closes the metadata block
pub const DELIMITER: &str = "---";

const ORIGIN_KEY: &str = "origin";
const START_LINE_KEY: &str = "startLine";
const END_LINE_KEY: &str = "endLine";
const OFFSET_KEY: &str = "offset";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Side document has no metadata block")]
    MissingMetadata,
    #[error("Side document metadata is corrupt at '{key}': {reason}")]
    CorruptProvenance { key: String, reason: String },
}

impl CodecError {
    fn corrupt(key: &str, reason: impl fmt::Display) -> Self {
        CodecError::CorruptProvenance {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Where an isolated subtree came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Identifier of the origin document
    pub origin: String,
    /// First captured line (0-based, inclusive)
    pub start_line: usize,
    /// Last captured line (0-based, inclusive)
    pub end_line: usize,
    /// Indentation depth stripped from every captured line
    pub root_depth: usize,
}

impl Provenance {
    /// Number of origin lines the subtree occupied when it was extracted
    pub fn span(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// A decoded side document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideDocument {
    pub provenance: Provenance,
    pub body_lines: Vec<String>,
}

/// Serialize a subtree and its provenance into side-document text.
///
/// The body follows the closing delimiter line; no trailing newline is added.
pub fn encode<S: AsRef<str>>(body_lines: &[S], provenance: &Provenance) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&format!("{ORIGIN_KEY}: {}\n", provenance.origin));
    out.push_str(&format!("{START_LINE_KEY}: {}\n", provenance.start_line));
    out.push_str(&format!("{END_LINE_KEY}: {}\n", provenance.end_line));
    out.push_str(&format!("{OFFSET_KEY}: {}\n", provenance.root_depth));
    out.push_str(DELIMITER);

    for line in body_lines {
        out.push('\n');
        out.push_str(line.as_ref());
    }

    out
}

/// Parse side-document text back into provenance and body lines
pub fn decode(text: &str) -> Result<SideDocument, CodecError> {
    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

    if lines.next() != Some(DELIMITER) {
        return Err(CodecError::MissingMetadata);
    }

    let mut metadata = Vec::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line == DELIMITER {
            closed = true;
            break;
        }
        metadata.push(line);
    }
    if !closed {
        return Err(CodecError::MissingMetadata);
    }

    let provenance = parse_provenance(&metadata)?;
    let body_lines = lines.map(str::to_string).collect();

    Ok(SideDocument {
        provenance,
        body_lines,
    })
}

fn parse_provenance(metadata: &[&str]) -> Result<Provenance, CodecError> {
    let mut origin = None;
    let mut start_line = None;
    let mut end_line = None;
    let mut root_depth = None;

    for line in metadata.iter().filter(|line| !line.trim().is_empty()) {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| CodecError::corrupt(line.trim(), "expected 'key: value'"))?;
        let key = key.trim();
        let value = value.trim();

        match key {
            ORIGIN_KEY => origin = Some(value.to_string()),
            START_LINE_KEY => start_line = Some(parse_number(key, value)?),
            END_LINE_KEY => end_line = Some(parse_number(key, value)?),
            OFFSET_KEY => root_depth = Some(parse_number(key, value)?),
            _ => log::debug!("Ignoring unknown side document key '{key}'"),
        }
    }

    let origin = origin
        .filter(|origin| !origin.is_empty())
        .ok_or_else(|| CodecError::corrupt(ORIGIN_KEY, "missing"))?;
    if let Some(problem) = origin_problem(&origin) {
        return Err(CodecError::corrupt(ORIGIN_KEY, format!("'{origin}' {problem}")));
    }
    let start_line = start_line.ok_or_else(|| CodecError::corrupt(START_LINE_KEY, "missing"))?;
    let end_line = end_line.ok_or_else(|| CodecError::corrupt(END_LINE_KEY, "missing"))?;
    let root_depth = root_depth.ok_or_else(|| CodecError::corrupt(OFFSET_KEY, "missing"))?;

    if end_line < start_line {
        return Err(CodecError::corrupt(
            END_LINE_KEY,
            format!("{end_line} is before {START_LINE_KEY} {start_line}"),
        ));
    }

    Ok(Provenance {
        origin,
        start_line,
        end_line,
        root_depth,
    })
}

/// Why `origin` cannot name a document below the notes root, if it cannot
pub(crate) fn origin_problem(origin: &str) -> Option<&'static str> {
    let drive = origin.split('/').next().is_some_and(|first| first.ends_with(':'));
    if drive || origin.starts_with('/') || origin.contains('\\') {
        return Some("is not a relative path with '/' separators");
    }
    let plain = RelativePath::new(origin)
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    (!plain).then_some("contains '.' or '..' components")
}

fn parse_number(key: &str, value: &str) -> Result<usize, CodecError> {
    value
        .parse()
        .map_err(|e| CodecError::corrupt(key, format!("'{value}' is not a line number ({e})")))
}
