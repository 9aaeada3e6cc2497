use std::ops::RangeInclusive;

/// Line terminator used by a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Detect the line ending from the first line break in the text
    pub fn detect(text: &str) -> LineEnding {
        match text.find('\n') {
            Some(i) if text[..i].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A document split into lines, remembering each line's own terminator.
///
/// Lines outside a [`DocumentLines::with_replaced`] run are written back
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLines {
    pub lines: Vec<String>,
    /// Terminator after each line; `None` only for an unterminated final line
    pub terminators: Vec<Option<LineEnding>>,
    /// First ending in the text; used for new lines when nothing nearer applies
    pub line_ending: LineEnding,
}

impl DocumentLines {
    pub fn parse(text: &str) -> Self {
        let (lines, terminators) = text
            .split_inclusive('\n')
            .map(|piece| match piece.strip_suffix('\n') {
                Some(rest) => match rest.strip_suffix('\r') {
                    Some(content) => (content.to_string(), Some(LineEnding::CrLf)),
                    None => (rest.to_string(), Some(LineEnding::Lf)),
                },
                None => (piece.to_string(), None),
            })
            .unzip();

        Self {
            lines,
            terminators,
            line_ending: LineEnding::detect(text),
        }
    }

    pub fn trailing_newline(&self) -> bool {
        matches!(self.terminators.last(), Some(Some(_)))
    }

    /// Swap in `lines`, the full new content after the original lines in
    /// `replaced` were exchanged for a run of new lines.
    ///
    /// Lines outside `replaced` keep their terminators. The new run reuses the
    /// old run's terminators position by position and continues with the old
    /// run's ending. When the run reached the end of the document, the new
    /// last line takes over the old final terminator.
    pub fn with_replaced(&self, replaced: RangeInclusive<usize>, lines: Vec<String>) -> Self {
        let len = self.terminators.len();
        let start = (*replaced.start()).min(len);
        let end = (*replaced.end() + 1).clamp(start, len);
        let (head, run, tail) = (
            &self.terminators[..start],
            &self.terminators[start..end],
            &self.terminators[end..],
        );

        let run_ending = run.iter().flatten().next().copied().unwrap_or(self.line_ending);
        let inserted = lines.len().saturating_sub(head.len() + tail.len());

        let mut terminators = head.to_vec();
        terminators.extend(
            (0..inserted).map(|i| Some(run.get(i).copied().flatten().unwrap_or(run_ending))),
        );
        terminators.extend_from_slice(tail);

        let final_terminator = self.terminators.last().copied().flatten();
        if tail.is_empty() {
            if let Some(last) = terminators.last_mut() {
                *last = final_terminator;
            }
        }

        Self {
            lines,
            terminators,
            line_ending: self.line_ending,
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (line, terminator) in self.lines.iter().zip(&self.terminators) {
            text.push_str(line);
            if let Some(ending) = terminator {
                text.push_str(ending.as_str());
            }
        }
        text
    }
}
