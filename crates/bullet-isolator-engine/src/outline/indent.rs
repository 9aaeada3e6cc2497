/// Indentation unit used to measure list depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndentUnit {
    #[default]
    Tabs,          // One tab character per level
    Spaces(usize), // Number of spaces per level
}

impl IndentUnit {
    /// Count the whole indentation units at the start of a line
    pub fn depth(&self, line: &str) -> usize {
        match self {
            IndentUnit::Tabs => line.chars().take_while(|&c| c == '\t').count(),
            IndentUnit::Spaces(spaces_per_level) => {
                let space_count = line.chars().take_while(|&c| c == ' ').count();
                if *spaces_per_level == 0 {
                    0
                } else {
                    space_count / spaces_per_level
                }
            }
        }
    }

    /// Indentation string for `depth` levels
    pub fn prefix(&self, depth: usize) -> String {
        match self {
            IndentUnit::Tabs => "\t".repeat(depth),
            IndentUnit::Spaces(spaces_per_level) => " ".repeat(depth * spaces_per_level),
        }
    }

    /// Remove exactly `depth` levels of indentation from the start of `line`.
    ///
    /// A line that does not carry the full prefix is returned untouched.
    pub fn strip<'a>(&self, line: &'a str, depth: usize) -> &'a str {
        if depth == 0 {
            return line;
        }
        line.strip_prefix(self.prefix(depth).as_str()).unwrap_or(line)
    }

    /// Detect the indentation unit from the first indented, non-blank line.
    ///
    /// Falls back to tabs when nothing is indented.
    pub fn detect<S: AsRef<str>>(lines: &[S]) -> IndentUnit {
        for line in lines.iter().map(AsRef::as_ref) {
            if line.trim().is_empty() {
                continue;
            }

            if line.starts_with('\t') {
                return IndentUnit::Tabs;
            }

            let spaces = line.chars().take_while(|&c| c == ' ').count();
            if spaces > 0 {
                return IndentUnit::Spaces(spaces);
            }
        }

        IndentUnit::Tabs
    }
}
