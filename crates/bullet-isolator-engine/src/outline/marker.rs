use regex::Regex;

/// Recognizes the list marker at the start of a line's content.
///
/// The content handed to [`BulletMarker::matches`] has its leading
/// whitespace removed, so markers never have to account for indentation.
#[derive(Debug, Clone)]
pub enum BulletMarker {
    /// Literal prefix such as `"- "`
    Prefix(String),
    /// Regular expression, usually anchored with `^`
    Pattern(Regex),
    /// Arbitrary predicate supplied by the host
    Predicate(fn(&str) -> bool),
}

impl Default for BulletMarker {
    fn default() -> Self {
        BulletMarker::Prefix("- ".to_string())
    }
}

impl BulletMarker {
    /// Build a marker from a regular expression
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(BulletMarker::Pattern(Regex::new(pattern)?))
    }

    pub fn matches(&self, content: &str) -> bool {
        match self {
            BulletMarker::Prefix(prefix) => content.starts_with(prefix.as_str()),
            BulletMarker::Pattern(regex) => regex.is_match(content),
            BulletMarker::Predicate(predicate) => predicate(content),
        }
    }
}
