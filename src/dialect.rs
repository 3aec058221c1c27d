use std::fmt;

/// Marks the opening of a PlantUML Salt tree block.
pub const TREE_START: &str = "{T";

/// The two diagram notations a source document can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Salt tree notation, depth is the number of leading `+` markers.
    Marker,
    /// Package/class notation, nesting is delimited by `{` and `}`.
    Brace,
}
impl Dialect {
    fn as_str(&self) -> &str {
        match self {
            Self::Marker => "Salt/Tree",
            Self::Brace => "Standard Class/Package",
        }
    }
}
impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Picks the dialect for a document. The first line that opens a tree block or starts with
/// a `+` marker makes it [`Dialect::Marker`], otherwise it is [`Dialect::Brace`].
pub fn detect<S: AsRef<str>>(lines: &[S]) -> Dialect {
    lazy_static::lazy_static! {
        static ref MARKER_LINE: regex::Regex =
            regex::Regex::new(r"^\s*\+").expect("a valid regex pattern");
    }

    let marker_line = lines.iter().map(AsRef::as_ref).find(|line| {
        line.trim().starts_with(TREE_START) || MARKER_LINE.is_match(line)
    });

    match marker_line {
        Some(line) => {
            log::debug!("marker dialect selected by line: {:?}", line);
            Dialect::Marker
        }
        None => Dialect::Brace,
    }
}

#[cfg(test)]
mod tests {
    use super::{detect, Dialect};

    #[test]
    fn marker_lines_select_marker_dialect() {
        assert_eq!(detect(&["@startsalt", "+ app", "++ src"]), Dialect::Marker);
        assert_eq!(detect(&["   ++ indented"]), Dialect::Marker);
    }

    #[test]
    fn tree_block_selects_marker_dialect() {
        assert_eq!(detect(&["@startsalt", "{", "  {T", "}"]), Dialect::Marker);
    }

    #[test]
    fn keyword_documents_select_brace_dialect() {
        let lines = ["@startuml", "package app {", "class Main", "}", "@enduml"];
        assert_eq!(detect(&lines), Dialect::Brace);
    }

    #[test]
    fn empty_document_selects_brace_dialect() {
        let lines: [&str; 0] = [];
        assert_eq!(detect(&lines), Dialect::Brace);
        assert_eq!(detect(&["' just a comment", ""]), Dialect::Brace);
    }

    #[test]
    fn plus_inside_a_line_is_not_a_marker() {
        assert_eq!(detect(&["class Foo+Bar"]), Dialect::Brace);
    }
}
