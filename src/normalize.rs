/// Turns a raw diagram token into a clean path segment.
///
/// One pass strips a leading run of `+` markers (and the whitespace around it), trims the
/// result, then strips surrounding `"` and `'` characters. Passes repeat until the value
/// settles, so normalizing an already normalized name is a no-op.
///
/// An empty result means "no item" and callers skip it.
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_once(raw);

    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str) -> String {
    lazy_static::lazy_static! {
        static ref MARKER_PREFIX: regex::Regex =
            regex::Regex::new(r"^\s*\++\s*").expect("a valid regex pattern");
    }

    let without_markers = MARKER_PREFIX.replace(raw, "");

    without_markers
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_markers_and_whitespace() {
        assert_eq!(normalize("++ src"), "src");
        assert_eq!(normalize("  +++   main.rs  "), "main.rs");
        assert_eq!(normalize("docs"), "docs");
    }

    #[test]
    fn strips_quotes() {
        assert_eq!(normalize("\"My Folder\""), "My Folder");
        assert_eq!(normalize("'notes.txt'"), "notes.txt");
        assert_eq!(normalize("+ \"quoted dir\""), "quoted dir");
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t "), "");
        assert_eq!(normalize("+++"), "");
        assert_eq!(normalize("\"\""), "");
    }

    #[test]
    fn keeps_inner_markers_and_quotes() {
        assert_eq!(normalize("c++"), "c++");
        assert_eq!(normalize("it's.txt"), "it's.txt");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "\"'a'\"",
            "'\"a\"'",
            "\" + a \"",
            "' ++ \"nested\" '",
            "+ '  spaced  '",
            "plain",
            "",
        ];

        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }
}
