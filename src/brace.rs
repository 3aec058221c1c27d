use crate::{
    dialect::Dialect,
    materialize::{ItemError, Kind, Materializer, Scaffold},
    normalize::normalize,
};
use colored::Colorize;
use std::path::PathBuf;

const DIRECTORY_KEYWORDS: [&str; 5] = ["package", "folder", "namespace", "node", "component"];
const FILE_KEYWORDS: [&str; 5] = ["class", "interface", "file", "artifact", "object"];

/// A keyword-introduced definition such as `package "app" {` or `class Main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub kind: Kind,
    /// Normalized name, possibly empty.
    pub name: String,
}

/// Matches a definition line. Keywords are case-insensitive; the name is either a quoted
/// string or a bare token ending before whitespace or `{`.
pub fn definition(line: &str) -> Option<Definition> {
    lazy_static::lazy_static! {
        static ref DEFINITION: regex::Regex = regex::Regex::new(
            r#"(?xi)
            ^\s*
            (package|folder|namespace|node|component|class|interface|file|artifact|object)
            \s+
            (?:"([^"]+)"|([^\s{]+))
            "#
        ).expect("a valid regex pattern");
    }

    let captures = DEFINITION.captures(line)?;
    let keyword = captures[1].to_lowercase();
    let raw_name = captures
        .get(2)
        .or_else(|| captures.get(3))
        .map(|m| m.as_str())
        .unwrap_or_default();

    let kind = if DIRECTORY_KEYWORDS.contains(&keyword.as_str()) {
        Kind::Directory
    } else if FILE_KEYWORDS.contains(&keyword.as_str()) {
        Kind::File
    } else {
        return None;
    };

    Some(Definition {
        kind,
        name: normalize(raw_name),
    })
}

/// Stack of open directory scopes. The root is never popped.
///
/// A `None` entry is a scope whose directory could not be created; definitions inside it
/// are reported as failures instead of being placed somewhere else.
#[derive(Debug)]
struct ScopeStack {
    paths: Vec<Option<PathBuf>>,
}
impl ScopeStack {
    fn new(root: PathBuf) -> Self {
        Self {
            paths: vec![Some(root)],
        }
    }

    fn top(&self) -> Option<&PathBuf> {
        self.paths.last().and_then(Option::as_ref)
    }

    fn push(&mut self, path: Option<PathBuf>) {
        self.paths.push(path);
    }

    fn pop(&mut self) {
        if self.paths.len() > 1 {
            self.paths.pop();
        } else {
            log::debug!("ignoring '}}' with no open scope");
        }
    }
}

/// Parses a package/class document and materializes it through `scaffold`.
///
/// Every directory-like definition opens a scope that the next `}` closes, even when the
/// directory itself could not be created, so the stack stays in step with the braces.
/// Definitions inside such a scope fail with [`ItemError::ScopeUnavailable`].
pub fn parse<S, M>(lines: &[S], scaffold: &mut Scaffold<'_, M>)
where
    S: AsRef<str>,
    M: Materializer,
{
    println!("-> Detected {} Syntax.", Dialect::Brace);

    let mut scopes = ScopeStack::new(scaffold.root().to_path_buf());
    let mut definitions = 0;

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with('\'') || line.starts_with('@') {
            continue;
        }

        if line.starts_with('}') {
            scopes.pop();
            continue;
        }

        let Some(definition) = definition(line) else {
            continue;
        };

        definitions += 1;
        let parent = scopes.top().cloned();

        if definition.name.is_empty() {
            log::warn!("definition without a name: {:?}", line);
            if definition.kind == Kind::Directory {
                scopes.push(parent);
            }
            continue;
        }

        scaffold.record_item();

        let Some(parent) = parent else {
            scaffold.reject(
                definition.kind,
                &definition.name,
                ItemError::ScopeUnavailable {
                    name: definition.name.clone(),
                },
            );
            if definition.kind == Kind::Directory {
                scopes.push(None);
            }
            continue;
        };

        match definition.kind {
            Kind::Directory => {
                let scope = scaffold.directory(&parent, &definition.name, false);
                scopes.push(scope);
            }
            Kind::File => {
                scaffold.file(&parent, &definition.name, false);
            }
        }
    }

    if definitions == 0 {
        log::warn!("no definitions found in package structure");
        println!("{} No items found in Class/Package structure.", "Warning:".yellow());
    }
}
