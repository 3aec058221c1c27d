use crate::{
    dialect::{Dialect, TREE_START},
    materialize::{Kind, Materializer, Scaffold},
    normalize::normalize,
};
use colored::Colorize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// One `+`-prefixed line of a Salt tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Number of leading `+` markers.
    pub depth: usize,
    pub name: String,
}

fn is_structural_noise(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('\'')
        || line.starts_with('@')
        || line == "{"
        || line == "}"
        || line == TREE_START
}

/// Extracts the ordered `(depth, name)` items of a Salt tree, dropping comments, braces,
/// annotations, unmarked lines, and items whose name normalizes to nothing.
pub fn items<S: AsRef<str>>(lines: &[S]) -> Vec<Item> {
    lazy_static::lazy_static! {
        static ref ITEM: regex::Regex =
            regex::Regex::new(r"^(\++)\s*(.*)").expect("a valid regex pattern");
    }

    let mut items = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if is_structural_noise(line) {
            continue;
        }

        let Some(captures) = ITEM.captures(line) else {
            log::debug!("skipping unmarked line: {:?}", line);
            continue;
        };

        let depth = captures[1].len();
        let name = normalize(&captures[2]);

        if name.is_empty() {
            log::debug!("skipping marker line without a name: {:?}", line);
            continue;
        }

        items.push(Item { depth, name });
    }

    items
}

/// Directory when the very next item is deeper, file otherwise.
///
/// Only the immediate successor is consulted: an item followed by a sibling is a file even
/// if something deeper shows up later.
pub fn kind_of(items: &[Item], index: usize) -> Kind {
    match items.get(index + 1) {
        Some(next) if next.depth > items[index].depth => Kind::Directory,
        _ => Kind::File,
    }
}

/// Active directory per depth. Entries are overwritten but never removed, so a lookup for
/// a depth that was skipped falls back to the closest shallower registered depth.
#[derive(Debug)]
struct DepthTable {
    paths: HashMap<usize, PathBuf>,
}
impl DepthTable {
    fn new(root: &Path) -> Self {
        Self {
            paths: HashMap::from([(0, root.to_path_buf())]),
        }
    }

    fn parent_of(&self, depth: usize) -> &Path {
        let mut candidate = depth.saturating_sub(1);

        while candidate > 0 && !self.paths.contains_key(&candidate) {
            candidate -= 1;
        }

        if candidate + 1 < depth {
            log::debug!("depth {} skips a level, parent taken from depth {}", depth, candidate);
        }

        &self.paths[&candidate]
    }

    fn register(&mut self, depth: usize, path: PathBuf) {
        self.paths.insert(depth, path);
    }
}

/// Parses a Salt tree document and materializes it through `scaffold`.
pub fn parse<S, M>(lines: &[S], scaffold: &mut Scaffold<'_, M>)
where
    S: AsRef<str>,
    M: Materializer,
{
    println!("-> Detected {} Syntax.", Dialect::Marker);

    let items = items(lines);

    if items.is_empty() {
        log::warn!("no items found in tree structure");
        println!("{} No items found in Salt structure.", "Warning:".yellow());
        return;
    }

    let mut table = DepthTable::new(scaffold.root());

    for (index, item) in items.iter().enumerate() {
        scaffold.record_item();

        let parent = table.parent_of(item.depth).to_path_buf();

        match kind_of(&items, index) {
            Kind::Directory => {
                if let Some(path) = scaffold.directory(&parent, &item.name, true) {
                    table.register(item.depth, path);
                }
            }
            Kind::File => {
                scaffold.file(&parent, &item.name, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{materialize::DiskMaterializer, vfs::VirtualFS};

    fn item(depth: usize, name: &str) -> Item {
        Item {
            depth,
            name: name.to_string(),
        }
    }

    #[test]
    fn items_skip_noise_and_unmarked_lines() {
        let lines = [
            "@startsalt",
            "{",
            "{T",
            "' a comment",
            "+ app",
            "not a tree line",
            "++ \"src\"",
            "+++   ",
            "}",
            "@endsalt",
        ];

        assert_eq!(items(&lines), vec![item(1, "app"), item(2, "src")]);
    }

    #[test]
    fn lookahead_uses_only_the_next_item() {
        let items = vec![item(1, "a"), item(1, "b"), item(2, "c"), item(2, "d")];

        assert_eq!(kind_of(&items, 0), Kind::File);
        assert_eq!(kind_of(&items, 1), Kind::Directory);
        assert_eq!(kind_of(&items, 2), Kind::File);
        assert_eq!(kind_of(&items, 3), Kind::File);
    }

    #[test]
    fn depth_table_falls_back_over_skipped_levels() {
        let root = Path::new("/root");
        let mut table = DepthTable::new(root);
        table.register(1, root.join("app"));

        assert_eq!(table.parent_of(1), root);
        assert_eq!(table.parent_of(2), root.join("app"));
        assert_eq!(table.parent_of(3), root.join("app"));
        assert_eq!(table.parent_of(9), root.join("app"));
    }

    #[test]
    fn builds_nested_tree_on_disk() {
        let temp = tempfile::tempdir().unwrap();
        let lines = ["+ app", "++ src", "+++ main.txt", "++ docs"];

        let mut fs = DiskMaterializer;
        let mut scaffold = Scaffold::new(&mut fs, temp.path(), Dialect::Marker);
        parse(&lines, &mut scaffold);
        let report = scaffold.finish();

        let app = temp.path().join("app");
        assert!(app.is_dir());
        assert!(app.join("src").is_dir());
        assert!(app.join("src").join("main.txt").is_file());
        // `docs` has no deeper successor, so it is a leaf
        assert!(app.join("docs").is_file());
        assert_eq!(report.items, 4);
        assert_eq!((report.directories, report.files), (2, 2));
        assert!(report.is_clean());
    }

    #[test]
    fn skipped_depth_lands_under_nearest_ancestor() {
        let root = PathBuf::from("/plan");
        let mut fs = VirtualFS::new(&root);
        let mut scaffold = Scaffold::new(&mut fs, &root, Dialect::Marker);
        parse(&["+ a", "+++ deep.txt"], &mut scaffold);
        scaffold.finish();

        assert!(fs.is_dir(&root.join("a")));
        assert!(fs.is_file(&root.join("a").join("deep.txt")));
    }

    #[test]
    fn stale_depth_entries_are_reused() {
        // `b.txt` is followed by a deeper item, so it becomes a directory, and `c.txt`
        // resolves through the depth-2 entry left over from `two`
        let root = PathBuf::from("/plan");
        let mut fs = VirtualFS::new(&root);
        let mut scaffold = Scaffold::new(&mut fs, &root, Dialect::Marker);
        let lines = ["+ one", "++ two", "+++ a.txt", "+ b.txt", "+++ c.txt"];
        parse(&lines, &mut scaffold);
        scaffold.finish();

        assert!(fs.is_dir(&root.join("b.txt")));
        assert!(fs.is_file(&root.join("one").join("two").join("c.txt")));
    }

    #[test]
    fn failed_directory_is_not_registered() {
        let root = PathBuf::from("/plan");
        let mut fs = VirtualFS::new(&root);
        let mut scaffold = Scaffold::new(&mut fs, &root, Dialect::Marker);
        parse(&["+ ..", "++ child.txt"], &mut scaffold);
        let report = scaffold.finish();

        assert_eq!(report.failures, 1);
        assert!(fs.is_file(&root.join("child.txt")));
    }

    #[test]
    fn empty_tree_changes_nothing() {
        let temp = tempfile::tempdir().unwrap();

        let mut fs = DiskMaterializer;
        let mut scaffold = Scaffold::new(&mut fs, temp.path(), Dialect::Marker);
        parse(&["@startsalt", "{T", "+", "}", "@endsalt"], &mut scaffold);
        let report = scaffold.finish();

        assert_eq!(report.items, 0);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
