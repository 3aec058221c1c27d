use crate::vfs::VirtualEntry;
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Represents a node in the tree (either file or directory).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    is_file: bool,
}
impl TreeNode {
    fn new(name: String, is_file: bool) -> Self {
        Self {
            name,
            children: Vec::new(),
            is_file,
        }
    }
}

/// Build the directory tree from recorded entries, returning the root node.
fn build_tree(entries: &[VirtualEntry], root: &Path) -> Rc<RefCell<TreeNode>> {
    let root_name = root
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());

    let root_node = Rc::new(RefCell::new(TreeNode::new(root_name, false)));

    // relative path -> node; the root is the empty path
    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root_node));

    for entry in entries {
        let parent = entry
            .destination
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let Some(parent_node) = lookup.get(&parent).cloned() else {
            log::debug!(
                "parent: {}, not found for path: {}",
                parent.display(),
                entry.destination.display()
            );
            continue;
        };

        let child_name = entry
            .destination
            .file_name()
            .map(|os| os.to_string_lossy().to_string())
            .unwrap_or_else(|| entry.destination.display().to_string());

        let child = Rc::new(RefCell::new(TreeNode::new(child_name, entry.is_file)));

        parent_node.borrow_mut().children.push(Rc::clone(&child));

        lookup.insert(entry.destination.clone(), child);
    }

    root_node
}

/// Renders the tree with box-drawing connectors, one line per node.
fn render_tree(node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool, out: &mut Vec<String>) {
    let node = node.borrow();

    let connector = if is_last { "└── " } else { "├── " };
    let name = if node.is_file {
        node.name.green()
    } else {
        node.name.blue()
    };
    out.push(format!("{}{}{}", prefix.yellow(), connector.yellow(), name));

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        render_tree(child, &child_prefix, i == len - 1, out);
    }
}

/// Lines of the planned tree below `root`, without the legend.
pub fn tree_lines(entries: &[VirtualEntry], root: &Path) -> Vec<String> {
    let tree_root = build_tree(entries, root);
    let mut lines = Vec::new();

    render_tree(&tree_root, "", true, &mut lines);

    lines
}

/// Prints the structure a dry run would create.
pub fn preview_as_tree(entries: &[VirtualEntry], root: &Path) {
    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    println!("{} {}\n", "┌─".bold().bright_blue(), "Dry run".bold().bright_blue());

    for line in tree_lines(entries, root) {
        println!("{}", line);
    }

    println!(
        "\n{} {}",
        "└─".bold().bright_blue(),
        "Nothing was written to disk".bright_green()
    );
}
