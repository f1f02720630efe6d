//! Compacted file tree built from a flat list of changed paths.
//!
//! The builder runs in three pure stages:
//!
//! 1. [`PathTree::from_paths`] inserts every path into a trie keyed by segment.
//! 2. [`PathTree::compact`] merges chains of single-child directories
//!    (`internal` + `ui` becomes one `internal/ui` node).
//! 3. [`PathTree::flatten`] emits pre-order rows with depth annotations.
//!
//! [`build`] runs all three. The output is a plain `Vec<PathNode>`; child links
//! are indices into that same vector, so there are no parent pointers.

use std::collections::{BTreeMap, BTreeSet};

/// Suffix for the file row emitted when a path is both a file and a directory.
pub const SHADOWED_FILE_SUFFIX: &str = " (file)";

/// One row of the flattened, compacted tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNode {
    /// Name shown to the user. May span several segments (`"internal/ui"`).
    pub display_name: String,
    /// Repository-relative path usable for diff and edit requests.
    pub full_path: String,
    /// Whether this row is a directory.
    pub is_directory: bool,
    /// Number of ancestor rows above this one.
    pub depth: usize,
    /// Raw first segment of each child mapped to the child's row index. The
    /// file row of a segment that is also a directory is keyed `segment/`.
    pub children: BTreeMap<String, usize>,
}

impl PathNode {
    /// True for rows that can be opened in the diff pane.
    pub fn is_file(&self) -> bool {
        !self.is_directory
    }
}

/// Owned trie of path segments below a virtual, never-rendered root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTree {
    roots: BTreeMap<String, TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeNode {
    name: String,
    full_path: String,
    /// Some input path ends exactly here.
    terminal: bool,
    children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    fn new(name: &str, full_path: String) -> Self {
        Self {
            name: name.to_string(),
            full_path,
            terminal: false,
            children: BTreeMap::new(),
        }
    }

    fn is_directory(&self) -> bool {
        !self.children.is_empty()
    }

    /// A path ends here and other paths continue below it.
    fn is_ambiguous(&self) -> bool {
        self.terminal && self.is_directory()
    }
}

impl PathTree {
    /// Insert every path into a fresh trie. Empty strings are skipped and
    /// duplicates land on the same node.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::default();
        for path in paths {
            tree.insert(path.as_ref());
        }
        tree
    }

    fn insert(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }

        let segments: Vec<&str> = path.split('/').collect();
        let mut level = &mut self.roots;
        let mut prefix = String::new();

        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                prefix.push('/');
            }
            prefix.push_str(segment);

            let node = level
                .entry((*segment).to_string())
                .or_insert_with(|| TreeNode::new(segment, prefix.clone()));

            if i + 1 == segments.len() {
                node.terminal = true;
            }
            level = &mut node.children;
        }
    }

    /// Return a new tree with single-child directory chains merged.
    ///
    /// Each top-level node is compacted on its own; the virtual root never
    /// absorbs a child. Running this on an already compacted tree is a no-op.
    #[must_use]
    pub fn compact(&self) -> Self {
        Self {
            roots: self
                .roots
                .iter()
                .map(|(key, node)| (key.clone(), compact_node(node.clone())))
                .collect(),
        }
    }

    /// Emit rows in pre-order, directories before files at every level.
    pub fn flatten(&self) -> Vec<PathNode> {
        let mut rows = Vec::new();
        let _ = flatten_level(&self.roots, 0, &mut rows);
        rows
    }

    /// True when no path was inserted.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Build the compacted, sorted row list for a set of changed paths.
///
/// # Examples
///
/// ```
/// use difi::core::build;
///
/// let rows = build(["internal/ui/model.go", "internal/ui/styles.go"]);
/// let names: Vec<_> = rows.iter().map(|r| r.display_name.as_str()).collect();
/// assert_eq!(names, ["internal/ui", "model.go", "styles.go"]);
/// assert_eq!(rows[1].depth, 1);
/// ```
pub fn build<I, S>(paths: I) -> Vec<PathNode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let _timer = crate::metrics::Timer::start("tree_build");
    PathTree::from_paths(paths).compact().flatten()
}

/// Indices of the rows still shown when every directory whose `full_path`
/// is in `collapsed` hides its subtree.
pub fn visible_rows(rows: &[PathNode], collapsed: &BTreeSet<String>) -> Vec<usize> {
    let mut visible = Vec::with_capacity(rows.len());
    let mut hidden_below: Option<usize> = None;

    for (index, row) in rows.iter().enumerate() {
        if let Some(depth) = hidden_below {
            if row.depth > depth {
                continue;
            }
            hidden_below = None;
        }
        visible.push(index);
        if row.is_directory && collapsed.contains(&row.full_path) {
            hidden_below = Some(row.depth);
        }
    }
    visible
}

fn compact_node(mut node: TreeNode) -> TreeNode {
    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .map(|(key, child)| (key, compact_node(child)))
        .collect();

    // A node that is also a file keeps its own row.
    while !node.terminal && node.children.len() == 1 {
        let mergeable = node
            .children
            .first_key_value()
            .is_some_and(|(_, child)| child.is_directory() && !child.terminal);
        if !mergeable {
            break;
        }
        let Some((_, child)) = node.children.pop_first() else {
            break;
        };
        node.name = format!("{}/{}", node.name, child.name);
        node.full_path = child.full_path;
        node.children = child.children;
    }

    node
}

struct Entry<'a> {
    key: String,
    display_name: String,
    is_directory: bool,
    node: &'a TreeNode,
}

fn sorted_entries(level: &BTreeMap<String, TreeNode>) -> Vec<Entry<'_>> {
    let mut taken: BTreeSet<String> = level.values().map(|node| node.name.clone()).collect();
    let mut entries = Vec::with_capacity(level.len());
    for (key, node) in level {
        if node.is_ambiguous() {
            tracing::warn!(
                path = %node.full_path,
                "path is both a file and a directory; listing both"
            );
            // a real sibling may already be called "name (file)"
            let mut display_name = format!("{}{SHADOWED_FILE_SUFFIX}", node.name);
            while taken.contains(&display_name) {
                display_name.push_str(SHADOWED_FILE_SUFFIX);
            }
            taken.insert(display_name.clone());
            // no segment contains '/', so this key cannot clash with one
            entries.push(Entry {
                key: format!("{key}/"),
                display_name,
                is_directory: false,
                node,
            });
        }
        entries.push(Entry {
            key: key.clone(),
            display_name: node.name.clone(),
            is_directory: node.is_directory(),
            node,
        });
    }

    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    entries
}

/// Emit one level and everything below it; returns the rows emitted directly
/// at this level keyed by raw segment.
fn flatten_level(
    level: &BTreeMap<String, TreeNode>,
    depth: usize,
    rows: &mut Vec<PathNode>,
) -> BTreeMap<String, usize> {
    let mut emitted = BTreeMap::new();
    for entry in sorted_entries(level) {
        let index = rows.len();
        rows.push(PathNode {
            display_name: entry.display_name,
            full_path: entry.node.full_path.clone(),
            is_directory: entry.is_directory,
            depth,
            children: BTreeMap::new(),
        });

        if entry.is_directory {
            rows[index].children = flatten_level(&entry.node.children, depth + 1, rows);
        }
        emitted.insert(entry.key, index);
    }
    emitted
}
