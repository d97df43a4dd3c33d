//! Change tree construction
//!
//! Builds a nested folder/file tree from a flat list of changed files,
//! for the "view as tree" mode of a commit's changes. Folders are only
//! created for directories that at least one file lives under.

/// Separator used when chaining folder ids
pub const ID_SEPARATOR: &str = "->";

/// Something that can be placed in a change tree
pub trait Leaf {
    /// Absolute path of the leaf, if it has one
    fn leaf_path(&self) -> Option<&str>;
}

/// A node in a change tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode<T> {
    /// A directory containing at least one file somewhere below it
    Folder(FolderNode<T>),
    /// A leaf passed in by the caller
    File(T),
}

/// A directory in a change tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode<T> {
    /// Id chained from the parent id and every ancestor folder name
    pub id: String,
    /// Single path segment
    pub name: String,
    /// Files first (in input order), then subfolders (in first-seen order)
    pub children: Vec<TreeNode<T>>,
}

/// Join an optional parent id and a name into a child id
pub fn child_id(parent_id: Option<&str>, name: &str) -> String {
    [parent_id.unwrap_or(""), name].join(ID_SEPARATOR)
}

/// Build a change tree rooted at `root_path`
pub fn build_change_tree<T, I>(leaves: I, root_path: &str) -> Vec<TreeNode<T>>
where
    T: Leaf,
    I: IntoIterator<Item = T>,
{
    build_change_tree_under(leaves, root_path, None)
}

/// Build a change tree whose folder ids are chained from `parent_id`
///
/// Leaves without a path, or whose path is not under `root_path`, are
/// skipped. Each leaf is consumed, so it lands in exactly one folder.
pub fn build_change_tree_under<T, I>(
    leaves: I,
    root_path: &str,
    parent_id: Option<&str>,
) -> Vec<TreeNode<T>>
where
    T: Leaf,
    I: IntoIterator<Item = T>,
{
    let mut root = Dir::default();

    for leaf in leaves {
        let Some(dirs) = leaf.leaf_path().and_then(|path| parent_dirs(path, root_path)) else {
            log::debug!("skipping change outside of {root_path}");
            continue;
        };

        let mut dir = &mut root;
        for name in dirs {
            dir = dir.subdir(&name);
        }
        dir.files.push(leaf);
    }

    root.into_nodes(parent_id)
}

/// Directory names between `root_path` and the file at `path`
fn parent_dirs(path: &str, root_path: &str) -> Option<Vec<String>> {
    let root = root_path.trim_end_matches('/');
    let relative = path.strip_prefix(root)?;

    // The prefix has to end on a segment boundary
    if !root.is_empty() && !relative.starts_with('/') {
        return None;
    }

    let mut segments: Vec<String> = relative
        .trim_start_matches('/')
        .split('/')
        .map(str::to_string)
        .collect();

    // The file's own name is represented by the leaf itself
    segments.pop();
    Some(segments)
}

/// Intermediate folder while the tree is being grown
struct Dir<T> {
    files: Vec<T>,
    subdirs: Vec<(String, Dir<T>)>,
}

impl<T> Default for Dir<T> {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            subdirs: Vec::new(),
        }
    }
}

impl<T> Dir<T> {
    /// Get or lazily create the named subdirectory
    fn subdir(&mut self, name: &str) -> &mut Dir<T> {
        let index = match self.subdirs.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.subdirs.push((name.to_string(), Dir::default()));
                self.subdirs.len() - 1
            }
        };
        &mut self.subdirs[index].1
    }

    fn into_nodes(self, id: Option<&str>) -> Vec<TreeNode<T>> {
        let mut nodes: Vec<TreeNode<T>> = self.files.into_iter().map(TreeNode::File).collect();

        for (name, dir) in self.subdirs {
            let folder_id = child_id(id, &name);
            let children = dir.into_nodes(Some(&folder_id));
            nodes.push(TreeNode::Folder(FolderNode {
                id: folder_id,
                name,
                children,
            }));
        }

        nodes
    }
}
