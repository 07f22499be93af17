use generational_arena::{Arena, Index};
use std::fmt;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{MenuNode, NamePolicy, NodeId, RenderableNode};

/// Non-menu entry sharing the hierarchical store with menu nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignNode {
    pub id: Option<NodeId>,
    pub name: String,
    /// Store-specific type tag, e.g. "route" or "content"
    pub kind: String,
    pub parent: Option<Index>,
    pub children: Vec<Index>,
}

impl ForeignNode {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: kind.into(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Entry in the tree. Only menu entries are renderable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Menu(MenuNode),
    Foreign(ForeignNode),
}

impl TreeEntry {
    pub fn name(&self) -> &str {
        match self {
            TreeEntry::Menu(node) => node.name(),
            TreeEntry::Foreign(node) => &node.name,
        }
    }

    pub fn parent(&self) -> Option<Index> {
        match self {
            TreeEntry::Menu(node) => node.parent(),
            TreeEntry::Foreign(node) => node.parent,
        }
    }

    fn set_parent(&mut self, parent: Option<Index>) {
        match self {
            TreeEntry::Menu(node) => node.set_parent(parent),
            TreeEntry::Foreign(node) => node.parent = parent,
        }
    }

    pub fn children(&self) -> &[Index] {
        match self {
            TreeEntry::Menu(node) => node.child_indices(),
            TreeEntry::Foreign(node) => &node.children,
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Index> {
        match self {
            TreeEntry::Menu(node) => node.children_mut(),
            TreeEntry::Foreign(node) => &mut node.children,
        }
    }

    pub fn as_renderable(&self) -> Option<&dyn RenderableNode> {
        match self {
            TreeEntry::Menu(node) => Some(node as &dyn RenderableNode),
            TreeEntry::Foreign(_) => None,
        }
    }

    pub fn as_menu(&self) -> Option<&MenuNode> {
        match self {
            TreeEntry::Menu(node) => Some(node),
            TreeEntry::Foreign(_) => None,
        }
    }

    pub fn as_menu_mut(&mut self) -> Option<&mut MenuNode> {
        match self {
            TreeEntry::Menu(node) => Some(node),
            TreeEntry::Foreign(_) => None,
        }
    }
}

impl From<MenuNode> for TreeEntry {
    fn from(node: MenuNode) -> Self {
        TreeEntry::Menu(node)
    }
}

impl From<ForeignNode> for TreeEntry {
    fn from(node: ForeignNode) -> Self {
        TreeEntry::Foreign(node)
    }
}

impl fmt::Display for TreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeEntry::Menu(node) => write!(f, "{}", node),
            TreeEntry::Foreign(node) => write!(f, "{} [{}]", node.name, node.kind),
        }
    }
}

/// Arena-based menu tree.
///
/// The arena owns every entry; parents and children refer to each other by
/// index. Each tree has a single root.
#[derive(Debug)]
pub struct MenuTree {
    arena: Arena<TreeEntry>,
    root: Option<Index>,
    policy: NamePolicy,
}

impl Default for MenuTree {
    fn default() -> Self {
        Self::new(NamePolicy::default())
    }
}

impl MenuTree {
    pub fn new(policy: NamePolicy) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            policy,
        }
    }

    pub fn policy(&self) -> &NamePolicy {
        &self.policy
    }

    fn check_name(&self, entry: &TreeEntry) -> DomainResult<()> {
        match entry {
            TreeEntry::Menu(node) => self.policy.check(node.name()),
            TreeEntry::Foreign(_) => Ok(()),
        }
    }

    /// Set the root entry. An existing tree is discarded.
    #[instrument(level = "debug", skip_all)]
    pub fn insert_root(&mut self, entry: impl Into<TreeEntry>) -> DomainResult<Index> {
        let mut entry = entry.into();
        self.check_name(&entry)?;
        entry.set_parent(None);
        entry.children_mut().clear();
        self.arena.clear();
        let idx = self.arena.insert(entry);
        self.root = Some(idx);
        Ok(idx)
    }

    /// Attach an entry as the last child of `parent`.
    ///
    /// The entry arrives as a leaf: child indices it carries from another
    /// position (a clone, a detached entry) are dropped.
    #[instrument(level = "debug", skip(self, entry))]
    pub fn attach(&mut self, entry: impl Into<TreeEntry>, parent: Index) -> DomainResult<Index> {
        let mut entry = entry.into();
        if !self.arena.contains(parent) {
            return Err(DomainError::NodeNotFound(describe_index(parent)));
        }
        self.check_name(&entry)?;
        entry.set_parent(Some(parent));
        entry.children_mut().clear();
        let idx = self.arena.insert(entry);
        if let Some(parent_entry) = self.arena.get_mut(parent) {
            parent_entry.children_mut().push(idx);
        }
        Ok(idx)
    }

    /// Remove an entry and its whole subtree. Returns the removed entry.
    #[instrument(level = "debug", skip(self))]
    pub fn detach(&mut self, idx: Index) -> DomainResult<TreeEntry> {
        let parent = self
            .arena
            .get(idx)
            .ok_or_else(|| DomainError::NodeNotFound(describe_index(idx)))?
            .parent();

        if let Some(parent_entry) = parent.and_then(|p| self.arena.get_mut(p)) {
            parent_entry.children_mut().retain(|&c| c != idx);
        }
        if self.root == Some(idx) {
            self.root = None;
        }

        let mut stack: Vec<Index> = self
            .arena
            .get(idx)
            .map(|e| e.children().to_vec())
            .unwrap_or_default();
        while let Some(current) = stack.pop() {
            if let Some(entry) = self.arena.remove(current) {
                stack.extend(entry.children().iter().copied());
            }
        }
        debug!("detached subtree at {}", describe_index(idx));
        let mut removed = self
            .arena
            .remove(idx)
            .ok_or_else(|| DomainError::NodeNotFound(describe_index(idx)))?;
        removed.set_parent(None);
        removed.children_mut().clear();
        Ok(removed)
    }

    pub fn get(&self, idx: Index) -> Option<&TreeEntry> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut TreeEntry> {
        self.arena.get_mut(idx)
    }

    pub fn menu(&self, idx: Index) -> Option<&MenuNode> {
        self.get(idx).and_then(TreeEntry::as_menu)
    }

    pub fn menu_mut(&mut self, idx: Index) -> Option<&mut MenuNode> {
        self.get_mut(idx).and_then(TreeEntry::as_menu_mut)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn parent_of(&self, idx: Index) -> Option<Index> {
        self.get(idx).and_then(TreeEntry::parent)
    }

    /// Indices of the renderable children of `idx`, in stored order.
    pub fn menu_children(&self, idx: Index) -> Vec<Index> {
        self.get(idx)
            .map(|entry| {
                entry
                    .children()
                    .iter()
                    .copied()
                    .filter(|&c| self.get(c).and_then(TreeEntry::as_renderable).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Store path of an entry, built from the names up to the root.
    pub fn path_of(&self, idx: Index) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            let entry = self.get(i)?;
            names.push(entry.name());
            current = entry.parent();
        }
        names.reverse();
        Some(format!("/{}", names.join("/")))
    }

    /// Resolve a path such as `/main-item/about-item`. `/` is the root.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_path(&self, path: &str) -> DomainResult<Index> {
        let not_found = || DomainError::NodeNotFound(path.to_string());
        let root = self.root.ok_or_else(not_found)?;
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        let mut current = root;
        match segments.next() {
            None => return Ok(root),
            Some(first) if first == self.get(root).map(TreeEntry::name).unwrap_or_default() => {}
            Some(_) => return Err(not_found()),
        }
        for segment in segments {
            current = self
                .get(current)
                .ok_or_else(not_found)?
                .children()
                .iter()
                .copied()
                .find(|&c| self.get(c).map(TreeEntry::name) == Some(segment))
                .ok_or_else(not_found)?;
        }
        Ok(current)
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn depth(&self) -> usize {
        self.root.map(|root| self.calculate_depth(root)).unwrap_or(0)
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        self.get(idx)
            .map(|entry| {
                1 + entry
                    .children()
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

/// Arena slot number of an entry, for error messages.
fn describe_index(idx: Index) -> String {
    format!("entry #{}", idx.into_raw_parts().0)
}

/// Preorder traversal over every entry, menu or not.
pub struct TreeIterator<'a> {
    tree: &'a MenuTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a MenuTree) -> Self {
        Self {
            tree,
            stack: tree.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeEntry);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(entry) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(entry.children().iter().rev());
                return Some((current, entry));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MenuTree, Index, Vec<Index>) {
        let mut tree = MenuTree::default();
        let root = tree
            .insert_root(MenuNode::new("main-item").with_label("Main"))
            .unwrap();
        let children = vec![
            tree.attach(MenuNode::new("home-item").with_label("Home"), root).unwrap(),
            tree.attach(ForeignNode::new("routes", "route"), root).unwrap(),
            tree.attach(MenuNode::new("about-item").with_label("About"), root).unwrap(),
            tree.attach(ForeignNode::new("home", "content"), root).unwrap(),
            tree.attach(MenuNode::new("contact-item").with_label("Contact"), root).unwrap(),
        ];
        (tree, root, children)
    }

    #[test]
    fn given_mixed_children_when_filtering_then_only_menu_nodes_in_order() {
        let (tree, root, all) = sample();
        let node = tree.menu(root).unwrap();

        let labels: Vec<_> = node
            .children(&tree)
            .iter()
            .map(|c| c.label().unwrap_or_default().to_string())
            .collect();

        assert_eq!(labels, vec!["Home", "About", "Contact"]);
        assert_eq!(tree.menu_children(root), vec![all[0], all[2], all[4]]);
        assert_eq!(node.child_indices().len(), 5);
    }

    #[test]
    fn given_attached_node_then_parent_back_reference_set() {
        let (tree, root, all) = sample();
        assert_eq!(tree.parent_of(all[2]), Some(root));
        assert_eq!(tree.parent_of(root), None);
    }

    #[test]
    fn given_invalid_name_when_attaching_under_strict_policy_then_rejected() {
        let mut tree = MenuTree::default();
        let root = tree.insert_root(MenuNode::new("main-item")).unwrap();

        let result = tree.attach(MenuNode::new("about"), root);

        assert!(matches!(result, Err(DomainError::InvalidNodeName { .. })));
        assert!(tree.get(root).unwrap().children().is_empty());
    }

    #[test]
    fn given_lenient_policy_when_attaching_any_name_then_accepted() {
        let mut tree = MenuTree::new(NamePolicy::lenient());
        let root = tree.insert_root(MenuNode::new("main")).unwrap();
        assert!(tree.attach(MenuNode::new("about"), root).is_ok());
    }

    #[test]
    fn given_path_when_finding_then_resolves_index() {
        let (tree, root, all) = sample();
        assert_eq!(tree.find_by_path("/").unwrap(), root);
        assert_eq!(tree.find_by_path("/main-item").unwrap(), root);
        assert_eq!(tree.find_by_path("/main-item/about-item").unwrap(), all[2]);
        assert!(tree.find_by_path("/main-item/missing-item").is_err());
        assert!(tree.find_by_path("/other-item").is_err());
        assert_eq!(tree.path_of(all[4]).unwrap(), "/main-item/contact-item");
    }

    #[test]
    fn given_subtree_when_detaching_then_descendants_removed() {
        let (mut tree, root, all) = sample();
        let grandchild = tree.attach(MenuNode::new("team-item"), all[2]).unwrap();

        let removed = tree.detach(all[2]).unwrap();

        assert_eq!(removed.name(), "about-item");
        assert!(tree.get(grandchild).is_none());
        assert_eq!(tree.get(root).unwrap().children().len(), 4);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn given_clone_of_inner_node_when_attached_and_detached_then_original_subtree_intact() {
        let (mut tree, root, all) = sample();
        let team = tree.attach(MenuNode::new("team-item").with_label("Team"), all[2]).unwrap();
        let copy = tree.get(all[2]).unwrap().clone();

        let copy_idx = tree.attach(copy, root).unwrap();

        assert!(tree.get(copy_idx).unwrap().children().is_empty());
        assert_eq!(tree.parent_of(team), Some(all[2]));

        tree.detach(copy_idx).unwrap();

        assert!(tree.get(team).is_some());
        let about = tree.menu(all[2]).unwrap();
        let names: Vec<_> = about.children(&tree).iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["team-item"]);
    }

    #[test]
    fn given_detached_subtree_when_reattached_then_arrives_as_leaf() {
        let (mut tree, root, all) = sample();
        tree.attach(MenuNode::new("team-item"), all[2]).unwrap();

        let removed = tree.detach(all[2]).unwrap();
        assert_eq!(removed.parent(), None);
        assert!(removed.children().is_empty());

        let back = tree.attach(removed, root).unwrap();
        assert_eq!(tree.path_of(back).as_deref(), Some("/main-item/about-item"));
        assert!(tree.get(back).unwrap().children().is_empty());
    }

    #[test]
    fn given_stale_index_when_detaching_then_error_names_slot() {
        let (mut tree, _, all) = sample();
        tree.detach(all[0]).unwrap();

        let err = tree.detach(all[0]).unwrap_err();

        assert_eq!(err, DomainError::NodeNotFound("entry #1".to_string()));
        assert!(!err.to_string().contains("generation"));
    }

    #[test]
    fn given_tree_when_iterating_then_preorder_and_depth() {
        let (mut tree, _, all) = sample();
        tree.attach(MenuNode::new("team-item"), all[2]).unwrap();

        let names: Vec<_> = tree.iter().map(|(_, e)| e.name().to_string()).collect();

        assert_eq!(
            names,
            vec![
                "main-item",
                "home-item",
                "routes",
                "about-item",
                "team-item",
                "home",
                "contact-item"
            ]
        );
        assert_eq!(tree.depth(), 3);
    }
}
