//! Text rendering of menu trees for the terminal.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{MenuNode, MenuTree};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// One-line summary of a menu node: label, name, link target, content.
pub fn describe(node: &MenuNode) -> String {
    let mut line = match node.label() {
        Some(label) => format!("{} [{}]", label, node.name()),
        None => format!("<no label> [{}]", node.name()),
    };
    if let Some(route) = node.route() {
        line.push_str(&format!(" route:{}", route));
    }
    if let Some(uri) = node.uri() {
        line.push_str(&format!(" uri:{}", uri));
    }
    if let Some(content) = node.content() {
        let mode = if node.is_weak() { "weak" } else { "strong" };
        line.push_str(&format!(" {}:{}", mode, content));
    }
    line
}

impl TreeNodeConvert for MenuTree {
    /// Only renderable entries appear; foreign entries and their subtrees are skipped.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(tree: &MenuTree, idx: Index, node: &MenuNode) -> Tree<String> {
            let leaves: Vec<_> = tree
                .menu_children(idx)
                .into_iter()
                .filter_map(|child| tree.menu(child).map(|n| build_tree(tree, child, n)))
                .collect();
            Tree::new(describe(node)).with_leaves(leaves)
        }

        match self.root().and_then(|root| self.menu(root).map(|node| (root, node))) {
            Some((root, node)) => build_tree(self, root, node),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
