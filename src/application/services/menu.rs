//! Menu document service
//!
//! Loads menu documents, resolves nodes by path, and projects them for the
//! menu renderer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::application::document::{self, DocumentFormat};
use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, MenuOptions, MenuTree, NamePolicy, TreeEntry};
use crate::infrastructure::traits::FileSystem;

/// Problem found on a single node by [`MenuService::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeProblem {
    /// Store path of the node
    pub path: String,
    pub error: DomainError,
}

/// Options of one renderable child, with its store path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildOptions {
    pub path: String,
    pub options: MenuOptions,
}

/// Service for reading and inspecting menu documents.
pub struct MenuService {
    fs: Arc<dyn FileSystem>,
    policy: NamePolicy,
}

impl MenuService {
    /// Create a new menu service.
    pub fn new(fs: Arc<dyn FileSystem>, policy: NamePolicy) -> Self {
        Self { fs, policy }
    }

    pub fn policy(&self) -> &NamePolicy {
        &self.policy
    }

    /// Load a menu document, validating names with the configured policy.
    pub fn load(&self, path: &Path) -> ApplicationResult<MenuTree> {
        self.load_with(path, self.policy.clone())
    }

    /// Load a menu document with an explicit naming policy.
    #[instrument(level = "debug", skip(self))]
    pub fn load_with(&self, path: &Path, policy: NamePolicy) -> ApplicationResult<MenuTree> {
        let format = DocumentFormat::from_path(path)?;
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read menu document", path)?;
        let root = format.parse(&content, path)?;
        let tree = document::into_tree(root, policy)?;
        debug!("load: {} entries from {}", tree.len(), path.display());
        Ok(tree)
    }

    /// Write a tree back to disk, in the format implied by the extension.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn save(&self, path: &Path, tree: &MenuTree) -> ApplicationResult<()> {
        let format = DocumentFormat::from_path(path)?;
        let root = document::from_tree(tree)
            .ok_or_else(|| ApplicationError::EmptyTree(PathBuf::from(path)))?;
        let content = format.render(&root, path)?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write menu document", path)?;
        Ok(())
    }

    /// Options of the menu node at `node_path`.
    pub fn options_at(&self, tree: &MenuTree, node_path: &str) -> ApplicationResult<MenuOptions> {
        let idx = tree.find_by_path(node_path)?;
        let node = tree
            .menu(idx)
            .ok_or_else(|| DomainError::NodeNotFound(format!("{} is not a menu node", node_path)))?;
        Ok(node.options()?)
    }

    /// Options of every renderable child of the node at `node_path`.
    pub fn children_at(
        &self,
        tree: &MenuTree,
        node_path: &str,
    ) -> ApplicationResult<Vec<ChildOptions>> {
        let idx = tree.find_by_path(node_path)?;
        tree.menu_children(idx)
            .into_iter()
            .filter_map(|child| Some((child, tree.menu(child)?)))
            .map(|(child, node)| -> ApplicationResult<ChildOptions> {
                Ok(ChildOptions {
                    path: tree.path_of(child).unwrap_or_default(),
                    options: node.options()?,
                })
            })
            .collect()
    }

    /// Report every menu node whose stored state cannot be rendered cleanly:
    /// corrupt attribute columns, missing labels, or names without the suffix.
    #[instrument(level = "debug", skip_all)]
    pub fn check(&self, tree: &MenuTree) -> Vec<NodeProblem> {
        let strict = NamePolicy {
            enforce: true,
            ..self.policy.clone()
        };
        let mut problems = Vec::new();
        for (idx, entry) in tree.iter() {
            let TreeEntry::Menu(node) = entry else {
                continue;
            };
            let path = tree.path_of(idx).unwrap_or_default();
            let errors = [
                strict.check(node.name()).err(),
                node.attributes().err(),
                node.child_attributes().err(),
                node.text().err(),
            ];
            for error in errors.into_iter().flatten() {
                warn!("check: {}: {}", path, error);
                problems.push(NodeProblem {
                    path: path.clone(),
                    error,
                });
            }
        }
        problems
    }
}
