//! Serialized form of a menu tree.
//!
//! Field names follow the persisted shape of the document store. The parent
//! back-reference is implied by nesting. Entries with a `kind` other than
//! `menu` are kept as foreign entries.
//!
//! Foreign entries keep only their id, name, kind and children. Menu fields
//! stored on them are dropped at load and do not come back on export. An
//! explicit `"kind": "menu"` is written back as no `kind` at all.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    AttributeColumns, ContentRef, ContentSwitch, DomainError, ForeignNode, MenuNode, MenuTree,
    NamePolicy, NodeId, TreeEntry,
};
use generational_arena::Index;

/// Kind tag of menu entries.
pub const MENU_KIND: &str = "menu";

fn default_weak_mode() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// One persisted tree entry and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weak_content: Option<ContentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_content: Option<ContentRef>,
    #[serde(default = "default_weak_mode", skip_serializing_if = "is_true")]
    pub weak_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_attribute_keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_attribute_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDocument>,
}

impl NodeDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: None,
            label: None,
            uri: None,
            route: None,
            weak_content: None,
            strong_content: None,
            weak_mode: true,
            attribute_keys: None,
            attribute_values: None,
            child_attribute_keys: None,
            child_attribute_values: None,
            children: Vec::new(),
        }
    }

    pub fn is_menu(&self) -> bool {
        self.kind.as_deref().map_or(true, |k| k == MENU_KIND)
    }

    fn carries_menu_fields(&self) -> bool {
        self.label.is_some()
            || self.uri.is_some()
            || self.route.is_some()
            || self.weak_content.is_some()
            || self.strong_content.is_some()
            || !self.weak_mode
            || self.attribute_keys.is_some()
            || self.attribute_values.is_some()
            || self.child_attribute_keys.is_some()
            || self.child_attribute_values.is_some()
    }

    /// Split into a tree entry and the child documents still to attach.
    fn into_entry(self) -> ApplicationResult<(TreeEntry, Vec<NodeDocument>)> {
        let is_menu = self.is_menu();
        let drops_fields = !is_menu && self.carries_menu_fields();
        let id = self.id.map(NodeId::new);
        if !is_menu {
            if drops_fields {
                warn!("dropping menu fields stored on foreign entry {}", self.name);
            }
            let mut foreign = ForeignNode::new(self.name, self.kind.unwrap_or_default());
            foreign.id = id;
            return Ok((foreign.into(), self.children));
        }

        let content =
            ContentSwitch::from_slots(self.weak_mode, self.weak_content, self.strong_content)
                    .ok_or_else(|| DomainError::ConflictingContent {
                    name: self.name.clone(),
                })?;

        let mut node = MenuNode::new(self.name);
        node.set_id(id);
        node.set_label(self.label);
        node.set_uri(self.uri);
        node.set_route(self.route);
        node.restore_content(content);
        node.restore_columns(
            AttributeColumns::from_raw(self.attribute_keys, self.attribute_values),
            AttributeColumns::from_raw(self.child_attribute_keys, self.child_attribute_values),
        );
        Ok((node.into(), self.children))
    }

    fn from_entry(entry: &TreeEntry) -> Self {
        match entry {
            TreeEntry::Foreign(foreign) => Self {
                id: foreign.id.as_ref().map(|id| id.to_string()),
                kind: Some(foreign.kind.clone()),
                ..Self::new(foreign.name.clone())
            },
            TreeEntry::Menu(node) => {
                let switch = node.content_switch();
                let columns = node.attribute_columns();
                let child_columns = node.child_attribute_columns();
                Self {
                    id: node.id().map(|id| id.to_string()),
                    label: node.label().map(str::to_string),
                    uri: node.uri().map(str::to_string),
                    route: node.route().map(str::to_string),
                    weak_content: switch.weak_slot().cloned(),
                    strong_content: switch.strong_slot().cloned(),
                    weak_mode: switch.is_weak(),
                    attribute_keys: columns.keys().map(<[String]>::to_vec),
                    attribute_values: columns.values().map(<[String]>::to_vec),
                    child_attribute_keys: child_columns.keys().map(<[String]>::to_vec),
                    child_attribute_values: child_columns.values().map(<[String]>::to_vec),
                    ..Self::new(node.name())
                }
            }
        }
    }
}

/// Build a tree from a root document, validating names with `policy`.
pub fn into_tree(root: NodeDocument, policy: NamePolicy) -> ApplicationResult<MenuTree> {
    let mut tree = MenuTree::new(policy);
    let (entry, children) = root.into_entry()?;
    let root_idx = tree.insert_root(entry)?;
    attach_children(&mut tree, root_idx, children)?;
    debug!("into_tree: {} entries", tree.len());
    Ok(tree)
}

fn attach_children(
    tree: &mut MenuTree,
    parent: Index,
    children: Vec<NodeDocument>,
) -> ApplicationResult<()> {
    for child in children {
        let (entry, grandchildren) = child.into_entry()?;
        let idx = tree.attach(entry, parent)?;
        attach_children(tree, idx, grandchildren)?;
    }
    Ok(())
}

/// Serialize a tree back into its root document. `None` for an empty tree.
pub fn from_tree(tree: &MenuTree) -> Option<NodeDocument> {
    tree.root().and_then(|root| document_at(tree, root))
}

fn document_at(tree: &MenuTree, idx: Index) -> Option<NodeDocument> {
    let entry = tree.get(idx)?;
    let mut document = NodeDocument::from_entry(entry);
    document.children = entry
        .children()
        .iter()
        .filter_map(|&child| document_at(tree, child))
        .collect();
    Some(document)
}

/// On-disk encodings of a menu document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ApplicationError::Document {
                path: path.to_path_buf(),
                message: format!("unsupported extension: {}", other.unwrap_or("<none>")),
            }),
        }
    }

    pub fn parse(self, content: &str, path: &Path) -> ApplicationResult<NodeDocument> {
        let invalid = |message: String| ApplicationError::Document {
            path: path.to_path_buf(),
            message,
        };
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| invalid(e.to_string())),
            Self::Toml => toml::from_str(content).map_err(|e| invalid(e.to_string())),
        }
    }

    pub fn render(self, document: &NodeDocument, path: &Path) -> ApplicationResult<String> {
        let invalid = |message: String| ApplicationError::Document {
            path: path.to_path_buf(),
            message,
        };
        match self {
            Self::Json => {
                serde_json::to_string_pretty(document).map_err(|e| invalid(e.to_string()))
            }
            Self::Toml => toml::to_string_pretty(document).map_err(|e| invalid(e.to_string())),
        }
    }
}
