//! Menu node entity.

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::arena::MenuTree;
use crate::domain::attributes::{AttributeColumns, AttributeMap};
use crate::domain::content::{ContentRef, ContentSwitch};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::options::{self, MenuOptions};

/// Suffix every menu node name carries by convention.
pub const MENU_NODE_SUFFIX: &str = "-item";

/// Identifier assigned by the document store on first commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Naming rule applied when a menu node is attached to a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePolicy {
    pub suffix: String,
    pub enforce: bool,
}

impl Default for NamePolicy {
    fn default() -> Self {
        Self {
            suffix: MENU_NODE_SUFFIX.to_string(),
            enforce: true,
        }
    }
}

impl NamePolicy {
    /// Policy that accepts any name.
    pub fn lenient() -> Self {
        Self {
            enforce: false,
            ..Self::default()
        }
    }

    pub fn check(&self, name: &str) -> DomainResult<()> {
        if !self.enforce || name.ends_with(&self.suffix) {
            return Ok(());
        }
        Err(DomainError::InvalidNodeName {
            name: name.to_string(),
            suffix: self.suffix.clone(),
        })
    }
}

/// Capability a tree entry needs to take part in menu rendering.
pub trait RenderableNode: fmt::Debug {
    fn name(&self) -> &str;

    fn label(&self) -> Option<&str>;

    fn uri(&self) -> Option<&str>;

    fn route(&self) -> Option<&str>;

    /// Options consumed by the menu renderer.
    fn options(&self) -> DomainResult<MenuOptions>;

    /// Renderable children, in stored order.
    fn children<'t>(&self, tree: &'t MenuTree) -> Vec<&'t dyn RenderableNode>;
}

/// One menu entry in the hierarchical store.
///
/// `parent` is a back-reference only; the tree owns every node. All field
/// writes go through the setters below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    id: Option<NodeId>,
    parent: Option<Index>,
    name: String,
    label: Option<String>,
    uri: Option<String>,
    route: Option<String>,
    content: ContentSwitch<ContentRef>,
    attributes: AttributeColumns<String>,
    child_attributes: AttributeColumns<String>,
    children: Vec<Index>,
}

impl MenuNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            parent: None,
            name: name.into(),
            label: None,
            uri: None,
            route: None,
            content: ContentSwitch::new(),
            attributes: AttributeColumns::default(),
            child_attributes: AttributeColumns::default(),
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn id(&self) -> Option<&NodeId> {
        self.id.as_ref()
    }

    pub(crate) fn set_id(&mut self, id: Option<NodeId>) {
        self.id = id;
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<Index>) {
        self.parent = parent;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn set_uri(&mut self, uri: Option<String>) {
        self.uri = uri;
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn set_route(&mut self, route: Option<String>) {
        self.route = route;
    }

    pub fn attributes(&self) -> DomainResult<AttributeMap<String>> {
        self.attributes.decode()
    }

    pub fn set_attributes(&mut self, attributes: &AttributeMap<String>) {
        self.attributes.store(attributes);
    }

    /// Attributes applied to this node's children collectively.
    pub fn child_attributes(&self) -> DomainResult<AttributeMap<String>> {
        self.child_attributes.decode()
    }

    pub fn set_child_attributes(&mut self, attributes: &AttributeMap<String>) {
        self.child_attributes.store(attributes);
    }

    /// Raw persisted columns, for the storage boundary.
    pub fn attribute_columns(&self) -> &AttributeColumns<String> {
        &self.attributes
    }

    pub fn child_attribute_columns(&self) -> &AttributeColumns<String> {
        &self.child_attributes
    }

    pub(crate) fn restore_columns(
        &mut self,
        attributes: AttributeColumns<String>,
        child_attributes: AttributeColumns<String>,
    ) {
        self.attributes = attributes;
        self.child_attributes = child_attributes;
    }

    pub fn content(&self) -> Option<&ContentRef> {
        self.content.get()
    }

    pub fn set_content(&mut self, content: Option<ContentRef>) {
        self.content.set(content);
    }

    pub fn is_weak(&self) -> bool {
        self.content.is_weak()
    }

    pub fn set_weak(&mut self, weak: bool) {
        self.content.set_weak(weak);
    }

    pub fn content_switch(&self) -> &ContentSwitch<ContentRef> {
        &self.content
    }

    pub(crate) fn restore_content(&mut self, content: ContentSwitch<ContentRef>) {
        self.content = content;
    }

    /// Indices of every stored child, renderable or not.
    pub fn child_indices(&self) -> &[Index] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Index> {
        &mut self.children
    }

    /// Children that satisfy [`RenderableNode`], in stored order. Other entries
    /// are skipped silently.
    #[instrument(level = "trace", skip(self, tree), fields(name = %self.name))]
    pub fn children<'t>(&self, tree: &'t MenuTree) -> Vec<&'t dyn RenderableNode> {
        self.children
            .iter()
            .filter_map(|&idx| tree.get(idx))
            .filter_map(|entry| entry.as_renderable())
            .collect()
    }

    /// Label as plain text; fails when no label is set.
    pub fn text(&self) -> DomainResult<&str> {
        self.label().ok_or_else(|| DomainError::MissingLabel {
            name: self.name.clone(),
        })
    }

    pub fn options(&self) -> DomainResult<MenuOptions> {
        options::project(self)
    }
}

/// Renders the label, or nothing when the label is unset.
impl fmt::Display for MenuNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().unwrap_or_default())
    }
}

impl RenderableNode for MenuNode {
    fn name(&self) -> &str {
        MenuNode::name(self)
    }

    fn label(&self) -> Option<&str> {
        MenuNode::label(self)
    }

    fn uri(&self) -> Option<&str> {
        MenuNode::uri(self)
    }

    fn route(&self) -> Option<&str> {
        MenuNode::route(self)
    }

    fn options(&self) -> DomainResult<MenuOptions> {
        MenuNode::options(self)
    }

    fn children<'t>(&self, tree: &'t MenuTree) -> Vec<&'t dyn RenderableNode> {
        MenuNode::children(self, tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn nav_attributes() -> AttributeMap<String> {
        [("class", "nav".to_string()), ("id", "main".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn given_attributes_when_set_then_read_back_in_order() {
        let mut node = MenuNode::new("main-item");
        node.set_attributes(&nav_attributes());

        let attributes = node.attributes().unwrap();

        assert_eq!(attributes.keys().collect::<Vec<_>>(), vec!["class", "id"]);
        assert_eq!(attributes.get("class"), Some(&"nav".to_string()));
        assert_eq!(attributes.get("id"), Some(&"main".to_string()));
    }

    #[test]
    fn given_child_attributes_when_set_then_node_attributes_unaffected() {
        let mut node = MenuNode::new("main-item");
        node.set_child_attributes(&nav_attributes());

        assert!(node.attributes().unwrap().is_empty());
        assert_eq!(node.child_attributes().unwrap(), nav_attributes());
    }

    #[test]
    fn given_corrupt_columns_when_reading_attributes_then_length_mismatch() {
        let mut node = MenuNode::new("main-item");
        node.restore_columns(
            AttributeColumns::from_raw(Some(vec!["a".into(), "b".into()]), Some(vec!["x".into()])),
            AttributeColumns::default(),
        );

        assert_eq!(
            node.attributes(),
            Err(DomainError::LengthMismatch { keys: 2, values: 1 })
        );
    }

    #[test]
    fn given_weak_content_when_switching_modes_then_node_follows_switch() {
        let mut node = MenuNode::new("home-item");
        node.set_content(Some(ContentRef::from("A")));

        node.set_weak(false);
        assert!(!node.is_weak());
        assert_eq!(node.content_switch().weak_slot(), None);
        assert_eq!(node.content_switch().strong_slot(), Some(&ContentRef::from("A")));
        assert_eq!(node.content(), Some(&ContentRef::from("A")));

        node.set_weak(true);
        assert_eq!(node.content_switch().weak_slot(), Some(&ContentRef::from("A")));
        assert_eq!(node.content_switch().strong_slot(), None);
    }

    #[test]
    fn given_label_when_displayed_then_renders_label() {
        let node = MenuNode::new("home-item").with_label("Home");
        assert_eq!(node.to_string(), "Home");
        assert_eq!(node.text(), Ok("Home"));
    }

    #[test]
    fn given_no_label_when_displayed_then_empty_and_text_fails() {
        let node = MenuNode::new("home-item");
        assert_eq!(node.to_string(), "");
        assert_eq!(
            node.text(),
            Err(DomainError::MissingLabel {
                name: "home-item".into()
            })
        );
    }

    #[rstest]
    #[case("home-item", true)]
    #[case("home", false)]
    #[case("-item", true)]
    #[case("item", false)]
    fn given_strict_policy_when_checking_name_then_suffix_required(
        #[case] name: &str,
        #[case] valid: bool,
    ) {
        assert_eq!(NamePolicy::default().check(name).is_ok(), valid);
        assert!(NamePolicy::lenient().check(name).is_ok());
    }
}
