//! Projection of a menu node into the options consumed by the menu renderer.

use serde::Serialize;

use crate::domain::attributes::AttributeMap;
use crate::domain::content::ContentRef;
use crate::domain::error::DomainResult;
use crate::domain::node::MenuNode;

/// Flat per-entry configuration for the menu renderer.
///
/// Every field is always serialized; absent values become `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuOptions {
    pub uri: Option<String>,
    pub route: Option<String>,
    pub label: Option<String>,
    pub attributes: AttributeMap<String>,
    pub child_attributes: AttributeMap<String>,
    pub display: bool,
    pub display_children: bool,
    pub content: Option<ContentRef>,
    pub route_parameters: AttributeMap<String>,
    pub route_absolute: bool,
    pub link_attributes: AttributeMap<String>,
    pub label_attributes: AttributeMap<String>,
}

/// Build the options from the node's current fields.
///
/// Route parameters, absolute routing, link and label attributes are not
/// stored on menu nodes yet and are emitted with fixed neutral values.
pub fn project(node: &MenuNode) -> DomainResult<MenuOptions> {
    Ok(MenuOptions {
        uri: node.uri().map(str::to_string),
        route: node.route().map(str::to_string),
        label: node.label().map(str::to_string),
        attributes: node.attributes()?,
        child_attributes: node.child_attributes()?,
        display: true,
        display_children: true,
        content: node.content().cloned(),
        // TODO: store route parameters and link/label attributes on the node
        route_parameters: AttributeMap::new(),
        route_absolute: false,
        link_attributes: AttributeMap::new(),
        label_attributes: AttributeMap::new(),
    })
}
