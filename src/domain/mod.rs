//! Domain layer: menu nodes and their pure transformations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod attributes;
pub mod content;
pub mod error;
pub mod node;
pub mod options;

pub use arena::{ForeignNode, MenuTree, TreeEntry, TreeIterator};
pub use attributes::{decode, encode, AttributeColumns, AttributeMap};
pub use content::{ContentRef, ContentSwitch};
pub use error::{DomainError, DomainResult};
pub use node::{MenuNode, NamePolicy, NodeId, RenderableNode, MENU_NODE_SUFFIX};
pub use options::{project, MenuOptions};
