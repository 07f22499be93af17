//! Menu nodes for hierarchical document stores.
//!
//! A menu node keeps its attribute maps as parallel key/value sequences, links
//! to content through a weak or a strong reference slot, and projects itself
//! into the options a menu renderer consumes.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
