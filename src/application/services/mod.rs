//! Application services

pub mod menu;

pub use menu::{ChildOptions, MenuService, NodeProblem};
