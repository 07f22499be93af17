//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod document;
pub mod error;
pub mod error_ext;
pub mod services;

pub use document::{DocumentFormat, NodeDocument};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
