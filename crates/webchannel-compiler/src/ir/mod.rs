//! Language-agnostic interface representation.
//!
//! Produced by the extractor from reflected class metadata and consumed by
//! the code emitter. Every value here is rebuilt from scratch on each
//! generation pass.

mod interface;
mod members;
mod types;

pub use interface::{ClassKind, Interface};
pub use members::{Notification, Operation, Parameter, Property, ReturnType};
pub use types::SourceType;
