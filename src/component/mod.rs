//! Component graph: slotmap-backed tree, selector queries, registry seam.

pub mod node;
pub mod query;
pub mod registry;
pub mod tree;

pub use node::{ComponentData, ComponentId};
pub use registry::ComponentRegistry;
pub use tree::ComponentTree;
