//! Structural inference over the block stream
//!
//! Style classification, heading tree construction and role assignment.
//! Nothing here renders output; see [`crate::topics`] for that.

pub mod roles;
pub mod structure;
pub mod styles;

pub use roles::{resolve, resolve_roles, Role};
pub use structure::{build, StructuralNode};
pub use styles::{classify, classify_catalog, infer_level, StyleLevelMap, Verdict};
