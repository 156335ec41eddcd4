use serde::Serialize;

use super::structure::StructuralNode;

/// What a node becomes in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    /// Only groups subsections
    Container,
    /// Owns renderable content
    ContentUnit,
}

/// Role from local structure only: children and no own content make a container
pub fn resolve(node: &StructuralNode) -> Role {
    if !node.children.is_empty() && node.content.is_empty() {
        Role::Container
    } else {
        Role::ContentUnit
    }
}

/// Assign roles over the whole tree, children before parents
pub fn resolve_roles(node: &mut StructuralNode) {
    for child in &mut node.children {
        resolve_roles(child);
    }
    node.role = resolve(node);
    if !node.is_root() {
        log::debug!("Role: '{}' (L{}) -> {:?}", node.title, node.level, node.role);
    }
}
