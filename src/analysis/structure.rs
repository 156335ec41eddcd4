//! Heading tree reconstruction
//!
//! Turns the flat block stream into a tree of heading nodes. Nodes are owned
//! by their parent; the only other structure is the stack of currently open
//! ancestors, which lives for the duration of [`build`].

use serde::Serialize;

use super::roles::Role;
use super::styles::StyleLevelMap;
use crate::document::{BlockItem, ImageRef, Paragraph};

/// One heading occurrence, or the implicit document root (level 0)
#[derive(Debug, Clone, Serialize)]
pub struct StructuralNode {
    pub level: u8,
    pub title: String,
    /// Style name of the heading paragraph
    pub style: Option<String>,
    /// The heading paragraph itself; `None` for the root
    pub heading: Option<Paragraph>,
    /// Items between this heading and the next heading of any level
    pub content: Vec<BlockItem>,
    pub children: Vec<StructuralNode>,
    pub role: Role,
}

impl StructuralNode {
    pub fn root() -> Self {
        Self {
            level: 0,
            title: String::new(),
            style: None,
            heading: None,
            content: Vec::new(),
            children: Vec::new(),
            role: Role::ContentUnit,
        }
    }

    /// Pictures drawn inside the heading paragraph open the node's content
    pub fn from_heading(level: u8, mut heading: Paragraph) -> Self {
        let content = std::mem::take(&mut heading.image_refs)
            .into_iter()
            .map(|id| BlockItem::Image(ImageRef::new(id)))
            .collect();
        Self {
            level,
            title: heading.text(),
            style: heading.style.clone(),
            heading: Some(heading),
            content,
            ..Self::root()
        }
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// Heading level of a block, if it opens a new node
///
/// The style map decides first; a paragraph with a direct outline level is
/// a heading even when its style is unknown. A Word-numbered paragraph is a
/// heading when its style maps to a level, and a list item otherwise.
pub fn heading_level(item: &BlockItem, style_levels: &StyleLevelMap) -> Option<u8> {
    match item {
        BlockItem::Paragraph(para) => para
            .style
            .as_deref()
            .and_then(|style| style_levels.get(style))
            .or_else(|| para.outline_level.filter(|level| *level <= 8).map(|level| level + 1)),
        BlockItem::ListItem(entry) => entry
            .style
            .as_deref()
            .and_then(|style| style_levels.get(style)),
        BlockItem::Table(_) | BlockItem::Image(_) => None,
    }
}

/// Build the heading tree from blocks in document order
pub fn build<I>(blocks: I, style_levels: &StyleLevelMap) -> StructuralNode
where
    I: IntoIterator<Item = BlockItem>,
{
    let mut stack = vec![StructuralNode::root()];
    let mut headings = 0usize;
    let mut items = 0usize;

    for item in blocks {
        let Some(level) = heading_level(&item, style_levels) else {
            items += 1;
            if let Some(top) = stack.last_mut() {
                top.content.push(item);
            }
            continue;
        };

        let para = match item {
            BlockItem::Paragraph(para) => para,
            BlockItem::ListItem(entry) => Paragraph::from(entry),
            BlockItem::Table(_) | BlockItem::Image(_) => continue,
        };

        // Close every open node at the same or a deeper level
        while stack.len() > 1 && stack.last().is_some_and(|top| top.level >= level) {
            close_top(&mut stack);
        }

        log::debug!("Heading L{level}: '{}'", para.text());
        headings += 1;
        stack.push(StructuralNode::from_heading(level, para));
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }

    log::info!("Structure analysis: {headings} headings, {items} content items");
    stack.pop().unwrap_or_else(StructuralNode::root)
}

fn close_top(stack: &mut Vec<StructuralNode>) {
    if let Some(node) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
        }
    }
}
