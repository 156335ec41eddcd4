//! Core data structures for the block stream
//!
//! This module defines the public types handed over by a document reader:
//! block items in document order, run formatting, tables, declared styles
//! and the registry of embedded images.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Type aliases for convenience
pub type TableRows = Vec<Vec<TableCell>>;
pub type NumberingInfo = (i32, u8);

/// One block-level item of the source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BlockItem {
    Paragraph(Paragraph),
    ListItem(ListItem),
    Table(TableData),
    Image(ImageRef),
}

impl BlockItem {
    /// Plain text carried by the item, used for logging and titles
    pub fn plain_text(&self) -> String {
        match self {
            BlockItem::Paragraph(para) => para.text(),
            BlockItem::ListItem(item) => runs_text(&item.runs),
            BlockItem::Table(table) => table
                .rows
                .iter()
                .flat_map(|row| row.iter().map(|cell| cell.content.as_str()))
                .collect::<Vec<_>>()
                .join(" "),
            BlockItem::Image(image) => image.description.clone().unwrap_or_default(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BlockItem::Paragraph(_) => "paragraph",
            BlockItem::ListItem(_) => "list item",
            BlockItem::Table(_) => "table",
            BlockItem::Image(_) => "image",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<FormattedRun>,
    /// Display name of the paragraph style
    pub style: Option<String>,
    /// Direct `w:outlineLvl` on the paragraph (0-based)
    pub outline_level: Option<u8>,
    /// Relationship ids of images drawn inside the paragraph
    pub image_refs: Vec<String>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            runs: vec![FormattedRun::plain(text)],
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_image(mut self, relationship_id: impl Into<String>) -> Self {
        self.image_refs.push(relationship_id.into());
        self
    }

    pub fn text(&self) -> String {
        runs_text(&self.runs).trim().to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.image_refs.is_empty() && self.runs.iter().all(|run| run.text.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextFormatting {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub color: Option<String>,
}

impl TextFormatting {
    pub fn is_plain(&self) -> bool {
        *self == TextFormatting::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedRun {
    pub text: String,
    pub formatting: TextFormatting,
}

impl FormattedRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            formatting: TextFormatting::default(),
        }
    }

    /// Consolidate adjacent runs with identical formatting into single runs
    pub fn consolidate_runs(runs: Vec<FormattedRun>) -> Vec<FormattedRun> {
        let mut consolidated: Vec<FormattedRun> = Vec::with_capacity(runs.len());

        for run in runs {
            match consolidated.last_mut() {
                Some(current) if current.formatting == run.formatting => {
                    current.text.push_str(&run.text);
                }
                _ => consolidated.push(run),
            }
        }

        consolidated
    }
}

pub(crate) fn runs_text(runs: &[FormattedRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListItem {
    pub runs: Vec<FormattedRun>,
    /// Nesting level, 0 for top-level entries
    pub level: u8,
    pub ordered: bool,
    pub style: Option<String>,
}

impl ListItem {
    pub fn new(text: impl Into<String>, ordered: bool) -> Self {
        Self {
            runs: vec![FormattedRun::plain(text)],
            ordered,
            ..Default::default()
        }
    }

    pub fn at_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// A numbered paragraph promoted to a heading keeps its runs and style
impl From<ListItem> for Paragraph {
    fn from(item: ListItem) -> Self {
        Self {
            runs: item.runs,
            style: item.style,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableData {
    pub rows: TableRows,
    /// First row renders as the table head
    pub has_header: bool,
}

impl TableData {
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    pub content: String,
    pub runs: Vec<FormattedRun>,
    /// Relationship ids of images drawn inside the cell
    #[serde(default)]
    pub image_refs: Vec<String>,
}

impl TableCell {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            runs: vec![FormattedRun::plain(content.clone())],
            content,
            image_refs: Vec::new(),
        }
    }

    pub fn with_image(mut self, relationship_id: impl Into<String>) -> Self {
        self.image_refs.push(relationship_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.image_refs.is_empty()
    }
}

/// A block-level drawing pointing into the image registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub relationship_id: String,
    pub description: Option<String>,
}

impl ImageRef {
    pub fn new(relationship_id: impl Into<String>) -> Self {
        Self {
            relationship_id: relationship_id.into(),
            description: None,
        }
    }
}

/// A paragraph style declared in the document's style catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDefinition {
    pub id: String,
    pub name: String,
    /// Raw `w:outlineLvl` value, 0-based
    pub outline_level: Option<i32>,
}

impl StyleDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            outline_level: None,
        }
    }

    pub fn with_outline_level(mut self, level: i32) -> Self {
        self.outline_level = Some(level);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    /// Output filename, unique within the registry
    pub filename: String,
}

/// Embedded images keyed by relationship id
#[derive(Debug, Clone, Default)]
pub struct ImageRegistry {
    images: HashMap<String, DecodedImage>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, relationship_id: impl Into<String>, image: DecodedImage) {
        self.images.insert(relationship_id.into(), image);
    }

    pub fn get(&self, relationship_id: &str) -> Option<&DecodedImage> {
        self.images.get(relationship_id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DecodedImage)> {
        self.images.iter()
    }
}
