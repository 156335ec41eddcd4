//! Document reading
//!
//! [`DocumentReader`] is the seam between archive parsing and structural
//! inference: it yields declared styles, the block stream in document order
//! and the embedded images. [`DocxReader`] implements it for .docx files on
//! top of docx-rs for the body and quick-xml for the package parts docx-rs
//! does not expose.

use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

use super::io::{open_docx_archive, read_part, validate_docx_path, NUMBERING_PART, STYLES_PART};
use super::models::*;
use super::parsing::formatting::{extract_outline_level, extract_paragraph_content};
use super::parsing::images::extract_images;
use super::parsing::list::detect_list_item;
use super::parsing::numbering::NumberingCatalog;
use super::parsing::styles::{parse_paragraph_styles, style_names_by_id};
use super::parsing::table::extract_table_data;
use crate::error::{ConversionError, Result};

/// Lazily produced block items, in document order
pub type Blocks<'a> = Box<dyn Iterator<Item = BlockItem> + 'a>;

/// Source of styles, blocks and images for one conversion run
pub trait DocumentReader {
    /// Paragraph styles declared by the document
    fn styles(&self) -> Result<Vec<StyleDefinition>>;

    /// A fresh pass over the block stream; each call restarts from the top
    fn blocks(&self) -> Blocks<'_>;

    /// Embedded images keyed by relationship id
    fn images(&self) -> Result<ImageRegistry>;
}

/// Reader over a parsed .docx package
pub struct DocxReader {
    bytes: Vec<u8>,
    docx: docx_rs::Docx,
    style_names: HashMap<String, String>,
    numbering: NumberingCatalog,
}

impl std::fmt::Debug for DocxReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocxReader")
            .field("size", &self.bytes.len())
            .field("styles", &self.style_names.len())
            .finish()
    }
}

impl DocxReader {
    /// Validate and parse a .docx file from disk
    pub fn open(file_path: &Path) -> Result<Self> {
        validate_docx_path(file_path)?;
        let bytes = std::fs::read(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Parse a .docx package already held in memory
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = open_docx_archive(&bytes)?;

        let docx =
            docx_rs::read_docx(&bytes).map_err(|e| ConversionError::Docx(e.to_string()))?;

        // Style and numbering parts only refine the body; losing them degrades output
        let styles = read_part(&mut archive, STYLES_PART)?
            .map(|xml| parse_paragraph_styles(&xml))
            .transpose()
            .unwrap_or_else(|e| {
                log::warn!("Could not read style catalog, paragraph styles unresolved: {e}");
                None
            })
            .unwrap_or_default();

        let numbering = read_part(&mut archive, NUMBERING_PART)?
            .map(|xml| NumberingCatalog::parse(&xml))
            .transpose()
            .unwrap_or_else(|e| {
                log::warn!("Could not read numbering definitions: {e}");
                None
            })
            .unwrap_or_default();

        log::debug!(
            "Opened docx: {} bytes, {} body elements, {} paragraph styles",
            bytes.len(),
            docx.document.children.len(),
            styles.len()
        );

        Ok(Self {
            style_names: style_names_by_id(&styles),
            bytes,
            docx,
            numbering,
        })
    }

    fn convert_paragraph(&self, para: &docx_rs::Paragraph) -> Vec<BlockItem> {
        let content = extract_paragraph_content(para);
        let style = para
            .property
            .style
            .as_ref()
            .map(|style| self.resolve_style_name(&style.val));

        let outline_level = extract_outline_level(para);

        // Numbered items keep their style; the structure pass promotes the
        // ones whose style turns out to be a heading
        if let Some(info) = detect_list_item(para, style.as_deref(), &self.numbering)
            .filter(|_| outline_level.is_none())
        {
            let mut blocks = Vec::new();
            if !content.runs.iter().all(|run| run.text.trim().is_empty()) {
                blocks.push(BlockItem::ListItem(ListItem {
                    runs: content.runs,
                    level: info.level,
                    ordered: info.is_ordered,
                    style,
                }));
            }
            blocks.extend(content.image_refs.into_iter().map(image_block));
            return blocks;
        }

        let text_empty = content.runs.iter().all(|run| run.text.trim().is_empty());
        match (text_empty, content.image_refs.is_empty()) {
            // Empty paragraph
            (true, true) => Vec::new(),
            // Picture-only paragraph
            (true, false) => content.image_refs.into_iter().map(image_block).collect(),
            _ => vec![BlockItem::Paragraph(Paragraph {
                runs: content.runs,
                style,
                outline_level,
                image_refs: content.image_refs,
            })],
        }
    }

    fn resolve_style_name(&self, style_id: &str) -> String {
        self.style_names
            .get(style_id)
            .cloned()
            .unwrap_or_else(|| style_id.to_string())
    }
}

fn image_block(relationship_id: String) -> BlockItem {
    BlockItem::Image(ImageRef::new(relationship_id))
}

impl DocumentReader for DocxReader {
    fn styles(&self) -> Result<Vec<StyleDefinition>> {
        let mut archive = open_docx_archive(&self.bytes)?;
        match read_part(&mut archive, STYLES_PART)? {
            Some(xml) => parse_paragraph_styles(&xml),
            None => Ok(Vec::new()),
        }
    }

    fn blocks(&self) -> Blocks<'_> {
        Box::new(
            self.docx
                .document
                .children
                .iter()
                .flat_map(move |child| match child {
                    docx_rs::DocumentChild::Paragraph(para) => self.convert_paragraph(para),
                    docx_rs::DocumentChild::Table(table) => extract_table_data(table)
                        .map(BlockItem::Table)
                        .into_iter()
                        .collect(),
                    _ => Vec::new(),
                }),
        )
    }

    fn images(&self) -> Result<ImageRegistry> {
        let mut archive = open_docx_archive(&self.bytes)?;
        extract_images(&mut archive)
    }
}
