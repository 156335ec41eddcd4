//! Run text and formatting extraction
//!
//! This module handles extraction of text, formatting and drawing
//! references from docx-rs paragraph and run elements.

use super::super::models::*;

/// Formatted runs plus image references of one paragraph
#[derive(Debug, Default)]
pub(crate) struct ParagraphContent {
    pub(crate) runs: Vec<FormattedRun>,
    pub(crate) image_refs: Vec<String>,
}

/// Extract runs and drawings from a paragraph, handling tracked insertions
pub(crate) fn extract_paragraph_content(para: &docx_rs::Paragraph) -> ParagraphContent {
    let mut content = ParagraphContent::default();

    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => collect_run(run, &mut content),
            docx_rs::ParagraphChild::Insert(insert) => {
                for child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = child {
                        collect_run(run, &mut content);
                    }
                }
            }
            docx_rs::ParagraphChild::Delete(_) => {
                // Skip deletions (track changes)
            }
            _ => {}
        }
    }

    content.runs = FormattedRun::consolidate_runs(content.runs);
    content
}

fn collect_run(run: &docx_rs::Run, content: &mut ParagraphContent) {
    let mut text = String::new();

    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text_elem) => text.push_str(&text_elem.text),
            docx_rs::RunChild::Tab(_) => text.push('\t'),
            docx_rs::RunChild::Break(_) => text.push('\n'),
            docx_rs::RunChild::Drawing(drawing) => {
                if let Some(id) = drawing_relationship(drawing) {
                    content.image_refs.push(id);
                }
            }
            _ => {}
        }
    }

    if !text.is_empty() {
        content.runs.push(FormattedRun {
            text,
            formatting: extract_run_formatting(run),
        });
    }
}

/// Embedded relationship id of a picture; text boxes carry none
pub(crate) fn drawing_relationship(drawing: &docx_rs::Drawing) -> Option<String> {
    match drawing.data.as_ref()? {
        docx_rs::DrawingData::Pic(pic) => Some(pic.id.clone()).filter(|id| !id.is_empty()),
        docx_rs::DrawingData::TextBox(_) => None,
    }
}

/// Extract formatting information from a run
pub(crate) fn extract_run_formatting(run: &docx_rs::Run) -> TextFormatting {
    let props = &run.run_property;

    TextFormatting {
        bold: props.bold.is_some(),
        italic: props.italic.is_some(),
        underline: props.underline.is_some(),
        strikethrough: props.strike.is_some() || props.dstrike.is_some(),
        color: props
            .color
            .as_ref()
            .and_then(|color| debug_field(&format!("{color:?}"), "val: \""))
            .filter(|val| val != "auto"),
    }
}

/// Direct outline level on the paragraph properties, if any
pub(crate) fn extract_outline_level(para: &docx_rs::Paragraph) -> Option<u8> {
    let level = para.property.outline_lvl.as_ref()?.v;
    u8::try_from(level).ok().filter(|level| *level <= 8)
}

/// Read a quoted field out of a debug representation
fn debug_field(debug: &str, marker: &str) -> Option<String> {
    // Safe: searching for ASCII markers in debug output
    let search_from = debug.find(marker)? + marker.len();
    let end = debug[search_from..].find('"')?;
    Some(debug[search_from..search_from + end].to_string())
}

/// Extract numbering information from docx-rs numbering properties
pub(crate) fn extract_numbering_info(num_pr: &docx_rs::NumberingProperty) -> Option<NumberingInfo> {
    let num_id = num_pr.id.as_ref()?.id as i32;
    let level = num_pr.level.as_ref().map(|l| l.val as u8).unwrap_or(0);
    Some((num_id, level))
}
