//! Style catalog parsing (word/styles.xml)
//!
//! Extracts the declared paragraph styles with their display names and any
//! explicit outline level. Body paragraphs reference styles by id, so the
//! catalog also provides the id to display-name lookup.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

use super::super::models::StyleDefinition;
use crate::error::Result;

#[derive(Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    paragraph: bool,
    outline_level: Option<i32>,
}

impl StyleBuilder {
    fn build(self) -> Option<StyleDefinition> {
        if !self.paragraph {
            return None;
        }
        let id = self.id?;
        Some(StyleDefinition {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            outline_level: self.outline_level,
        })
    }
}

/// Parse the paragraph styles declared in `word/styles.xml`
pub(crate) fn parse_paragraph_styles(xml: &[u8]) -> Result<Vec<StyleDefinition>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut styles = Vec::new();
    let mut buf = Vec::new();
    let mut current: Option<StyleBuilder> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(ref e) if e.local_name().as_ref() == b"style" => {
                // A self-closing style has neither name nor properties
                if let Some(style) = style_builder(e).build() {
                    styles.push(style);
                }
            }
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"style" => current = Some(style_builder(e)),
                b"name" => {
                    if let Some(style) = current.as_mut() {
                        style.name = get_attr(e, b"val");
                    }
                }
                b"outlineLvl" => {
                    if let Some(style) = current.as_mut() {
                        // Unparsable levels count as absent
                        style.outline_level = get_attr(e, b"val").and_then(|v| v.parse().ok());
                    }
                }
                _ => {}
            },
            Event::End(ref e) if e.local_name().as_ref() == b"style" => {
                if let Some(style) = current.take().and_then(StyleBuilder::build) {
                    styles.push(style);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(styles)
}

fn style_builder(e: &BytesStart) -> StyleBuilder {
    StyleBuilder {
        id: get_attr(e, b"styleId"),
        paragraph: get_attr(e, b"type").as_deref() == Some("paragraph"),
        ..Default::default()
    }
}

/// Map style ids to display names
pub(crate) fn style_names_by_id(styles: &[StyleDefinition]) -> HashMap<String, String> {
    styles
        .iter()
        .map(|style| (style.id.clone(), style.name.clone()))
        .collect()
}

/// Attribute value by local name, ignoring the namespace prefix
pub(crate) fn get_attr(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
