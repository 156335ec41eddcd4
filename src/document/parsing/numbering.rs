//! Numbering definitions (word/numbering.xml)
//!
//! Word lists reference a `numId` and an indentation level; whether the
//! entry is bulleted or numbered lives in the abstract definition behind
//! that id. This module resolves that indirection once per document.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

use super::styles::get_attr;
use crate::error::Result;

/// Resolved list formats keyed by (numId, level)
#[derive(Debug, Default, Clone)]
pub(crate) struct NumberingCatalog {
    /// abstractNumId -> level -> numFmt
    abstract_formats: HashMap<String, HashMap<u8, String>>,
    /// numId -> abstractNumId
    instances: HashMap<i32, String>,
}

impl NumberingCatalog {
    pub(crate) fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut catalog = NumberingCatalog::default();
        let mut buf = Vec::new();
        let mut current_abstract: Option<String> = None;
        let mut current_level: Option<u8> = None;
        let mut current_num: Option<i32> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"abstractNum" => current_abstract = get_attr(e, b"abstractNumId"),
                    b"lvl" => current_level = get_attr(e, b"ilvl").and_then(|v| v.parse().ok()),
                    b"numFmt" => {
                        if let (Some(abstract_id), Some(level), Some(format)) =
                            (&current_abstract, current_level, get_attr(e, b"val"))
                        {
                            catalog
                                .abstract_formats
                                .entry(abstract_id.clone())
                                .or_default()
                                .insert(level, format);
                        }
                    }
                    b"num" => current_num = get_attr(e, b"numId").and_then(|v| v.parse().ok()),
                    b"abstractNumId" => {
                        if let (Some(num_id), Some(abstract_id)) =
                            (current_num, get_attr(e, b"val"))
                        {
                            catalog.instances.insert(num_id, abstract_id);
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"abstractNum" => current_abstract = None,
                    b"lvl" => current_level = None,
                    b"num" => current_num = None,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(catalog)
    }

    /// Whether entries at this numId/level are numbered rather than bulleted
    pub(crate) fn is_ordered(&self, num_id: i32, level: u8) -> bool {
        let format = self
            .instances
            .get(&num_id)
            .and_then(|abstract_id| self.abstract_formats.get(abstract_id))
            .and_then(|levels| levels.get(&level));

        match format.map(String::as_str) {
            Some("bullet") | Some("none") => false,
            Some(_) => true,
            // Unknown definitions are typically numbered
            None => true,
        }
    }
}
