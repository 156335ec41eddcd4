//! Topic output model and DITA serialization
//!
//! A [`TopicDocument`] is the result of one conversion: concept topics keyed
//! by filename, a navigation tree that becomes the ditamap, and the image
//! bytes the topics reference.

pub mod generator;
pub mod numbering;
pub mod render;

use quick_xml::escape::escape;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analysis::Role;
use crate::metadata::RunMetadata;

pub use generator::{GeneratedTopics, TopicGenerator, TOPICS_DIR};
pub use numbering::HeadingCounters;
pub use render::{ContentRenderer, RenderedBody, MEDIA_HREF_PREFIX};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const CONCEPT_DOCTYPE: &str =
    r#"<!DOCTYPE concept PUBLIC "-//OASIS//DTD DITA Concept//EN" "concept.dtd">"#;
const MAP_DOCTYPE: &str = r#"<!DOCTYPE map PUBLIC "-//OASIS//DTD DITA Map//EN" "map.dtd">"#;

/// One concept topic
#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub id: String,
    pub filename: String,
    pub title: String,
    pub level: u8,
    pub role: Role,
    pub revision_date: String,
    /// Rendered `conbody` content
    pub body: String,
}

impl Topic {
    pub fn to_xml(&self) -> String {
        let date = escape(self.revision_date.as_str());
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(CONCEPT_DOCTYPE);
        xml.push('\n');
        xml.push_str(&format!(r#"<concept id="{}">"#, escape(self.id.as_str())));
        xml.push('\n');
        xml.push_str(&format!("<title>{}</title>\n", escape(self.title.as_str())));
        xml.push_str(&format!(
            "<prolog>\n<critdates>\n<created date=\"{date}\"/>\n<revised modified=\"{date}\"/>\n</critdates>\n</prolog>\n"
        ));
        if self.body.is_empty() {
            xml.push_str("<conbody/>\n");
        } else {
            xml.push_str("<conbody>\n");
            xml.push_str(&self.body);
            xml.push_str("</conbody>\n");
        }
        xml.push_str("</concept>\n");
        xml
    }
}

/// One `topicref` of the navigation tree
#[derive(Debug, Clone, Serialize)]
pub struct NavEntry {
    /// `topics/<filename>`
    pub href: String,
    pub filename: String,
    /// Heading level, written as `data-level`
    pub level: u8,
    pub title: String,
    /// Hierarchical heading number, e.g. "2.1"
    pub number: String,
    /// 1-based position in pre-order
    pub toc_index: usize,
    pub created: String,
    pub revised: String,
    pub foldout: bool,
    pub tdm: bool,
    /// Source paragraph style, written as `data-style`
    pub style: Option<String>,
    pub children: Vec<NavEntry>,
}

impl NavEntry {
    /// This entry and all of its descendants, pre-order
    pub fn walk(&self) -> Vec<&NavEntry> {
        let mut entries = vec![self];
        for child in &self.children {
            entries.extend(child.walk());
        }
        entries
    }

    fn write_xml(&self, xml: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        xml.push_str(&format!(
            r#"{indent}<topicref href="{}" locktitle="yes" data-level="{}""#,
            escape(self.href.as_str()),
            self.level
        ));
        if !self.number.is_empty() {
            xml.push_str(&format!(r#" data-number="{}""#, escape(self.number.as_str())));
        }
        if let Some(style) = &self.style {
            xml.push_str(&format!(r#" data-style="{}""#, escape(style.as_str())));
        }
        xml.push_str(">\n");

        xml.push_str(&format!("{indent}  <topicmeta>\n"));
        xml.push_str(&format!(
            "{indent}    <navtitle>{}</navtitle>\n",
            escape(self.title.as_str())
        ));
        xml.push_str(&format!(
            "{indent}    <critdates><created date=\"{}\"/><revised modified=\"{}\"/></critdates>\n",
            escape(self.created.as_str()),
            escape(self.revised.as_str())
        ));
        for (name, content) in [
            ("tocIndex", self.toc_index.to_string()),
            ("foldout", self.foldout.to_string()),
            ("tdm", self.tdm.to_string()),
        ] {
            xml.push_str(&format!(
                "{indent}    <othermeta name=\"{name}\" content=\"{content}\"/>\n"
            ));
        }
        xml.push_str(&format!("{indent}  </topicmeta>\n"));

        for child in &self.children {
            child.write_xml(xml, depth + 1);
        }
        xml.push_str(&format!("{indent}</topicref>\n"));
    }
}

/// The complete result of one conversion run
#[derive(Debug, Clone, Serialize)]
pub struct TopicDocument {
    pub title: String,
    pub metadata: RunMetadata,
    pub revision_date: String,
    /// Filename -> topic
    pub topics: BTreeMap<String, Topic>,
    /// Top-level navigation entries
    pub nav: Vec<NavEntry>,
    /// Output filename -> image bytes, to be written under `media/`
    #[serde(skip)]
    pub images: BTreeMap<String, Vec<u8>>,
}

impl TopicDocument {
    pub fn new(metadata: RunMetadata, generated: GeneratedTopics) -> Self {
        Self {
            title: metadata.map_title().to_string(),
            revision_date: metadata.resolved_revision_date(),
            metadata,
            topics: generated.topics,
            nav: generated.nav,
            images: generated.images,
        }
    }

    /// Every navigation entry, pre-order
    pub fn entries(&self) -> Vec<&NavEntry> {
        self.nav.iter().flat_map(NavEntry::walk).collect()
    }

    pub fn topic_for(&self, entry: &NavEntry) -> Option<&Topic> {
        self.topics.get(&entry.filename)
    }

    /// The ditamap
    pub fn map_xml(&self) -> String {
        let date = escape(self.revision_date.as_str());
        let mut xml = String::new();
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(MAP_DOCTYPE);
        xml.push('\n');
        xml.push_str("<map xml:lang=\"en-US\">\n");
        xml.push_str(&format!("  <title>{}</title>\n", escape(self.title.as_str())));

        xml.push_str("  <topicmeta>\n");
        xml.push_str(&format!(
            "    <critdates><created date=\"{date}\"/><revised modified=\"{date}\"/></critdates>\n"
        ));
        for (name, value) in [
            ("manual_code", &self.metadata.manual_code),
            ("manual_reference", &self.metadata.manual_reference),
            ("revision_number", &self.metadata.revision_number),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                xml.push_str(&format!(
                    "    <othermeta name=\"{name}\" content=\"{}\"/>\n",
                    escape(value)
                ));
            }
        }
        xml.push_str("  </topicmeta>\n");

        for entry in &self.nav {
            entry.write_xml(&mut xml, 1);
        }
        xml.push_str("</map>\n");
        xml
    }
}
