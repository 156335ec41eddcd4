//! Structural tree to topics and navigation entries

use std::collections::BTreeMap;

use super::numbering::HeadingCounters;
use super::render::{ContentRenderer, RenderedBody};
use super::{NavEntry, Topic};
use crate::analysis::{Role, StructuralNode};
use crate::document::{BlockItem, ImageRegistry};

/// Topic filenames land under this directory, relative to the map
pub const TOPICS_DIR: &str = "topics";

/// Everything the generator produces for one document
#[derive(Debug, Default)]
pub struct GeneratedTopics {
    pub topics: BTreeMap<String, Topic>,
    pub nav: Vec<NavEntry>,
    /// Output filename -> bytes for every image a topic embeds
    pub images: BTreeMap<String, Vec<u8>>,
}

impl GeneratedTopics {
    fn record_images(&mut self, body: &RenderedBody, registry: &ImageRegistry) {
        for relationship_id in &body.images {
            if let Some(image) = registry.get(relationship_id) {
                self.images
                    .entry(image.filename.clone())
                    .or_insert_with(|| image.bytes.clone());
            }
        }
    }
}

pub struct TopicGenerator<'a> {
    renderer: &'a ContentRenderer<'a>,
    registry: &'a ImageRegistry,
    revision_date: String,
}

impl<'a> TopicGenerator<'a> {
    pub fn new(
        renderer: &'a ContentRenderer<'a>,
        registry: &'a ImageRegistry,
        revision_date: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            registry,
            revision_date: revision_date.into(),
        }
    }

    /// One topic and one navigation entry per heading node, pre-order
    ///
    /// The root is not emitted. Content it owns (text before the first
    /// heading) opens the body of the first topic.
    pub fn generate(&self, root: &StructuralNode, counters: &mut HeadingCounters) -> GeneratedTopics {
        let mut output = GeneratedTopics::default();
        let mut preamble = Some(self.renderer.render(&root.content)).filter(|body| !body.is_empty());

        for child in &root.children {
            let entry = self.visit(child, counters, &mut preamble, &mut output);
            output.nav.push(entry);
        }

        if let Some(body) = preamble {
            log::debug!("No heading to host {} bytes of preamble", body.markup.len());
        }

        log::info!(
            "Generated {} topics, {} top-level navigation entries",
            output.topics.len(),
            output.nav.len()
        );
        output
    }

    fn visit(
        &self,
        node: &StructuralNode,
        counters: &mut HeadingCounters,
        preamble: &mut Option<RenderedBody>,
        output: &mut GeneratedTopics,
    ) -> NavEntry {
        let number = counters.next(node.level);
        let toc_index = output.topics.len() + 1;

        let mut body = preamble.take().unwrap_or_default();
        match node.role {
            Role::ContentUnit => body.append(self.renderer.render(&node.content)),
            Role::Container => log::debug!("Container topic '{}' has no own content", node.title),
        }

        let mut entry = self.emit(&node.title, node.level, node.role, body, toc_index, output);
        entry.number = number;
        entry.style = node.style.clone();

        for child in &node.children {
            let child_entry = self.visit(child, counters, preamble, output);
            entry.children.push(child_entry);
        }

        entry
    }

    /// The single topic used when a document produced no topics at all
    pub fn generate_single(&self, title: &str, blocks: &[BlockItem]) -> GeneratedTopics {
        let mut output = GeneratedTopics::default();
        let body = self.renderer.render(blocks);
        let mut entry = self.emit(title, 1, Role::ContentUnit, body, 1, &mut output);
        entry.number = "1".to_string();
        output.nav.push(entry);
        output
    }

    fn emit(
        &self,
        title: &str,
        level: u8,
        role: Role,
        body: RenderedBody,
        toc_index: usize,
        output: &mut GeneratedTopics,
    ) -> NavEntry {
        let id = unique_topic_id(&output.topics);
        let filename = format!("{id}.dita");
        output.record_images(&body, self.registry);

        let topic = Topic {
            id,
            filename: filename.clone(),
            title: title.to_string(),
            level,
            role,
            revision_date: self.revision_date.clone(),
            body: body.markup,
        };
        log::debug!("Topic {} (L{level}, {role:?}): '{title}'", topic.filename);
        output.topics.insert(filename.clone(), topic);

        NavEntry {
            href: format!("{TOPICS_DIR}/{filename}"),
            filename,
            level,
            title: title.to_string(),
            number: String::new(),
            toc_index,
            created: self.revision_date.clone(),
            revised: self.revision_date.clone(),
            foldout: false,
            tdm: false,
            style: None,
            children: Vec::new(),
        }
    }
}

/// `topic_` plus ten hex characters of a v4 uuid
fn unique_topic_id(existing: &BTreeMap<String, Topic>) -> String {
    loop {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        let id = format!("topic_{}", &hex[..10]);
        if !existing.contains_key(&format!("{id}.dita")) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{build, resolve_roles, StyleLevelMap};
    use crate::config::ColorRules;
    use crate::document::Paragraph;

    fn heading(level: u8, text: &str) -> BlockItem {
        BlockItem::Paragraph(Paragraph::new(text).with_style(format!("Heading {level}")))
    }

    fn body(text: &str) -> BlockItem {
        BlockItem::Paragraph(Paragraph::new(text))
    }

    fn generate(blocks: Vec<BlockItem>) -> GeneratedTopics {
        let styles: StyleLevelMap = (1..=3).map(|l| (format!("Heading {l}"), l)).collect();
        let mut root = build(blocks, &styles);
        resolve_roles(&mut root);

        let images = ImageRegistry::new();
        let colors = ColorRules::default();
        let renderer = ContentRenderer::new(&images, &colors);
        TopicGenerator::new(&renderer, &images, "2024-05-01")
            .generate(&root, &mut HeadingCounters::new())
    }

    fn topic<'a>(output: &'a GeneratedTopics, entry: &NavEntry) -> &'a Topic {
        &output.topics[&entry.filename]
    }

    #[test]
    fn test_nav_tree_mirrors_headings() {
        let output = generate(vec![
            heading(1, "Intro"),
            body("intro text"),
            heading(2, "Scope"),
            heading(2, "Terms"),
            heading(1, "Usage"),
        ]);

        assert_eq!(output.topics.len(), 4);
        assert_eq!(output.nav.len(), 2);

        let intro = &output.nav[0];
        assert_eq!(intro.number, "1");
        assert_eq!(intro.toc_index, 1);
        assert_eq!(intro.style.as_deref(), Some("Heading 1"));
        assert_eq!(intro.href, format!("topics/{}", intro.filename));
        assert_eq!(intro.children.len(), 2);
        assert_eq!(intro.children[1].number, "1.2");
        assert_eq!(intro.children[1].toc_index, 3);
        assert_eq!(output.nav[1].number, "2");
        assert_eq!(output.nav[1].toc_index, 4);
        assert_eq!(intro.created, "2024-05-01");
        assert!(!intro.foldout && !intro.tdm);
    }

    #[test]
    fn test_container_gets_empty_topic() {
        let output = generate(vec![heading(1, "Part"), heading(2, "Chapter"), body("text")]);

        let part = &output.nav[0];
        assert_eq!(topic(&output, part).role, Role::Container);
        assert!(topic(&output, part).body.is_empty());
        assert_eq!(topic(&output, &part.children[0]).body, "<p>text</p>\n");
    }

    #[test]
    fn test_preamble_opens_first_topic() {
        let output = generate(vec![body("before"), heading(1, "Part"), heading(2, "Chapter")]);

        let part = &output.nav[0];
        assert_eq!(topic(&output, part).body, "<p>before</p>\n");
        assert!(topic(&output, &part.children[0]).body.is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_well_formed() {
        let blocks = (0..30).map(|i| heading(1, &format!("H{i}"))).collect();
        let output = generate(blocks);

        assert_eq!(output.topics.len(), 30);
        for (filename, topic) in &output.topics {
            assert_eq!(filename, &format!("{}.dita", topic.id));
            assert!(topic.id.starts_with("topic_"));
            assert_eq!(topic.id.len(), "topic_".len() + 10);
        }
    }

    #[test]
    fn test_generate_single() {
        let images = ImageRegistry::new();
        let colors = ColorRules::default();
        let renderer = ContentRenderer::new(&images, &colors);
        let output = TopicGenerator::new(&renderer, &images, "2024-05-01")
            .generate_single("report", &[body("a"), body("b")]);

        assert_eq!(output.nav.len(), 1);
        assert_eq!(output.nav[0].level, 1);
        assert_eq!(output.nav[0].title, "report");
        let single = topic(&output, &output.nav[0]);
        assert_eq!(single.body, "<p>a</p>\n<p>b</p>\n");
    }
}
