//! Block item to DITA body markup
//!
//! Paragraph runs keep their character formatting, colors go through the
//! [`ColorClassifier`] seam, consecutive list items share one list element
//! and images resolve through the [`ImageRegistry`].

use quick_xml::escape::escape;
use std::collections::BTreeSet;

use crate::color::ColorClassifier;
use crate::document::{
    BlockItem, FormattedRun, ImageRef, ImageRegistry, ListItem, Paragraph, TableCell, TableData,
};

/// Media href prefix, relative to a topic file
pub const MEDIA_HREF_PREFIX: &str = "../media/";

/// Rendered body plus the image relationship ids it actually embeds
#[derive(Debug, Clone, Default)]
pub struct RenderedBody {
    pub markup: String,
    pub images: BTreeSet<String>,
}

impl RenderedBody {
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }

    pub fn append(&mut self, other: RenderedBody) {
        self.markup.push_str(&other.markup);
        self.images.extend(other.images);
    }
}

pub struct ContentRenderer<'a> {
    images: &'a ImageRegistry,
    colors: &'a dyn ColorClassifier,
}

impl<'a> ContentRenderer<'a> {
    pub fn new(images: &'a ImageRegistry, colors: &'a dyn ColorClassifier) -> Self {
        Self { images, colors }
    }

    /// Render items in order into a topic body
    pub fn render(&self, items: &[BlockItem]) -> RenderedBody {
        let mut body = RenderedBody::default();
        let mut index = 0;

        while index < items.len() {
            match &items[index] {
                BlockItem::ListItem(_) => {
                    let group: Vec<&ListItem> = items[index..]
                        .iter()
                        .map_while(|item| match item {
                            BlockItem::ListItem(list_item) => Some(list_item),
                            _ => None,
                        })
                        .collect();
                    index += group.len();
                    self.write_list(&mut body, &group);
                }
                BlockItem::Paragraph(para) => {
                    self.write_paragraph(&mut body, para);
                    index += 1;
                }
                BlockItem::Table(table) => {
                    self.write_table(&mut body, table);
                    index += 1;
                }
                BlockItem::Image(image) => {
                    self.write_figure(&mut body, image);
                    index += 1;
                }
            }
        }

        body
    }

    fn write_paragraph(&self, body: &mut RenderedBody, para: &Paragraph) {
        let mut inner = self.render_runs(&para.runs);
        inner.push_str(&self.inline_images(body, &para.image_refs));

        if inner.trim().is_empty() {
            return;
        }
        body.markup.push_str(&format!("<p>{inner}</p>\n"));
    }

    /// Nested lists: deeper items attach to the preceding item, a change of
    /// kind at the same depth starts a new list element
    fn write_list(&self, body: &mut RenderedBody, items: &[&ListItem]) {
        let Some(level) = items.iter().map(|item| item.level).min() else {
            return;
        };

        let mut index = 0;
        while index < items.len() {
            let ordered = items[index].ordered;
            let tag = if ordered { "ol" } else { "ul" };
            body.markup.push_str(&format!("<{tag}>\n"));

            while index < items.len() && items[index].ordered == ordered {
                body.markup.push_str("<li>");
                body.markup.push_str(&self.render_runs(&items[index].runs));
                index += 1;

                let nested_start = index;
                while index < items.len() && items[index].level > level {
                    index += 1;
                }
                if nested_start < index {
                    body.markup.push('\n');
                    self.write_list(body, &items[nested_start..index]);
                }
                body.markup.push_str("</li>\n");
            }

            body.markup.push_str(&format!("</{tag}>\n"));
        }
    }

    fn write_table(&self, body: &mut RenderedBody, table: &TableData) {
        if table.rows.is_empty() {
            return;
        }

        let cols = table.column_count().max(1);
        body.markup.push_str(&format!("<table>\n<tgroup cols=\"{cols}\">\n"));

        let (header, rows) = match table.rows.split_first() {
            Some((first, rest)) if table.has_header && !rest.is_empty() => (Some(first), rest),
            _ => (None, table.rows.as_slice()),
        };

        if let Some(header) = header {
            body.markup.push_str("<thead>\n");
            self.write_row(body, header);
            body.markup.push_str("</thead>\n");
        }

        body.markup.push_str("<tbody>\n");
        for row in rows {
            self.write_row(body, row);
        }
        body.markup.push_str("</tbody>\n</tgroup>\n</table>\n");
    }

    fn write_row(&self, body: &mut RenderedBody, row: &[TableCell]) {
        body.markup.push_str("<row>");
        for cell in row {
            let mut content = if cell.runs.is_empty() {
                escape(cell.content.as_str()).into_owned()
            } else {
                self.render_runs(&cell.runs)
            };
            content.push_str(&self.inline_images(body, &cell.image_refs));
            body.markup.push_str(&format!("<entry>{content}</entry>"));
        }
        body.markup.push_str("</row>\n");
    }

    fn write_figure(&self, body: &mut RenderedBody, image: &ImageRef) {
        let Some(href) = self.image_href(&image.relationship_id) else {
            return;
        };

        body.markup.push_str(&format!("<fig>\n<image href=\"{}\">", escape(href.as_str())));
        if let Some(description) = image.description.as_deref().filter(|d| !d.is_empty()) {
            body.markup.push_str(&format!("<alt>{}</alt>", escape(description)));
        }
        body.markup.push_str("</image>\n</fig>\n");
        body.images.insert(image.relationship_id.clone());
    }

    /// Break-placed images for the registered ids; unknown ids are dropped
    fn inline_images(&self, body: &mut RenderedBody, relationship_ids: &[String]) -> String {
        let mut markup = String::new();
        for relationship_id in relationship_ids {
            if let Some(href) = self.image_href(relationship_id) {
                markup.push_str(&format!(
                    r#"<image href="{}" placement="break"/>"#,
                    escape(href.as_str())
                ));
                body.images.insert(relationship_id.clone());
            }
        }
        markup
    }

    fn image_href(&self, relationship_id: &str) -> Option<String> {
        match self.images.get(relationship_id) {
            Some(image) => Some(format!("{MEDIA_HREF_PREFIX}{}", image.filename)),
            None => {
                log::debug!("Skipping image '{relationship_id}': not in the image registry");
                None
            }
        }
    }

    fn render_runs(&self, runs: &[FormattedRun]) -> String {
        runs.iter().map(|run| self.render_run(run)).collect()
    }

    fn render_run(&self, run: &FormattedRun) -> String {
        if run.text.is_empty() {
            return String::new();
        }

        let mut markup = escape(run.text.as_str()).into_owned();
        let formatting = &run.formatting;

        if formatting.strikethrough {
            markup = format!("<line-through>{markup}</line-through>");
        }
        if formatting.underline {
            markup = format!("<u>{markup}</u>");
        }
        if formatting.italic {
            markup = format!("<i>{markup}</i>");
        }
        if formatting.bold {
            markup = format!("<b>{markup}</b>");
        }
        if let Some(class) = formatting
            .color
            .as_deref()
            .and_then(|token| self.colors.classify(token))
        {
            markup = format!(r#"<ph outputclass="{}">{markup}</ph>"#, escape(class.as_str()));
        }

        markup
    }
}
