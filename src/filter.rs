//! Heading style queries and exclusion maps over a finished conversion
//!
//! Downstream filtering works per style: how many navigation entries each
//! heading style produced, where they are, at which level, and which styles
//! the user wants folded away.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::HeadingFilterConfig;
use crate::topics::TopicDocument;

/// Level -> excluded style names at that level
pub type ExclusionMap = BTreeMap<u8, BTreeSet<String>>;

/// One navigation entry produced by a style
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingOccurrence {
    pub title: String,
    pub href: String,
}

/// Style -> number of navigation entries it produced
pub fn heading_counts(doc: &TopicDocument) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for style in doc.entries().iter().filter_map(|entry| entry.style.as_ref()) {
        *counts.entry(style.clone()).or_insert(0) += 1;
    }
    counts
}

/// Style -> entries it produced, in document order
pub fn heading_occurrences(doc: &TopicDocument) -> BTreeMap<String, Vec<HeadingOccurrence>> {
    let mut occurrences: BTreeMap<String, Vec<HeadingOccurrence>> = BTreeMap::new();
    for entry in doc.entries() {
        if let Some(style) = &entry.style {
            occurrences
                .entry(style.clone())
                .or_default()
                .push(HeadingOccurrence {
                    title: entry.title.clone(),
                    href: entry.href.clone(),
                });
        }
    }
    occurrences
}

/// Style -> heading level; the shallowest level wins if a style appears at several
pub fn style_levels(doc: &TopicDocument) -> BTreeMap<String, u8> {
    let mut levels: BTreeMap<String, u8> = BTreeMap::new();
    for entry in doc.entries() {
        if let Some(style) = &entry.style {
            levels
                .entry(style.clone())
                .and_modify(|level| *level = (*level).min(entry.level))
                .or_insert(entry.level);
        }
    }
    levels
}

/// Style filtering driven by the `heading_filter` configuration group
#[derive(Debug, Clone)]
pub struct HeadingFilter<'a> {
    config: &'a HeadingFilterConfig,
}

impl<'a> HeadingFilter<'a> {
    pub fn new(config: &'a HeadingFilterConfig) -> Self {
        Self { config }
    }

    /// Group excluded styles by their detected level
    ///
    /// Configured default exclusions apply unless `exclusions` explicitly
    /// sets that style to `false`. Styles with no known level are skipped.
    pub fn build_exclusion_map(
        &self,
        exclusions: &BTreeMap<String, bool>,
        style_levels: &BTreeMap<String, u8>,
    ) -> ExclusionMap {
        let mut excluded: BTreeSet<&str> = self
            .config
            .default_exclusions
            .iter()
            .map(String::as_str)
            .collect();
        for (style, flag) in exclusions {
            if *flag {
                excluded.insert(style.as_str());
            } else {
                excluded.remove(style.as_str());
            }
        }

        let mut map = ExclusionMap::new();
        for style in excluded {
            match style_levels.get(style) {
                Some(level) => {
                    map.entry(*level).or_default().insert(style.to_string());
                }
                None => log::warn!("Excluded style '{style}' has no detected level, skipping"),
            }
        }
        map
    }

    /// Most frequent heading styles, capped at `max_active_styles`
    pub fn active_styles(&self, doc: &TopicDocument) -> Vec<(String, usize)> {
        let levels = style_levels(doc);
        let mut counts: Vec<(String, usize)> = heading_counts(doc).into_iter().collect();
        counts.sort_by(|(a_style, a_count), (b_style, b_count)| {
            b_count
                .cmp(a_count)
                .then_with(|| levels.get(a_style).cmp(&levels.get(b_style)))
                .then_with(|| a_style.cmp(b_style))
        });
        counts.truncate(self.config.max_active_styles);
        counts
    }
}
