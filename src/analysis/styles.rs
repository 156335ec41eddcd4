//! Heading style classification
//!
//! Decides, from style metadata alone, which paragraph styles denote
//! headings and at what level. Rules overlap and conflict, so they are kept
//! as an ordered table evaluated first-match-wins: a rule either returns a
//! verdict or passes the style on to the next one.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::document::StyleDefinition;

/// Style name -> heading level (1-9)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleLevelMap {
    levels: BTreeMap<String, u8>,
}

impl StyleLevelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, style: &str) -> Option<u8> {
        self.levels.get(style).copied()
    }

    pub fn contains(&self, style: &str) -> bool {
        self.levels.contains_key(style)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.levels.iter().map(|(name, level)| (name.as_str(), *level))
    }

    /// Merge caller overrides on top; they win over every classification rule
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, u8)>,
    {
        let mut changed = 0;
        for (style, level) in overrides {
            if !(1..=9).contains(&level) {
                log::warn!("Ignoring override for '{style}': level {level} outside 1-9");
                continue;
            }
            if self.levels.insert(style, level) != Some(level) {
                changed += 1;
            }
        }
        log::debug!("Applied {changed} user style overrides/additions");
        self
    }
}

impl FromIterator<(String, u8)> for StyleLevelMap {
    fn from_iter<T: IntoIterator<Item = (String, u8)>>(iter: T) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

/// Outcome of one classification rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Heading(u8),
    BodyText,
}

/// What the rules get to look at for one style
#[derive(Debug)]
pub struct StyleProbe<'a> {
    pub name: &'a str,
    pub lower: String,
    pub outline_level: Option<i32>,
}

impl<'a> StyleProbe<'a> {
    pub fn new(name: &'a str, outline_level: Option<i32>) -> Self {
        Self {
            name,
            lower: name.trim().to_lowercase(),
            outline_level,
        }
    }

    fn contains_any(&self, words: &[&str]) -> bool {
        words.iter().any(|word| self.lower.contains(word))
    }
}

/// One entry of the ordered rule table
pub struct ClassificationRule {
    pub reason: &'static str,
    pub apply: fn(&StyleProbe) -> Option<Verdict>,
}

// Built-in Word styles that are never headings, matched case-insensitively
const BUILTIN_NON_HEADING_STYLES: &[&str] = &[
    "Normal", "No Spacing", "Quote", "Intense Quote", "Subtle Emphasis",
    "Intense Emphasis", "Strong", "Subtle Reference", "Intense Reference",
    "Book Title", "List Paragraph", "Body Text", "Body Text 2", "Body Text 3",
    "Body Text Indent", "Body Text First Indent", "Body Text First Indent 2",
    "List", "List 2", "List 3", "List Bullet", "List Bullet 2", "List Bullet 3",
    "List Continue", "List Continue 2", "List Continue 3", "List Number",
    "List Number 2", "List Number 3", "Caption", "Figure Caption", "Table Caption",
    "Image Caption", "Footnote Text", "Footnote Reference", "Endnote Text",
    "Endnote Reference", "Bibliography", "Index 1", "Index 2", "Index 3",
    "Index 4", "Index 5", "Index 6", "Index 7", "Index 8", "Index 9",
    "TOC 1", "TOC 2", "TOC 3", "TOC 4", "TOC 5", "TOC 6", "TOC 7", "TOC 8",
    "TOC 9", "TOC Heading", "Table of Contents", "Header", "Footer", "Page Number",
    "Compact", "Plain Text", "HTML Preformatted", "Document Map", "Hyperlink",
    "FollowedHyperlink", "Macro Text", "Block Text", "Date", "Salutation",
    "Signature", "Closing", "Sans Interligne", "Texte Normal", "Citation", "Legende",
];

const STRONG_EXCLUSIONS: &[&str] = &[
    "caption", "footnote", "endnote", "toc", "bibliography", "format", "case",
    "overview", "break", "divider", "separator",
];

const MEDIUM_EXCLUSIONS: &[&str] = &["quote", "emphasis", "strong", "list", "continue", "text"];

const INTERNATIONAL_HEADINGS: &[&str] = &[
    "titre", "titulo", "uberschrift", "haupt", "sous-titre", "chapitre", "partie",
    "sous-chapitre", "sous chapitre", "sous-section", "sous section",
];

const ORGANIZATIONAL_HEADINGS: &[&str] =
    &["department head", "section header", "chapter title", "part title"];

const GENERIC_HEADINGS: &[&str] = &["title", "header"];

static BUILTIN_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Heading\s+(\d+)$").unwrap());

// "1.2 Chapitre", "2-3 Section"
static NUMERIC_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)([.\-]\d+){0,8}\b").unwrap());

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static BUILTIN_NON_HEADING_LOWER: Lazy<HashSet<String>> = Lazy::new(|| {
    BUILTIN_NON_HEADING_STYLES
        .iter()
        .map(|name| name.to_lowercase())
        .collect()
});

fn builtin_heading(probe: &StyleProbe) -> Option<Verdict> {
    let captures = BUILTIN_HEADING.captures(probe.name)?;
    let level: u8 = captures.get(1)?.as_str().parse().ok()?;
    (1..=9).contains(&level).then_some(Verdict::Heading(level))
}

fn numeric_prefix(probe: &StyleProbe) -> Option<Verdict> {
    let matched = NUMERIC_PREFIX.find(probe.name)?;
    let segments = matched
        .as_str()
        .trim_start()
        .split(['.', '-'])
        .filter(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
        .count();
    Some(Verdict::Heading(segments.clamp(1, 6) as u8))
}

fn builtin_non_heading(probe: &StyleProbe) -> Option<Verdict> {
    BUILTIN_NON_HEADING_LOWER
        .contains(&probe.lower)
        .then_some(Verdict::BodyText)
}

fn strong_exclusion(probe: &StyleProbe) -> Option<Verdict> {
    probe
        .contains_any(STRONG_EXCLUSIONS)
        .then_some(Verdict::BodyText)
}

fn medium_exclusion(probe: &StyleProbe) -> Option<Verdict> {
    probe
        .contains_any(MEDIUM_EXCLUSIONS)
        .then_some(Verdict::BodyText)
}

fn international_heading(probe: &StyleProbe) -> Option<Verdict> {
    probe
        .contains_any(INTERNATIONAL_HEADINGS)
        .then(|| Verdict::Heading(infer_level(probe.name)))
}

fn custom_heading(probe: &StyleProbe) -> Option<Verdict> {
    if !probe.lower.contains("heading") {
        return None;
    }
    // "style" outranks "text" when both are present
    if !probe.lower.contains("style") && probe.lower.contains("text") {
        return Some(Verdict::BodyText);
    }
    Some(Verdict::Heading(infer_level(probe.name)))
}

fn organizational_heading(probe: &StyleProbe) -> Option<Verdict> {
    probe
        .contains_any(ORGANIZATIONAL_HEADINGS)
        .then(|| Verdict::Heading(infer_level(probe.name)))
}

fn generic_heading(probe: &StyleProbe) -> Option<Verdict> {
    probe
        .contains_any(GENERIC_HEADINGS)
        .then(|| Verdict::Heading(infer_level(probe.name)))
}

fn explicit_outline_level(probe: &StyleProbe) -> Option<Verdict> {
    match probe.outline_level? {
        level @ 0..=8 => Some(Verdict::Heading(level as u8 + 1)),
        _ => None,
    }
}

fn conservative_default(_: &StyleProbe) -> Option<Verdict> {
    Some(Verdict::BodyText)
}

/// The classification rules, in precedence order
pub static RULES: &[ClassificationRule] = &[
    ClassificationRule { reason: "Built-in Word heading style", apply: builtin_heading },
    ClassificationRule { reason: "Numeric-leading pattern", apply: numeric_prefix },
    ClassificationRule { reason: "Known Word built-in style", apply: builtin_non_heading },
    ClassificationRule { reason: "Strong exclusion pattern", apply: strong_exclusion },
    ClassificationRule { reason: "Medium exclusion pattern", apply: medium_exclusion },
    ClassificationRule { reason: "International heading pattern", apply: international_heading },
    ClassificationRule { reason: "Custom style with 'heading' in name", apply: custom_heading },
    ClassificationRule { reason: "Organizational heading pattern", apply: organizational_heading },
    ClassificationRule { reason: "Title/header pattern", apply: generic_heading },
    ClassificationRule { reason: "Explicit outline level", apply: explicit_outline_level },
    ClassificationRule { reason: "Unknown style, conservative default", apply: conservative_default },
];

/// Run the rule table for one style; returns the verdict and the deciding rule
pub fn classify_style(probe: &StyleProbe) -> (Verdict, &'static str) {
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(probe).map(|verdict| (verdict, rule.reason)))
        .unwrap_or((Verdict::BodyText, "No rule matched"))
}

/// Infer a heading level from a style name
///
/// An embedded number in 1-9 wins; otherwise keyword tiers decide, and
/// custom headings default to level 2.
pub fn infer_level(style_name: &str) -> u8 {
    if let Some(level) = FIRST_NUMBER
        .find(style_name)
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .filter(|level| (1..=9).contains(level))
    {
        return level;
    }

    let lower = style_name.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|word| lower.contains(word));

    if has(&["title", "main", "principal", "primary"]) {
        1
    } else if has(&["subsection", "subchapter"]) {
        3
    } else {
        // section/chapter/part share the custom-heading default
        2
    }
}

/// Classify style names into a heading level map
pub fn classify(
    style_names: &BTreeSet<String>,
    outline_levels: &HashMap<String, i32>,
) -> StyleLevelMap {
    let mut levels = BTreeMap::new();

    for name in style_names.iter().filter(|name| !name.is_empty()) {
        let probe = StyleProbe::new(name, outline_levels.get(name).copied());
        match classify_style(&probe) {
            (Verdict::Heading(level), reason) => {
                log::info!("Style Classification: '{name}' -> HEADING Level {level} ({reason})");
                levels.insert(name.clone(), level);
            }
            (Verdict::BodyText, reason) => {
                log::debug!("Style Classification: '{name}' -> BODY_TEXT ({reason})");
            }
        }
    }

    log::info!(
        "Style Classification Summary: {} heading styles identified from {} paragraph styles",
        levels.len(),
        style_names.len()
    );

    StyleLevelMap { levels }
}

/// Classify a reader's style catalog
pub fn classify_catalog(styles: &[StyleDefinition]) -> StyleLevelMap {
    let names: BTreeSet<String> = styles.iter().map(|style| style.name.clone()).collect();
    let outline_levels: HashMap<String, i32> = styles
        .iter()
        .filter_map(|style| style.outline_level.map(|level| (style.name.clone(), level)))
        .collect();
    classify(&names, &outline_levels)
}
