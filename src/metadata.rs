use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-run metadata supplied by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunMetadata {
    pub manual_title: Option<String>,
    pub manual_code: Option<String>,
    pub manual_reference: Option<String>,
    /// ISO date (YYYY-MM-DD); today when absent
    pub revision_date: Option<String>,
    pub revision_number: Option<String>,
    /// Caller overrides, style name -> heading level. Entries are validated one by one.
    pub style_heading_map: Option<BTreeMap<String, serde_json::Value>>,
}

impl RunMetadata {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.manual_title = Some(title.into());
        self
    }

    pub fn with_revision_date(mut self, date: impl Into<String>) -> Self {
        self.revision_date = Some(date.into());
        self
    }

    pub fn with_style_override(mut self, style: impl Into<String>, level: i64) -> Self {
        self.style_heading_map
            .get_or_insert_with(BTreeMap::new)
            .insert(style.into(), serde_json::Value::from(level));
        self
    }

    pub fn map_title(&self) -> &str {
        self.manual_title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or("Document Title")
    }

    pub fn resolved_revision_date(&self) -> String {
        self.revision_date
            .clone()
            .filter(|date| !date.trim().is_empty())
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string())
    }

    /// Valid override entries; malformed ones are logged and skipped
    pub fn style_overrides(&self) -> Vec<(String, u8)> {
        let Some(map) = &self.style_heading_map else {
            return Vec::new();
        };

        map.iter()
            .filter_map(|(style, value)| match value.as_i64() {
                Some(level @ 1..=9) => Some((style.clone(), level as u8)),
                _ => {
                    log::warn!("Ignoring style override '{style}' -> {value}: expected a level 1-9");
                    None
                }
            })
            .collect()
    }
}
