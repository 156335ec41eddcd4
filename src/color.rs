//! Color token classification seam
//!
//! The renderer only needs "token in, output class out". [`ColorRules`]
//! provides the table-driven lookup; callers with their own heuristic plug
//! in through [`ColorClassifier`].

use crate::config::ColorRules;

pub trait ColorClassifier {
    /// Output class for a run color token, `None` to leave the run unstyled
    fn classify(&self, token: &str) -> Option<String>;
}

impl ColorClassifier for ColorRules {
    fn classify(&self, token: &str) -> Option<String> {
        if token.is_empty() {
            return None;
        }

        if let Some(theme_name) = token.strip_prefix("theme-") {
            return self.theme_map.get(theme_name).cloned();
        }
        if token.starts_with("background-") {
            return self.color_mappings.get(token).cloned();
        }

        // Word stores bare hex; mappings are keyed with a leading '#'
        let lower = token.to_lowercase();
        let hashed = if lower.starts_with('#') {
            lower
        } else {
            format!("#{lower}")
        };
        self.color_mappings
            .get(&hashed)
            .or_else(|| self.color_mappings.get(hashed.trim_start_matches('#')))
            .cloned()
    }
}

impl<F> ColorClassifier for F
where
    F: Fn(&str) -> Option<String>,
{
    fn classify(&self, token: &str) -> Option<String> {
        self(token)
    }
}
