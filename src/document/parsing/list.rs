//! List detection
//!
//! A paragraph becomes a list item when Word numbering is attached to it
//! (`w:numPr`) or when it carries one of the built-in list styles.

use super::formatting::extract_numbering_info;
use super::numbering::NumberingCatalog;

/// Internal structure for tracking Word list information
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListInfo {
    pub(crate) level: u8,
    pub(crate) is_ordered: bool,
}

/// Detect list properties from paragraph numbering metadata or style name
pub(crate) fn detect_list_item(
    para: &docx_rs::Paragraph,
    style_name: Option<&str>,
    numbering: &NumberingCatalog,
) -> Option<ListInfo> {
    if let Some((num_id, level)) = para
        .property
        .numbering_property
        .as_ref()
        .and_then(extract_numbering_info)
    {
        // numId 0 explicitly removes numbering inherited from the style
        if num_id == 0 {
            return None;
        }
        return Some(ListInfo {
            level,
            is_ordered: numbering.is_ordered(num_id, level),
        });
    }

    style_name.and_then(list_style_info)
}

/// Built-in list styles: "List Bullet", "List Number 2", ...
pub(crate) fn list_style_info(style_name: &str) -> Option<ListInfo> {
    let lower = style_name.to_lowercase();
    let (is_ordered, rest) = if let Some(rest) = lower.strip_prefix("list bullet") {
        (false, rest)
    } else if let Some(rest) = lower.strip_prefix("list number") {
        (true, rest)
    } else {
        return None;
    };

    let level = match rest.trim() {
        "" => 0,
        digits => digits.parse::<u8>().ok()?.saturating_sub(1),
    };

    Some(ListInfo { level, is_ordered })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_styles() {
        assert_eq!(
            list_style_info("List Bullet"),
            Some(ListInfo {
                level: 0,
                is_ordered: false
            })
        );
        assert_eq!(
            list_style_info("List Number 3"),
            Some(ListInfo {
                level: 2,
                is_ordered: true
            })
        );
        assert_eq!(list_style_info("List Paragraph"), None);
        assert_eq!(list_style_info("List Bullet X"), None);
    }

    #[test]
    fn test_numbering_property_wins_over_style() {
        let para = docx_rs::Paragraph::new()
            .add_run(docx_rs::Run::new().add_text("item"))
            .numbering(docx_rs::NumberingId::new(7), docx_rs::IndentLevel::new(1));
        let info = detect_list_item(&para, Some("List Bullet"), &NumberingCatalog::default());
        assert_eq!(
            info,
            Some(ListInfo {
                level: 1,
                is_ordered: true
            })
        );
    }

    #[test]
    fn test_plain_paragraph_is_not_a_list() {
        let para = docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("text"));
        assert_eq!(detect_list_item(&para, Some("Normal"), &NumberingCatalog::default()), None);
    }
}
