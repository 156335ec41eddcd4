use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, Start, Style, StyleType, Table, TableCell, TableRow,
};
use docx_topics::{convert_docx, ConversionError, ConverterConfig, Milestone, RunMetadata};
use std::cell::RefCell;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

const ORDERED_LIST: usize = 10;
const BULLET_LIST: usize = 11;

fn text(style: Option<&str>, content: &str) -> Paragraph {
    let para = Paragraph::new().add_run(Run::new().add_text(content));
    match style {
        Some(style) => para.style(style),
        None => para,
    }
}

fn list_entry(num_id: usize, content: &str) -> Paragraph {
    text(None, content).numbering(NumberingId::new(num_id), IndentLevel::new(0))
}

fn cell(content: &str) -> TableCell {
    TableCell::new().add_paragraph(text(None, content))
}

fn manual_docx() -> Docx {
    let ordered = AbstractNumbering::new(ORDERED_LIST).add_level(Level::new(
        0,
        Start::new(1),
        NumberFormat::new("decimal"),
        LevelText::new("%1."),
        LevelJc::new("left"),
    ));
    let bullets = AbstractNumbering::new(BULLET_LIST).add_level(Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    ));

    let table = Table::new(vec![
        TableRow::new(vec![cell("Part"), cell("Torque")]),
        TableRow::new(vec![cell("Bolt A"), cell("12 Nm")]),
    ]);

    Docx::new()
        .add_style(Style::new("Heading1", StyleType::Paragraph).name("Heading 1"))
        .add_style(Style::new("Heading2", StyleType::Paragraph).name("Heading 2"))
        .add_style(Style::new("CorpBanner", StyleType::Paragraph).name("Corp Banner"))
        .add_abstract_numbering(ordered)
        .add_abstract_numbering(bullets)
        .add_numbering(Numbering::new(ORDERED_LIST, ORDERED_LIST))
        .add_numbering(Numbering::new(BULLET_LIST, BULLET_LIST))
        .add_paragraph(text(None, "Issued for field use"))
        .add_paragraph(text(Some("Heading1"), "Overview"))
        .add_paragraph(text(None, "Read this first."))
        .add_paragraph(list_entry(BULLET_LIST, "Gloves"))
        .add_paragraph(list_entry(BULLET_LIST, "Goggles"))
        .add_paragraph(list_entry(ORDERED_LIST, "Power off"))
        .add_paragraph(text(Some("Heading2"), "Torque values"))
        .add_table(table)
        .add_paragraph(text(Some("Heading1"), "Appendix"))
        .add_paragraph(text(Some("CorpBanner"), "Revision notes"))
}

fn write_docx(dir: &Path, name: &str, docx: Docx) -> PathBuf {
    let mut buffer = Vec::new();
    docx.build().pack(&mut Cursor::new(&mut buffer)).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, buffer).unwrap();
    path
}

#[cfg(test)]
mod docx_conversion_tests {
    use super::*;

    #[test]
    fn test_converts_headings_lists_and_tables() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), "manual.docx", manual_docx());

        let metadata = RunMetadata::default()
            .with_title("Service Manual")
            .with_revision_date("2024-05-01");
        let doc = convert_docx(&path, &metadata, &ConverterConfig::default(), None).unwrap();

        let titles: Vec<&str> = doc.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Overview", "Torque values", "Appendix"]);
        assert_eq!(doc.nav.len(), 2);
        assert_eq!(doc.nav[0].children[0].number, "1.1");

        let overview = doc.topic_for(&doc.nav[0]).unwrap();
        // Text ahead of the first heading opens the first topic
        assert!(overview.body.starts_with("<p>Issued for field use</p>"));
        assert!(overview.body.contains("<ul>\n<li>Gloves</li>\n<li>Goggles</li>\n</ul>"));
        assert!(overview.body.contains("<ol>\n<li>Power off</li>\n</ol>"));

        let torque = doc.topic_for(&doc.nav[0].children[0]).unwrap();
        assert!(torque.body.contains("<entry>Bolt A</entry><entry>12 Nm</entry>"));

        let appendix = doc.topic_for(&doc.nav[1]).unwrap();
        assert_eq!(appendix.body, "<p>Revision notes</p>\n");

        let map = doc.map_xml();
        assert!(map.contains("<title>Service Manual</title>"));
        assert!(map.contains(r#"data-style="Heading 2""#));
        assert!(appendix.to_xml().contains("<title>Appendix</title>"));
    }

    #[test]
    fn test_style_override_on_real_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), "manual.docx", manual_docx());
        let metadata = RunMetadata::default().with_style_override("Corp Banner", 2);

        let doc = convert_docx(&path, &metadata, &ConverterConfig::default(), None).unwrap();

        let appendix = &doc.nav[1];
        assert_eq!(appendix.children.len(), 1);
        assert_eq!(appendix.children[0].title, "Revision notes");
        assert_eq!(appendix.children[0].number, "2.1");
    }

    #[test]
    fn test_auto_numbered_headings_open_topics() {
        let chapters = AbstractNumbering::new(ORDERED_LIST).add_level(Level::new(
            0,
            Start::new(1),
            NumberFormat::new("decimal"),
            LevelText::new("%1."),
            LevelJc::new("left"),
        ));
        let numbered = |style: &str, content: &str| {
            text(Some(style), content).numbering(NumberingId::new(ORDERED_LIST), IndentLevel::new(0))
        };
        let docx = Docx::new()
            .add_style(Style::new("ChapterTitle", StyleType::Paragraph).name("Chapter Title"))
            .add_style(Style::new("Titre1", StyleType::Paragraph).name("Titre 1"))
            .add_style(Style::new("CorpStep", StyleType::Paragraph).name("Corp Step"))
            .add_abstract_numbering(chapters)
            .add_numbering(Numbering::new(ORDERED_LIST, ORDERED_LIST))
            .add_paragraph(text(Some("ChapterTitle"), "Plain chapter"))
            .add_paragraph(text(None, "Opening words."))
            .add_paragraph(numbered("ChapterTitle", "Numbered chapter"))
            .add_paragraph(numbered("CorpStep", "Promoted step"))
            .add_paragraph(numbered("Titre1", "Numbered titre"))
            .add_paragraph(list_entry(ORDERED_LIST, "Just a step"));
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), "chapters.docx", docx);

        let doc = convert_docx(&path, &RunMetadata::default(), &ConverterConfig::default(), None)
            .unwrap();
        let titles: Vec<&str> = doc.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Plain chapter", "Numbered chapter", "Numbered titre"]);
        let numbered_chapter = doc.topic_for(&doc.nav[1]).unwrap();
        assert!(numbered_chapter.body.contains("<li>Promoted step</li>"));

        // An override promotes a numbered body style in the same way
        let metadata = RunMetadata::default().with_style_override("Corp Step", 2);
        let doc = convert_docx(&path, &metadata, &ConverterConfig::default(), None).unwrap();
        let titles: Vec<&str> = doc.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Plain chapter", "Numbered chapter", "Promoted step", "Numbered titre"]
        );
        assert_eq!(doc.nav[1].children[0].number, "2.1");

        let plain = doc.topic_for(&doc.nav[0]).unwrap();
        assert_eq!(plain.body, "<p>Opening words.</p>\n");
        let last = doc.topic_for(&doc.nav[2]).unwrap();
        assert_eq!(last.body, "<ol>\n<li>Just a step</li>\n</ol>\n");
    }

    #[test]
    fn test_document_without_headings_is_titled_from_filename() {
        let dir = tempfile::tempdir().unwrap();
        let docx = Docx::new()
            .add_paragraph(text(None, "Just a memo."))
            .add_paragraph(text(None, "Nothing else."));
        let path = write_docx(dir.path(), "shift-memo.docx", docx);

        let seen = RefCell::new(Vec::new());
        let callback: &dyn Fn(Milestone) = &|milestone| seen.borrow_mut().push(milestone);
        let doc = convert_docx(
            &path,
            &RunMetadata::default(),
            &ConverterConfig::default(),
            Some(callback),
        )
        .unwrap();

        assert_eq!(doc.nav.len(), 1);
        assert_eq!(doc.nav[0].title, "shift-memo");
        assert_eq!(doc.title, "Document Title");

        let seen = seen.into_inner();
        assert_eq!(seen.first(), Some(&Milestone::Load));
        assert_eq!(seen.last(), Some(&Milestone::Finished));
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_spreadsheet_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.docx");

        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            zip.start_file("xl/workbook.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<workbook/>").unwrap();
            zip.finish().unwrap();
        }
        std::fs::write(&path, buffer).unwrap();

        let err = convert_docx(&path, &RunMetadata::default(), &ConverterConfig::default(), None)
            .unwrap_err();
        match err {
            ConversionError::InvalidFormat(message) => assert!(message.contains("Excel")),
            other => panic!("expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"PK\x03\x04 truncated").unwrap();

        let result = convert_docx(&path, &RunMetadata::default(), &ConverterConfig::default(), None);
        assert!(result.is_err());
    }
}
