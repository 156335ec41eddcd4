//! Archive access and validation
//!
//! This module handles file validation and raw part extraction from the
//! .docx ZIP container.

use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

use crate::error::{ConversionError, Result};

pub(crate) type DocxArchive<'a> = ZipArchive<Cursor<&'a [u8]>>;

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const STYLES_PART: &str = "word/styles.xml";
pub(crate) const NUMBERING_PART: &str = "word/numbering.xml";
pub(crate) const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Validates that the path names a .docx file
pub(crate) fn validate_docx_path(file_path: &Path) -> Result<()> {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !extension.eq_ignore_ascii_case("docx") {
        return Err(ConversionError::InvalidFormat(format!(
            "Invalid file format. Expected .docx file, got .{extension}\n\
            Note: only Word .docx files are supported (not .doc, .xlsx, .zip, etc.)"
        )));
    }

    Ok(())
}

/// Opens the ZIP container and checks it holds a Word document body
pub(crate) fn open_docx_archive(bytes: &[u8]) -> Result<DocxArchive<'_>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    if archive.by_name(DOCUMENT_PART).is_err() {
        // Check if it might be an Excel file
        if archive.by_name("xl/workbook.xml").is_ok() {
            return Err(ConversionError::InvalidFormat(
                "This appears to be an Excel file (.xlsx).\n\
                Only Word documents (.docx) can be converted."
                    .to_string(),
            ));
        }

        return Err(ConversionError::InvalidFormat(format!(
            "Invalid .docx file: missing {DOCUMENT_PART}\n\
            This file may be corrupted or is not a valid Word document."
        )));
    }

    Ok(archive)
}

/// Reads one part of the archive, `None` when the part does not exist
pub(crate) fn read_part(archive: &mut DocxArchive<'_>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(Cursor::new(&mut buffer));
            for (name, body) in entries {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(body.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_rejects_wrong_extension() {
        let err = validate_docx_path(Path::new("report.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Expected .docx"));
        assert!(validate_docx_path(Path::new("Report.DOCX")).is_ok());
    }

    #[test]
    fn test_detects_spreadsheet_archive() {
        let bytes = zip_with(&[("xl/workbook.xml", "<workbook/>")]);
        let err = open_docx_archive(&bytes).unwrap_err();
        assert!(err.to_string().contains("Excel"));
    }

    #[test]
    fn test_read_part_missing_is_none() {
        let bytes = zip_with(&[(DOCUMENT_PART, "<w:document/>")]);
        let mut archive = open_docx_archive(&bytes).unwrap();
        assert!(read_part(&mut archive, STYLES_PART).unwrap().is_none());
        assert_eq!(
            read_part(&mut archive, DOCUMENT_PART).unwrap().unwrap(),
            b"<w:document/>"
        );
    }
}
