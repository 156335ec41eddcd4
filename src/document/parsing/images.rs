//! Embedded image extraction
//!
//! Images are reached through `word/_rels/document.xml.rels`: each image
//! relationship id points at a media part whose bytes are copied into the
//! registry under a fresh output filename.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::super::io::{read_part, DocxArchive, DOCUMENT_RELS_PART};
use super::super::models::{DecodedImage, ImageRegistry};
use super::styles::get_attr;
use crate::error::Result;

const IMAGE_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// (relationship id, archive path) for every internal image relationship
pub(crate) fn parse_image_relationships(xml: &[u8]) -> Result<Vec<(String, String)>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut targets = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let external = get_attr(e, b"TargetMode").as_deref() == Some("External");
                let is_image = get_attr(e, b"Type").as_deref() == Some(IMAGE_RELATIONSHIP);
                if let (false, true, Some(id), Some(target)) =
                    (external, is_image, get_attr(e, b"Id"), get_attr(e, b"Target"))
                {
                    targets.push((id, resolve_target(&target)));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}

/// Relationship targets are relative to `word/` unless rooted
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(rooted) => rooted.to_string(),
        None => format!("word/{}", target.trim_start_matches("./")),
    }
}

/// Extension for the output filename, sniffing the bytes when the part name has none
fn image_extension(part_name: &str, bytes: &[u8]) -> String {
    let from_name = part_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && !ext.contains('/') && ext != "bin");

    from_name
        .or_else(|| {
            image::guess_format(bytes)
                .ok()
                .and_then(|format| format.extensions_str().first().map(|ext| ext.to_string()))
        })
        .unwrap_or_else(|| "bin".to_string())
}

/// Build the image registry for the document
pub(crate) fn extract_images(archive: &mut DocxArchive<'_>) -> Result<ImageRegistry> {
    let mut registry = ImageRegistry::new();

    let Some(rels) = read_part(archive, DOCUMENT_RELS_PART)? else {
        log::debug!("No document relationships part, no images to extract");
        return Ok(registry);
    };

    for (index, (relationship_id, part_name)) in
        parse_image_relationships(&rels)?.into_iter().enumerate()
    {
        match read_part(archive, &part_name)? {
            Some(bytes) => {
                let filename = format!("image_{}.{}", index + 1, image_extension(&part_name, &bytes));
                log::debug!("Extracted image {relationship_id} -> {filename} ({} bytes)", bytes.len());
                registry.insert(relationship_id, DecodedImage { bytes, filename });
            }
            None => {
                log::warn!("Image relationship {relationship_id} points at missing part {part_name}");
            }
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS_XML: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
  <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="/word/media/chart.JPEG"/>
  <Relationship Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="http://example.com/a.png" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_only_internal_images_are_collected() {
        let targets = parse_image_relationships(RELS_XML.as_bytes()).unwrap();
        assert_eq!(
            targets,
            vec![
                ("rId4".to_string(), "word/media/image1.png".to_string()),
                ("rId5".to_string(), "word/media/chart.JPEG".to_string()),
            ]
        );
    }

    #[test]
    fn test_extension_from_name_or_bytes() {
        assert_eq!(image_extension("word/media/chart.JPEG", &[]), "jpeg");
        let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(image_extension("word/media/blob", &png_magic), "png");
        assert_eq!(image_extension("word/media/blob", b"??"), "bin");
    }
}
