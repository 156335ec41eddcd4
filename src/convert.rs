//! Conversion pipeline
//!
//! Runs the stages in order for one document: read, classify styles, build
//! the heading tree, assign roles, generate topics. Everything is built fresh
//! per call; only the configuration outlives a run.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::analysis::{build, classify_catalog, resolve_roles, StyleLevelMap};
use crate::config::ConverterConfig;
use crate::document::{DocumentReader, DocxReader, ImageRegistry};
use crate::error::Result;
use crate::metadata::RunMetadata;
use crate::topics::{ContentRenderer, HeadingCounters, TopicDocument, TopicGenerator};

/// Pipeline stages reported to the progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    Load,
    ExtractImages,
    DetectStyles,
    AnalyzeStructure,
    DetermineRoles,
    BuildTopics,
    Finished,
}

impl Milestone {
    pub fn message(&self) -> &'static str {
        match self {
            Milestone::Load => "Loading DOCX file...",
            Milestone::ExtractImages => "Extracting images...",
            Milestone::DetectStyles => "Detecting and analyzing document styles...",
            Milestone::AnalyzeStructure => "Analyzing document structure...",
            Milestone::DetermineRoles => "Determining section/module roles...",
            Milestone::BuildTopics => "Building topics...",
            Milestone::Finished => "Conversion finished.",
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Observer for pipeline milestones; never required for correctness
pub type Progress<'a> = Option<&'a dyn Fn(Milestone)>;

fn notify(progress: Progress<'_>, milestone: Milestone) {
    log::info!("{milestone}");
    if let Some(callback) = progress {
        callback(milestone);
    }
}

/// Convert a .docx file into a topic document
///
/// Fails only when the file cannot be opened or parsed as a Word document.
pub fn convert_docx(
    path: &Path,
    metadata: &RunMetadata,
    config: &ConverterConfig,
    progress: Progress<'_>,
) -> Result<TopicDocument> {
    log::info!("Starting DOCX->DITA conversion: {}", path.display());
    notify(progress, Milestone::Load);

    let reader = DocxReader::open(path).inspect_err(|e| {
        log::error!("Conversion failed for {}: {e:?}", path.display());
    })?;

    let source_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Document");

    Ok(convert_with_reader(
        &reader,
        source_name,
        metadata,
        config,
        progress,
    ))
}

/// Run the pipeline over any document reader
///
/// `source_name` titles the fallback topic when no topic was generated.
/// The `Load` milestone belongs to whoever opened the reader.
pub fn convert_with_reader<R>(
    reader: &R,
    source_name: &str,
    metadata: &RunMetadata,
    config: &ConverterConfig,
    progress: Progress<'_>,
) -> TopicDocument
where
    R: DocumentReader + ?Sized,
{
    log::debug!("Conversion knobs: {:?}", config.docx_conversion);

    notify(progress, Milestone::ExtractImages);
    let images = reader.images().unwrap_or_else(|e| {
        log::warn!("Image extraction failed, images will be skipped: {e}");
        ImageRegistry::new()
    });
    log::debug!("Extracted {} images", images.len());

    notify(progress, Milestone::DetectStyles);
    let style_levels = detect_styles(reader, metadata);

    notify(progress, Milestone::AnalyzeStructure);
    let mut root = build(reader.blocks(), &style_levels);

    notify(progress, Milestone::DetermineRoles);
    resolve_roles(&mut root);

    notify(progress, Milestone::BuildTopics);
    let revision_date = metadata.resolved_revision_date();
    let renderer = ContentRenderer::new(&images, &config.docx_color_conversion);
    let generator = TopicGenerator::new(&renderer, &images, revision_date);

    let mut counters = HeadingCounters::new();
    let mut generated = generator.generate(&root, &mut counters);

    if generated.topics.is_empty() {
        let title = Some(source_name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or("Document");
        log::info!("No topics detected, creating a single topic '{title}'");
        generated = generator.generate_single(title, &root.content);
    }

    let document = TopicDocument::new(metadata.clone(), generated);
    notify(progress, Milestone::Finished);
    document
}

/// Classify declared styles, then merge caller overrides on top
fn detect_styles<R>(reader: &R, metadata: &RunMetadata) -> StyleLevelMap
where
    R: DocumentReader + ?Sized,
{
    let classified = match reader.styles() {
        Ok(styles) => classify_catalog(&styles),
        Err(e) => {
            log::warn!("Style catalog unreadable, continuing without heading styles: {e}");
            StyleLevelMap::new()
        }
    };
    let detected = classified.len();

    let style_levels = classified.with_overrides(metadata.style_overrides());
    log::info!(
        "Style detection: classified={detected} total={}",
        style_levels.len()
    );

    if log::log_enabled!(log::Level::Debug) {
        let by_level: BTreeSet<(u8, &str)> =
            style_levels.iter().map(|(name, level)| (level, name)).collect();
        for (level, name) in by_level {
            log::debug!("  Level {level}: '{name}'");
        }
    }

    style_levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestone_messages() {
        assert_eq!(Milestone::Load.to_string(), "Loading DOCX file...");
        assert_eq!(Milestone::Finished.message(), "Conversion finished.");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_docx(
            &dir.path().join("absent.docx"),
            &RunMetadata::default(),
            &ConverterConfig::default(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_extension_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain text").unwrap();

        let err = convert_docx(&path, &RunMetadata::default(), &ConverterConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, crate::error::ConversionError::InvalidFormat(_)));
    }
}
