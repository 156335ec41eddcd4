//! docx-topics: Word documents to DITA topic maps
//!
//! This library reads a Microsoft Word (.docx) document, infers its heading
//! structure from paragraph styles and emits one DITA concept topic per
//! heading, together with a navigation map mirroring the heading hierarchy.
//!
//! ```no_run
//! use docx_topics::{convert_docx, ConverterConfig, RunMetadata};
//! use std::path::Path;
//!
//! let metadata = RunMetadata::default().with_title("Operator Manual");
//! let config = ConverterConfig::load()?;
//! let document = convert_docx(Path::new("manual.docx"), &metadata, &config, None)?;
//! println!("{}", document.map_xml());
//! # Ok::<(), docx_topics::ConversionError>(())
//! ```

pub mod analysis;
pub mod color;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod topics;

// Re-export commonly used types
pub use analysis::{Role, StructuralNode, StyleLevelMap};
pub use color::ColorClassifier;
pub use config::ConverterConfig;
pub use convert::{convert_docx, convert_with_reader, Milestone};
pub use document::{BlockItem, DocumentReader, DocxReader, ImageRegistry};
pub use error::{ConversionError, Result};
pub use filter::{heading_counts, heading_occurrences, style_levels, HeadingFilter};
pub use metadata::RunMetadata;
pub use topics::{NavEntry, Topic, TopicDocument};
