//! Document reading and data structures module
//!
//! This module turns a Microsoft Word (.docx) package into the inputs of
//! structural inference: the declared paragraph styles, the block stream in
//! document order and the embedded images.

pub(crate) mod io;
pub mod models;
pub(crate) mod parsing;
pub mod reader;

pub use models::*;
pub use reader::{Blocks, DocumentReader, DocxReader};
