//! Package part parsing utilities
//!
//! This module contains specialized parsing functions for the body
//! elements and the package parts that feed the reader.

pub(crate) mod formatting;
pub(crate) mod images;
pub(crate) mod list;
pub(crate) mod numbering;
pub(crate) mod styles;
pub(crate) mod table;
