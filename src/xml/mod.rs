//! Owned XML element tree for Office Open XML part surgery
//!
//! Office documents keep their content in XML parts that must survive a
//! read-modify-write cycle byte-faithfully apart from the edits we make.
//! This module provides an order-preserving element tree parsed from and
//! serialized to bytes with quick-xml, with no whitespace trimming and
//! escape-safe text handling.
//!
//! Names are the qualified names as written (`w:p`, `w14:checked`, `a:t`)
//! and are matched literally. OOXML producers emit the conventional
//! prefixes and every template this crate authors declares them, so no
//! namespace resolution layer is needed.

mod io;
mod node;

pub use io::{parse_document, serialize_document};
pub use node::{XmlElement, XmlNode};

use thiserror::Error;

/// Errors raised while parsing or serializing an XML part
#[derive(Debug, Error)]
pub enum XmlError {
    /// The underlying reader/writer rejected the input
    #[error("malformed xml: {0}")]
    Parse(#[from] quick_xml::Error),

    /// The document shape is wrong (no root, stray content, ...)
    #[error("invalid xml document: {0}")]
    Structure(String),

    /// Part bytes are not UTF-8
    #[error("xml part is not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, XmlError>;
