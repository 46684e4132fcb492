//! PresentationML deck generation and readback
//!
//! Decks travel the opposite direction from documents: instead of
//! editing a template we assemble a fresh `.pptx` from an outline
//! ([`DeckContent`]), and for follow-up edits we flatten an existing
//! deck back to labelled plain text. [`parse_deck_json`] recovers the
//! outline from raw model output, fences and prose included.

mod build;
mod content;
mod extract;

use thiserror::Error;

pub use build::build_deck;
pub use content::{parse_deck_json, DeckContent, SlideContent};
pub use extract::extract_deck_text;

/// PresentationML namespace URIs shared across the deck modules
pub(crate) mod ns {
    pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
    pub const P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    pub const PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("package error: {0}")]
    Package(#[from] crate::package::PackageError),

    #[error("xml error: {0}")]
    Xml(#[from] crate::xml::XmlError),

    /// A deck part failed to parse on readback
    #[error("deck xml error: {0}")]
    XmlRead(#[from] roxmltree::Error),

    /// A part template failed to compile or render
    #[error("part template error: {0}")]
    Template(#[from] mustache::Error),

    #[error("deck part is not valid utf-8")]
    Encoding(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;
