//! WordprocessingML object model
//!
//! Thin views over the XML tree of a `.docx` package: the document with
//! its relationships and content types, a body editor with stable block
//! handles, paragraph text surgery, checkbox tables and inline pictures.
//! Mutations are targeted; everything the template author set up and we
//! do not touch survives byte-for-byte semantics on save.

mod body;
mod checkbox;
mod document;
mod paragraph;
mod picture;
mod table;

use thiserror::Error;

pub use body::{Anchor, BodyEditor};
pub use checkbox::CheckboxControl;
pub use document::WordDocument;
pub use paragraph::{
    make_caption_para, make_text_para, para_text, set_para_alignment, set_para_text,
};
pub use picture::splice_images;
pub use table::{column_count, data_row_count, toggle_columns, toggle_flat};

/// OOXML namespace URIs shared across the document modules
pub(crate) mod ns {
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    pub const W14: &str = "http://schemas.microsoft.com/office/word/2010/wordml";
    pub const WP: &str =
        "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
    pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
    pub const PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
    pub const R_DOC: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    pub const MC: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
    pub const PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    pub const CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";
    pub const REL_IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const REL_OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const REL_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
}

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("package error: {0}")]
    Package(#[from] crate::package::PackageError),

    #[error("xml error: {0}")]
    Xml(#[from] crate::xml::XmlError),

    /// The document tree is not the WordprocessingML shape we require
    #[error("malformed document: {0}")]
    Malformed(String),

    /// An image attachment could not be decoded or embedded
    #[error("image rejected: {0}")]
    Image(String),
}

pub type Result<T> = std::result::Result<T, DocxError>;

/// A named image supplied by the caller for embedding. Owned by the
/// compositor for the duration of one generation call, never retained.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. `image/png`; may be empty, in which case
    /// the sniffed format decides the content type
    pub media_type: String,
}

impl ImageAttachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes,
            media_type: media_type.into(),
        }
    }

    /// Caption text for the embedded picture
    pub fn caption(&self) -> &str {
        if self.name.trim().is_empty() {
            "Screenshot"
        } else {
            &self.name
        }
    }
}
