//! Functional-specification composition
//!
//! Fills a pre-authored `.docx` skeleton from a structured field bundle:
//! user-story placeholders, three checkbox tables, conditional prose
//! sections and spliced screenshots, serialized to an in-memory buffer.
//! The skeleton stays fixed; the output length varies with the bundle.

mod builtin;
mod bundle;
mod compose;
mod layout;
mod template;

use thiserror::Error;

pub use bundle::{
    ColumnSelection, DevelopmentSystem, FieldBundle, ProcessSection, UserSection, UserStory,
};
pub use layout::{ProseSection, TableShape, TemplateLayout};
pub use template::SpecTemplate;

use crate::docx::ImageAttachment;

#[derive(Debug, Error)]
pub enum SpecError {
    /// The template does not match the section map; nothing sensible can
    /// be composed against it
    #[error("template integrity: {0}")]
    TemplateInvalid(String),

    #[error("document error: {0}")]
    Docx(#[from] crate::docx::DocxError),

    #[error("package error: {0}")]
    Package(#[from] crate::package::PackageError),

    #[error("xml error: {0}")]
    Xml(#[from] crate::xml::XmlError),
}

pub type Result<T> = std::result::Result<T, SpecError>;

/// Compose a functional specification from the built-in template.
/// Returns the finished `.docx` bytes, ready to stream to a download.
pub fn generate_functional_spec(
    bundle: &FieldBundle,
    problem_images: &[ImageAttachment],
    solution_images: &[ImageAttachment],
) -> Result<Vec<u8>> {
    SpecTemplate::builtin()?.compose(bundle, problem_images, solution_images)
}
