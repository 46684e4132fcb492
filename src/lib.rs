//! Surgical OOXML document assembly
//!
//! Fills a functional specification `.docx` template in place, so every
//! ruler setting and style the template author chose survives, and
//! builds `.pptx` decks from structured outlines. Both formats go
//! through the same package container and XML tree layers; nothing here
//! shells out to an Office runtime.

pub mod deck;
pub mod docx;
pub mod funcspec;
pub mod naming;
pub mod package;
pub mod xml;

// Re-export the types most callers start from
pub use deck::{build_deck, extract_deck_text, parse_deck_json, DeckContent, SlideContent};
pub use docx::ImageAttachment;
pub use funcspec::{generate_functional_spec, FieldBundle, SpecTemplate};
pub use naming::{deck_download_name, spec_download_name};
