//! Template loading and the composition entry point

use once_cell::sync::OnceCell;

use crate::docx::{BodyEditor, ImageAttachment, WordDocument};

use super::{builtin, compose, FieldBundle, Result, TemplateLayout};

static BUILTIN_BYTES: OnceCell<Vec<u8>> = OnceCell::new();

/// A specification template: the `.docx` skeleton bytes plus the section
/// map used to address its paragraphs and tables. The template itself is
/// immutable; every composition parses its own copy.
#[derive(Debug, Clone)]
pub struct SpecTemplate {
    bytes: Vec<u8>,
    layout: TemplateLayout,
}

impl SpecTemplate {
    /// The built-in skeleton with its matching default layout. The
    /// skeleton is serialized once per process and cached.
    pub fn builtin() -> Result<Self> {
        let bytes = BUILTIN_BYTES.get_or_try_init(builtin::template_bytes)?;
        Ok(Self {
            bytes: bytes.clone(),
            layout: TemplateLayout::default(),
        })
    }

    /// An externally authored template. It must follow the default
    /// section map unless [`with_layout`](Self::with_layout) supplies its
    /// own; the map is checked against the document at composition time.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            layout: TemplateLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: TemplateLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Run one composition: fill the bundle into a fresh copy of the
    /// template, splice the images, and seal the result. Fails on a
    /// broken template or serialization; a sparse bundle and rejected
    /// images are handled leniently and never fail the call.
    pub fn compose(
        &self,
        bundle: &FieldBundle,
        problem_images: &[ImageAttachment],
        solution_images: &[ImageAttachment],
    ) -> Result<Vec<u8>> {
        let mut doc = WordDocument::open(&self.bytes)?;
        let mut editor = BodyEditor::new(doc.take_body_blocks());
        self.layout.validate(&editor)?;
        compose::apply(
            &mut doc,
            &mut editor,
            &self.layout,
            bundle,
            problem_images,
            solution_images,
        );
        doc.set_body_blocks(editor.into_blocks());
        Ok(doc.save()?)
    }
}
