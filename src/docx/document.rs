//! The top-level `.docx` view: package, document tree, relationships
//! and content types, plus media registration for inline pictures.

use crate::package::Package;
use crate::xml::{self, XmlElement, XmlNode};

use super::{ns, picture, DocxError, ImageAttachment, Result};

const DOCUMENT_PART: &str = "word/document.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// An open Word document. Holds the package alongside the parsed
/// `word/document.xml` tree, its relationship part and the package
/// content-type map, so media insertion can keep all three consistent.
#[derive(Debug)]
pub struct WordDocument {
    package: Package,
    document: XmlElement,
    rels: XmlElement,
    content_types: XmlElement,
    next_rel: u32,
    next_drawing: u32,
    next_image: u32,
}

impl WordDocument {
    /// Parse a `.docx` byte stream. Fails when the container, the main
    /// document part or its root structure is broken; a missing
    /// relationship part is tolerated and synthesized empty.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let package = Package::from_bytes(bytes)?;
        let document = xml::parse_document(package.expect_part(DOCUMENT_PART)?)?;
        if document.name != "w:document" {
            return Err(DocxError::Malformed(format!(
                "root element is {}, not w:document",
                document.name
            )));
        }
        if document.find("w:body").is_none() {
            return Err(DocxError::Malformed("w:body is missing".into()));
        }
        let content_types = xml::parse_document(package.expect_part(CONTENT_TYPES_PART)?)?;
        let rels = match package.part(DOCUMENT_RELS_PART) {
            Some(part) => xml::parse_document(part)?,
            None => XmlElement::new("Relationships").with_attr("xmlns", ns::PKG_RELS),
        };

        let next_rel = next_relationship_number(&rels);
        let next_drawing = next_drawing_number(&document);
        let next_image = next_image_number(&package);

        Ok(Self {
            package,
            document,
            rels,
            content_types,
            next_rel,
            next_drawing,
            next_image,
        })
    }

    /// Move the body's block-level children out for editing. The body
    /// element itself (and its attributes) stays in the tree.
    pub fn take_body_blocks(&mut self) -> Vec<XmlNode> {
        self.document
            .find_mut("w:body")
            .map(|body| std::mem::take(&mut body.children))
            .unwrap_or_default()
    }

    /// Put an edited block list back into the body.
    pub fn set_body_blocks(&mut self, blocks: Vec<XmlNode>) {
        if let Some(body) = self.document.find_mut("w:body") {
            body.children = blocks;
        }
    }

    /// Register an image attachment as a media part with its relationship
    /// and content-type entry, and return the drawing paragraph that
    /// displays it (centered, 3 in wide, height from the aspect ratio).
    ///
    /// The package is only touched once the image bytes have decoded, so
    /// a rejected attachment leaves the document unchanged.
    pub fn embed_picture(&mut self, attachment: &ImageAttachment) -> Result<XmlElement> {
        let probed = picture::probe_image(&attachment.bytes)?;
        let (width_emu, height_emu) = probed.scaled_extent();

        let number = self.next_image;
        self.next_image += 1;
        let content_type = if attachment.media_type.trim().is_empty() {
            probed.content_type
        } else {
            attachment.media_type.trim()
        };
        self.ensure_default_content_type(probed.ext, content_type);
        let part_name = format!("word/media/image{number}.{}", probed.ext);
        self.package.set_part(&part_name, attachment.bytes.clone());
        let rel_id =
            self.add_relationship(ns::REL_IMAGE, &format!("media/image{number}.{}", probed.ext));

        let drawing_id = self.next_drawing;
        self.next_drawing += 1;
        Ok(picture::drawing_paragraph(
            &rel_id,
            drawing_id,
            attachment.caption(),
            width_emu,
            height_emu,
        ))
    }

    /// Serialize the edited parts back into the package and seal it.
    pub fn save(mut self) -> Result<Vec<u8>> {
        let document = xml::serialize_document(&self.document)?;
        self.package.set_part(DOCUMENT_PART, document);
        let rels = xml::serialize_document(&self.rels)?;
        self.package.set_part(DOCUMENT_RELS_PART, rels);
        let content_types = xml::serialize_document(&self.content_types)?;
        self.package.set_part(CONTENT_TYPES_PART, content_types);
        Ok(self.package.to_bytes()?)
    }

    fn add_relationship(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.next_rel);
        self.next_rel += 1;
        self.rels.push_element(
            XmlElement::new("Relationship")
                .with_attr("Id", &id)
                .with_attr("Type", rel_type)
                .with_attr("Target", target),
        );
        id
    }

    fn ensure_default_content_type(&mut self, extension: &str, content_type: &str) {
        let present = self
            .content_types
            .elements()
            .any(|el| el.name == "Default" && el.attr("Extension") == Some(extension));
        if !present {
            self.content_types.push_element(
                XmlElement::new("Default")
                    .with_attr("Extension", extension)
                    .with_attr("ContentType", content_type),
            );
        }
    }
}

fn next_relationship_number(rels: &XmlElement) -> u32 {
    rels.elements()
        .filter(|el| el.name == "Relationship")
        .filter_map(|el| el.attr("Id"))
        .filter_map(|id| id.strip_prefix("rId"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

fn next_drawing_number(document: &XmlElement) -> u32 {
    let mut max = 0;
    document.visit_named("wp:docPr", &mut |el| {
        if let Some(id) = el.attr("id").and_then(|v| v.parse::<u32>().ok()) {
            max = max.max(id);
        }
    });
    max + 1
}

fn next_image_number(package: &Package) -> u32 {
    package
        .part_names()
        .filter_map(|name| name.strip_prefix("word/media/image"))
        .filter_map(|rest| rest.split('.').next())
        .filter_map(|stem| stem.parse::<u32>().ok())
        .max()
        .map_or(1, |max| max + 1)
}
