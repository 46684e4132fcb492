//! Flatten a `.pptx` back to labelled plain text.
//!
//! Edit flows hand an existing deck back to the model as context, so the
//! output is text the model can quote from: one `--- Slide N ---` block
//! per slide that has any, where N is the slide's 1-based position in
//! the deck. Slides without text keep their position but produce no
//! block. Decks from any producer are accepted, which is why this reads
//! the relationship graph instead of assuming our own part numbering.

use std::collections::HashMap;

use crate::package::Package;

use super::ns;
use super::Result;

/// Extract the visible text of every slide, in deck order.
pub fn extract_deck_text(data: &[u8]) -> Result<String> {
    let package = Package::from_bytes(data)?;
    let targets = slide_targets(&package)?;

    let mut sections = Vec::new();
    for (position, target) in targets.iter().enumerate() {
        let bytes = match package.part(target) {
            Some(bytes) => bytes,
            None => continue,
        };
        let texts = paragraph_texts(std::str::from_utf8(bytes)?)?;
        if !texts.is_empty() {
            sections.push(format!(
                "--- Slide {} ---\n{}",
                position + 1,
                texts.join("\n")
            ));
        }
    }
    Ok(sections.join("\n\n"))
}

/// Slide part names in presentation order, resolved through the
/// presentation relationships.
fn slide_targets(package: &Package) -> Result<Vec<String>> {
    let rels = std::str::from_utf8(package.expect_part("ppt/_rels/presentation.xml.rels")?)?;
    let rel_doc = roxmltree::Document::parse(rels)?;
    let mut by_id = HashMap::new();
    for node in rel_doc
        .descendants()
        .filter(|n| n.has_tag_name((ns::PKG_RELS, "Relationship")))
    {
        if let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) {
            by_id.insert(id.to_string(), target.to_string());
        }
    }

    let presentation = std::str::from_utf8(package.expect_part("ppt/presentation.xml")?)?;
    let pres_doc = roxmltree::Document::parse(presentation)?;
    let mut targets = Vec::new();
    for node in pres_doc
        .descendants()
        .filter(|n| n.has_tag_name((ns::P, "sldId")))
    {
        let rel_id = match node.attribute((ns::R, "id")) {
            Some(id) => id,
            None => continue,
        };
        if let Some(target) = by_id.get(rel_id) {
            targets.push(resolve_target(target));
        }
    }
    Ok(targets)
}

// Targets are relative to ppt/ unless they are package-absolute.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{target}"),
    }
}

/// Trimmed per-paragraph text of one slide part; empty paragraphs drop out.
fn paragraph_texts(xml: &str) -> Result<Vec<String>> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut texts = Vec::new();
    for para in doc
        .descendants()
        .filter(|n| n.has_tag_name((ns::A, "p")))
    {
        let mut line = String::new();
        for t in para
            .descendants()
            .filter(|n| n.has_tag_name((ns::A, "t")))
        {
            if let Some(text) = t.text() {
                line.push_str(text);
            }
        }
        let line = line.trim();
        if !line.is_empty() {
            texts.push(line.to_string());
        }
    }
    Ok(texts)
}
