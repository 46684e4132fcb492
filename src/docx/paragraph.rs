//! Paragraph surgery: text replacement that keeps the first run's
//! character formatting, alignment, and builders for inserted paragraphs.

use crate::xml::{XmlElement, XmlNode};

/// Visible text of a paragraph (all runs concatenated)
pub fn para_text(para: &XmlElement) -> String {
    para.gather_text("w:t")
}

/// Replace a paragraph's visible text. The first run keeps its `w:rPr`
/// and receives the new text as its only content; every later run is
/// dropped. A paragraph with no runs gains a plain one. Paragraph
/// properties are untouched.
pub fn set_para_text(para: &mut XmlElement, text: &str) {
    let mut seen_run = false;
    para.children.retain(|child| match child {
        XmlNode::Element(el) if el.name == "w:r" => {
            if seen_run {
                false
            } else {
                seen_run = true;
                true
            }
        }
        _ => true,
    });

    match para.find_mut("w:r") {
        Some(run) => {
            run.children
                .retain(|c| matches!(c, XmlNode::Element(el) if el.name == "w:rPr"));
            run.push_element(text_element(text));
        }
        None => {
            para.push_element(XmlElement::new("w:r").with_child(text_element(text)));
        }
    }
}

/// Set paragraph alignment (`w:jc`), creating `w:pPr` at the front of the
/// paragraph when absent.
pub fn set_para_alignment(para: &mut XmlElement, alignment: &str) {
    if para.find("w:pPr").is_none() {
        para.children
            .insert(0, XmlNode::Element(XmlElement::new("w:pPr")));
    }
    if let Some(ppr) = para.find_mut("w:pPr") {
        match ppr.find_mut("w:jc") {
            Some(jc) => jc.set_attr("w:val", alignment),
            None => ppr.push_element(XmlElement::new("w:jc").with_attr("w:val", alignment)),
        }
    }
}

/// A fresh paragraph with one run of plain text
pub fn make_text_para(text: &str, bold: bool, italic: bool) -> XmlElement {
    let mut rpr = XmlElement::new("w:rPr");
    if bold {
        rpr.push_element(XmlElement::new("w:b"));
    }
    if italic {
        rpr.push_element(XmlElement::new("w:i"));
    }
    let mut run = XmlElement::new("w:r");
    if bold || italic {
        run.push_element(rpr);
    }
    run.push_element(text_element(text));
    XmlElement::new("w:p").with_child(run)
}

/// Caption paragraph for an embedded picture: centered, italic, 9 pt,
/// grey (64748B)
pub fn make_caption_para(text: &str) -> XmlElement {
    let rpr = XmlElement::new("w:rPr")
        .with_child(XmlElement::new("w:i"))
        .with_child(XmlElement::new("w:sz").with_attr("w:val", "18"))
        .with_child(XmlElement::new("w:color").with_attr("w:val", "64748B"));
    let ppr = XmlElement::new("w:pPr")
        .with_child(XmlElement::new("w:jc").with_attr("w:val", "center"));
    XmlElement::new("w:p").with_child(ppr).with_child(
        XmlElement::new("w:r")
            .with_child(rpr)
            .with_child(text_element(text)),
    )
}

fn text_element(text: &str) -> XmlElement {
    XmlElement::new("w:t")
        .with_attr("xml:space", "preserve")
        .with_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled_para() -> XmlElement {
        let rpr = XmlElement::new("w:rPr")
            .with_child(XmlElement::new("w:b"))
            .with_child(XmlElement::new("w:color").with_attr("w:val", "FF5F00"));
        XmlElement::new("w:p")
            .with_child(XmlElement::new("w:pPr").with_child(
                XmlElement::new("w:pStyle").with_attr("w:val", "Heading2"),
            ))
            .with_child(
                XmlElement::new("w:r")
                    .with_child(rpr)
                    .with_child(XmlElement::new("w:t").with_text("old ")),
            )
            .with_child(
                XmlElement::new("w:r")
                    .with_child(XmlElement::new("w:t").with_text("tail")),
            )
    }

    #[test]
    fn replacement_keeps_first_run_formatting() {
        let mut para = styled_para();
        set_para_text(&mut para, "new text");
        assert_eq!(para_text(&para), "new text");
        assert_eq!(para.count("w:r"), 1, "later runs must be dropped");
        let run = para.find("w:r").expect("run");
        let rpr = run.find("w:rPr").expect("formatting survives");
        assert!(rpr.find("w:b").is_some());
        assert_eq!(
            rpr.find("w:color").and_then(|c| c.attr("w:val")),
            Some("FF5F00")
        );
    }

    #[test]
    fn replacement_keeps_paragraph_properties() {
        let mut para = styled_para();
        set_para_text(&mut para, "x");
        let style = para
            .find("w:pPr")
            .and_then(|p| p.find("w:pStyle"))
            .and_then(|s| s.attr("w:val"));
        assert_eq!(style, Some("Heading2"));
    }

    #[test]
    fn empty_paragraph_gains_a_run() {
        let mut para = XmlElement::new("w:p");
        set_para_text(&mut para, "filled");
        assert_eq!(para_text(&para), "filled");
    }

    #[test]
    fn alignment_creates_ppr_at_front() {
        let mut para = make_text_para("x", false, false);
        set_para_alignment(&mut para, "center");
        let first = para.children[0].as_element().expect("element");
        assert_eq!(first.name, "w:pPr");
        assert_eq!(
            first.find("w:jc").and_then(|jc| jc.attr("w:val")),
            Some("center")
        );
    }

    #[test]
    fn caption_is_centered_italic_small_grey() {
        let cap = make_caption_para("Screenshot");
        let jc = cap
            .find("w:pPr")
            .and_then(|p| p.find("w:jc"))
            .and_then(|jc| jc.attr("w:val"));
        assert_eq!(jc, Some("center"));
        let rpr = cap
            .find("w:r")
            .and_then(|r| r.find("w:rPr"))
            .expect("caption run properties");
        assert!(rpr.find("w:i").is_some());
        assert_eq!(rpr.find("w:sz").and_then(|s| s.attr("w:val")), Some("18"));
        assert_eq!(
            rpr.find("w:color").and_then(|c| c.attr("w:val")),
            Some("64748B")
        );
    }

    #[test]
    fn preserve_space_is_set_on_new_text() {
        let para = make_text_para("  padded  ", false, true);
        let t = para
            .find("w:r")
            .and_then(|r| r.find("w:t"))
            .expect("text element");
        assert_eq!(t.attr("xml:space"), Some("preserve"));
        assert_eq!(t.text(), "  padded  ");
    }
}
