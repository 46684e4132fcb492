//! Word 2010 checkbox content controls
//!
//! A checkbox cell holds a `w:sdt` whose `w:sdtPr` carries a
//! `w14:checkbox` with a `w14:checked` state element, and whose visible
//! content is a ballot-box glyph in a `w:t`. Checking flips both: the
//! semantic `w14:val` and the display glyph.

use crate::xml::{XmlElement, XmlNode};

const UNCHECKED_GLYPH: char = '\u{2610}';
const CHECKED_GLYPH: char = '\u{2612}';

/// Form-field control view over a table cell (`w:tc`)
pub struct CheckboxControl<'a> {
    cell: &'a mut XmlElement,
}

impl<'a> CheckboxControl<'a> {
    pub fn new(cell: &'a mut XmlElement) -> Self {
        Self { cell }
    }

    /// The cell's visible label: its text minus any checkbox glyph and
    /// surrounding whitespace
    pub fn label(&self) -> String {
        cell_label(self.cell)
    }

    /// True when any checkbox state in the cell reads checked
    pub fn is_checked(&self) -> bool {
        let mut checked = false;
        self.cell.visit_named("w14:checked", &mut |el| {
            if matches!(el.attr("w14:val"), Some("1") | Some("true")) {
                checked = true;
            }
        });
        checked
    }

    /// Flip every checkbox control in the cell. Idempotent: setting an
    /// already-checked control checked again changes nothing.
    pub fn set_checked(&mut self, checked: bool) {
        let (value, from, to) = if checked {
            ("1", UNCHECKED_GLYPH, "\u{2612}")
        } else {
            ("0", CHECKED_GLYPH, "\u{2610}")
        };
        self.cell.visit_named_mut("w:sdt", &mut |sdt| {
            sdt.visit_named_mut("w14:checked", &mut |el| el.set_attr("w14:val", value));
            sdt.visit_named_mut("w:t", &mut |t| {
                for child in &mut t.children {
                    if let XmlNode::Text(text) = child {
                        if text.contains(from) {
                            *text = text.replace(from, to);
                        }
                    }
                }
            });
        });
    }
}

/// Label text of a cell without borrowing it mutably
pub(super) fn cell_label(cell: &XmlElement) -> String {
    let text = cell.gather_text("w:t");
    text.trim()
        .trim_start_matches([UNCHECKED_GLYPH, CHECKED_GLYPH, ' '])
        .trim()
        .to_string()
}

/// Test fixture shared with the table module
#[cfg(test)]
pub(super) fn test_cell(label: &str, checked: bool) -> XmlElement {
    let glyph = if checked { "\u{2612}" } else { "\u{2610}" };
    let state = if checked { "1" } else { "0" };
    let sdt_pr = XmlElement::new("w:sdtPr").with_child(
        XmlElement::new("w14:checkbox")
            .with_child(XmlElement::new("w14:checked").with_attr("w14:val", state)),
    );
    let sdt_content = XmlElement::new("w:sdtContent").with_child(
        XmlElement::new("w:r").with_child(XmlElement::new("w:t").with_text(glyph)),
    );
    let para = XmlElement::new("w:p")
        .with_child(
            XmlElement::new("w:sdt")
                .with_child(sdt_pr)
                .with_child(sdt_content),
        )
        .with_child(XmlElement::new("w:r").with_child(
            XmlElement::new("w:t")
                .with_attr("xml:space", "preserve")
                .with_text(&format!(" {label}")),
        ));
    XmlElement::new("w:tc").with_child(para)
}
