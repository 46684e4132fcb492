//! Assemble a `.pptx` package from a deck outline.
//!
//! The deck is built from scratch rather than edited into a template:
//! a blank master/layout pair, a theme, then one slide part per outline
//! entry with a title slide in front. Every text box is absolutely
//! positioned on a 13.333 by 7.5 inch canvas, mirroring the layout the
//! outline format was designed around. Fixed-shape parts come from
//! mustache templates next to this module; slide bodies are built as
//! element trees so user text is escaped by the serializer.

use serde::Serialize;

use crate::package::{Package, CONTENT_TYPES_PART};
use crate::xml::{serialize_document, XmlElement};

use super::ns;
use super::{DeckContent, Result, SlideContent};

const NAVY: &str = "0F172A";
const GREY: &str = "64748B";

/// Entry in the slide lists of presentation.xml and its rels.
///
/// `number` is the 1-based part number (the title slide is slide 1),
/// `slide_id` the presentation-unique id counted from 256 and `rel` the
/// relationship number after the two master relationships.
#[derive(Serialize)]
struct SlideRef {
    number: usize,
    slide_id: usize,
    rel: usize,
}

impl SlideRef {
    fn new(number: usize) -> Self {
        Self {
            number,
            slide_id: 255 + number,
            rel: 2 + number,
        }
    }
}

/// Entry for one notes part: `number` is the notes part number in order
/// of appearance, `slide_number` the slide part it belongs to.
#[derive(Serialize)]
struct NotesRef {
    number: usize,
    slide_number: usize,
}

#[derive(Serialize)]
struct DeckParts<'a> {
    slides: &'a [SlideRef],
    notes: &'a [NotesRef],
}

#[derive(Serialize)]
struct SlideRels<'a> {
    notes: &'a [NotesRef],
}

/// Build the complete `.pptx` archive for an outline.
pub fn build_deck(content: &DeckContent) -> Result<Vec<u8>> {
    let slides: Vec<SlideRef> = (1..=content.slides.len() + 1).map(SlideRef::new).collect();
    let notes = notes_refs(content);
    let parts = DeckParts {
        slides: &slides,
        notes: &notes,
    };

    let mut package = Package::new();
    package.set_part(
        CONTENT_TYPES_PART,
        render(include_str!("parts/content_types.xml.mustache"), &parts)?.into_bytes(),
    );
    package.set_part("_rels/.rels", fixed(include_str!("parts/root_rels.xml")));
    package.set_part(
        "ppt/presentation.xml",
        render(include_str!("parts/presentation.xml.mustache"), &parts)?.into_bytes(),
    );
    package.set_part(
        "ppt/_rels/presentation.xml.rels",
        render(include_str!("parts/presentation_rels.xml.mustache"), &parts)?.into_bytes(),
    );
    package.set_part(
        "ppt/slideMasters/slideMaster1.xml",
        fixed(include_str!("parts/slide_master.xml")),
    );
    package.set_part(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        fixed(include_str!("parts/slide_master_rels.xml")),
    );
    package.set_part(
        "ppt/slideLayouts/slideLayout1.xml",
        fixed(include_str!("parts/slide_layout.xml")),
    );
    package.set_part(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        fixed(include_str!("parts/slide_layout_rels.xml")),
    );
    package.set_part(
        "ppt/notesMasters/notesMaster1.xml",
        fixed(include_str!("parts/notes_master.xml")),
    );
    package.set_part(
        "ppt/notesMasters/_rels/notesMaster1.xml.rels",
        fixed(include_str!("parts/notes_master_rels.xml")),
    );
    package.set_part("ppt/theme/theme1.xml", fixed(include_str!("parts/theme.xml")));

    package.set_part(
        "ppt/slides/slide1.xml",
        serialize_document(&title_slide(content))?,
    );
    package.set_part(
        "ppt/slides/_rels/slide1.xml.rels",
        render(
            include_str!("parts/slide_rels.xml.mustache"),
            &SlideRels { notes: &[] },
        )?
        .into_bytes(),
    );

    for (index, slide) in content.slides.iter().enumerate() {
        let number = index + 2;
        package.set_part(
            &format!("ppt/slides/slide{number}.xml"),
            serialize_document(&content_slide(slide))?,
        );
        let own_notes = notes
            .iter()
            .find(|n| n.slide_number == number)
            .map(std::slice::from_ref)
            .unwrap_or(&[]);
        package.set_part(
            &format!("ppt/slides/_rels/slide{number}.xml.rels"),
            render(
                include_str!("parts/slide_rels.xml.mustache"),
                &SlideRels { notes: own_notes },
            )?
            .into_bytes(),
        );
    }

    for note in &notes {
        let slide = &content.slides[note.slide_number - 2];
        package.set_part(
            &format!("ppt/notesSlides/notesSlide{}.xml", note.number),
            serialize_document(&notes_slide(&slide.notes))?,
        );
        package.set_part(
            &format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", note.number),
            render(include_str!("parts/notes_slide_rels.xml.mustache"), note)?.into_bytes(),
        );
    }

    Ok(package.to_bytes()?)
}

fn notes_refs(content: &DeckContent) -> Vec<NotesRef> {
    let mut refs = Vec::new();
    for (index, slide) in content.slides.iter().enumerate() {
        if !slide.notes.is_empty() {
            refs.push(NotesRef {
                number: refs.len() + 1,
                slide_number: index + 2,
            });
        }
    }
    refs
}

fn render<T: Serialize>(source: &str, context: &T) -> Result<String> {
    let template = mustache::compile_str(source)?;
    Ok(template.render_to_string(context)?)
}

fn fixed(source: &str) -> Vec<u8> {
    source.as_bytes().to_vec()
}

/// Slide 1: the deck title, with a subtitle box only when one is set.
fn title_slide(content: &DeckContent) -> XmlElement {
    let mut shapes = vec![text_box(2, &content.title, 100, 250, 1100, 150, 36, true, NAVY)];
    if !content.subtitle.is_empty() {
        shapes.push(text_box(
            3,
            &content.subtitle,
            100,
            420,
            1100,
            100,
            20,
            false,
            GREY,
        ));
    }
    part_root("p:sld", shapes)
}

/// A content slide: heading on top, one box per bullet below it.
fn content_slide(slide: &SlideContent) -> XmlElement {
    let mut shapes = vec![text_box(2, &slide.title, 80, 40, 1150, 100, 28, true, NAVY)];
    for (index, bullet) in slide.bullets.iter().enumerate() {
        let top = 160 + 55 * index as i64;
        shapes.push(text_box(
            3 + index,
            &format!("\u{2022} {bullet}"),
            100,
            top,
            1100,
            50,
            16,
            false,
            NAVY,
        ));
    }
    part_root("p:sld", shapes)
}

/// The notes part for one slide. Newlines split into paragraphs the way
/// slide text frames treat them.
fn notes_slide(notes: &str) -> XmlElement {
    let mut body = XmlElement::new("p:txBody")
        .with_child(XmlElement::new("a:bodyPr"))
        .with_child(XmlElement::new("a:lstStyle"));
    for line in notes.split('\n') {
        body.push_element(
            XmlElement::new("a:p").with_child(
                XmlElement::new("a:r")
                    .with_child(XmlElement::new("a:rPr").with_attr("lang", "en-US"))
                    .with_child(XmlElement::new("a:t").with_text(line)),
            ),
        );
    }
    let placeholder = XmlElement::new("p:sp")
        .with_child(
            XmlElement::new("p:nvSpPr")
                .with_child(
                    XmlElement::new("p:cNvPr")
                        .with_attr("id", "2")
                        .with_attr("name", "Notes Placeholder 1"),
                )
                .with_child(
                    XmlElement::new("p:cNvSpPr")
                        .with_child(XmlElement::new("a:spLocks").with_attr("noGrp", "1")),
                )
                .with_child(
                    XmlElement::new("p:nvPr").with_child(
                        XmlElement::new("p:ph")
                            .with_attr("type", "body")
                            .with_attr("idx", "1"),
                    ),
                ),
        )
        .with_child(XmlElement::new("p:spPr"))
        .with_child(body);
    part_root("p:notes", vec![placeholder])
}

/// Wrap shapes in the common slide scaffolding: shape tree with its
/// group header, then the color map override back to the master.
fn part_root(name: &str, shapes: Vec<XmlElement>) -> XmlElement {
    let mut tree = XmlElement::new("p:spTree")
        .with_child(
            XmlElement::new("p:nvGrpSpPr")
                .with_child(
                    XmlElement::new("p:cNvPr")
                        .with_attr("id", "1")
                        .with_attr("name", ""),
                )
                .with_child(XmlElement::new("p:cNvGrpSpPr"))
                .with_child(XmlElement::new("p:nvPr")),
        )
        .with_child(XmlElement::new("p:grpSpPr"));
    for shape in shapes {
        tree.push_element(shape);
    }
    XmlElement::new(name)
        .with_attr("xmlns:a", ns::A)
        .with_attr("xmlns:r", ns::R)
        .with_attr("xmlns:p", ns::P)
        .with_child(XmlElement::new("p:cSld").with_child(tree))
        .with_child(
            XmlElement::new("p:clrMapOvr").with_child(XmlElement::new("a:masterClrMapping")),
        )
}

/// One absolutely positioned single-run text box. Geometry is given in
/// hundredths of an inch, the font size in points.
fn text_box(
    id: usize,
    text: &str,
    left: i64,
    top: i64,
    width: i64,
    height: i64,
    points: u32,
    bold: bool,
    color: &str,
) -> XmlElement {
    let mut run_props = XmlElement::new("a:rPr")
        .with_attr("lang", "en-US")
        .with_attr("sz", &(points * 100).to_string());
    if bold {
        run_props.set_attr("b", "1");
    }
    run_props.push_element(
        XmlElement::new("a:solidFill")
            .with_child(XmlElement::new("a:srgbClr").with_attr("val", color)),
    );

    XmlElement::new("p:sp")
        .with_child(
            XmlElement::new("p:nvSpPr")
                .with_child(
                    XmlElement::new("p:cNvPr")
                        .with_attr("id", &id.to_string())
                        .with_attr("name", &format!("TextBox {id}")),
                )
                .with_child(XmlElement::new("p:cNvSpPr").with_attr("txBox", "1"))
                .with_child(XmlElement::new("p:nvPr")),
        )
        .with_child(
            XmlElement::new("p:spPr")
                .with_child(
                    XmlElement::new("a:xfrm")
                        .with_child(
                            XmlElement::new("a:off")
                                .with_attr("x", &emu(left))
                                .with_attr("y", &emu(top)),
                        )
                        .with_child(
                            XmlElement::new("a:ext")
                                .with_attr("cx", &emu(width))
                                .with_attr("cy", &emu(height)),
                        ),
                )
                .with_child(
                    XmlElement::new("a:prstGeom")
                        .with_attr("prst", "rect")
                        .with_child(XmlElement::new("a:avLst")),
                ),
        )
        .with_child(
            XmlElement::new("p:txBody")
                .with_child(XmlElement::new("a:bodyPr").with_attr("wrap", "square"))
                .with_child(XmlElement::new("a:lstStyle"))
                .with_child(
                    XmlElement::new("a:p").with_child(
                        XmlElement::new("a:r")
                            .with_child(run_props)
                            .with_child(XmlElement::new("a:t").with_text(text)),
                    ),
                ),
        )
}

// 914400 EMU per inch, given hundredths of an inch.
fn emu(hundredths: i64) -> String {
    (hundredths * 9_144).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn outline() -> DeckContent {
        DeckContent {
            title: "Quarterly Review".to_string(),
            subtitle: "FY25 Q3".to_string(),
            slides: vec![
                SlideContent {
                    title: "Wins".to_string(),
                    bullets: vec![
                        "Shipped the importer".to_string(),
                        "Cut batch latency".to_string(),
                    ],
                    notes: "Keep this one short.".to_string(),
                },
                SlideContent {
                    title: "Risks".to_string(),
                    bullets: vec!["Hiring".to_string()],
                    notes: String::new(),
                },
            ],
        }
    }

    fn slide_xml(pkg: &Package, name: &str) -> XmlElement {
        parse_document(pkg.part(name).expect("part")).expect("xml")
    }

    fn shape_tree(slide: &XmlElement) -> &XmlElement {
        slide
            .find("p:cSld")
            .and_then(|c| c.find("p:spTree"))
            .expect("spTree")
    }

    #[test]
    fn emits_one_slide_part_per_entry_plus_title() {
        let bytes = build_deck(&outline()).expect("build");
        let pkg = Package::from_bytes(&bytes).expect("read");
        assert!(pkg.part("ppt/slides/slide1.xml").is_some());
        assert!(pkg.part("ppt/slides/slide3.xml").is_some());
        assert!(pkg.part("ppt/slides/slide4.xml").is_none());
        assert!(pkg.part("ppt/slideMasters/slideMaster1.xml").is_some());
        assert!(pkg.part("ppt/theme/theme1.xml").is_some());
    }

    #[test]
    fn title_slide_holds_title_and_subtitle_boxes() {
        let bytes = build_deck(&outline()).expect("build");
        let pkg = Package::from_bytes(&bytes).expect("read");
        let slide = slide_xml(&pkg, "ppt/slides/slide1.xml");
        assert_eq!(shape_tree(&slide).count("p:sp"), 2);
        assert_eq!(slide.gather_text("a:t"), "Quarterly ReviewFY25 Q3");
    }

    #[test]
    fn empty_subtitle_gets_no_box() {
        let mut content = outline();
        content.subtitle.clear();
        let bytes = build_deck(&content).expect("build");
        let pkg = Package::from_bytes(&bytes).expect("read");
        let slide = slide_xml(&pkg, "ppt/slides/slide1.xml");
        assert_eq!(shape_tree(&slide).count("p:sp"), 1);
    }

    #[test]
    fn bullets_take_a_marked_box_each() {
        let bytes = build_deck(&outline()).expect("build");
        let pkg = Package::from_bytes(&bytes).expect("read");
        let slide = slide_xml(&pkg, "ppt/slides/slide2.xml");
        assert_eq!(shape_tree(&slide).count("p:sp"), 3);
        let text = slide.gather_text("a:t");
        assert!(text.contains("\u{2022} Shipped the importer"));
        assert!(text.contains("\u{2022} Cut batch latency"));
    }

    #[test]
    fn notes_parts_exist_only_where_notes_do() {
        let bytes = build_deck(&outline()).expect("build");
        let pkg = Package::from_bytes(&bytes).expect("read");
        let notes = slide_xml(&pkg, "ppt/notesSlides/notesSlide1.xml");
        assert_eq!(notes.gather_text("a:t"), "Keep this one short.");
        assert!(pkg.part("ppt/notesSlides/notesSlide2.xml").is_none());

        let with_notes =
            String::from_utf8(pkg.part("ppt/slides/_rels/slide2.xml.rels").expect("rels").to_vec())
                .expect("utf-8");
        assert!(with_notes.contains("notesSlides/notesSlide1.xml"));
        let without =
            String::from_utf8(pkg.part("ppt/slides/_rels/slide3.xml.rels").expect("rels").to_vec())
                .expect("utf-8");
        assert!(!without.contains("notesSlides"));
    }

    #[test]
    fn slide_ids_count_from_256() {
        let bytes = build_deck(&outline()).expect("build");
        let pkg = Package::from_bytes(&bytes).expect("read");
        let presentation = slide_xml(&pkg, "ppt/presentation.xml");
        let ids: Vec<String> = presentation
            .find("p:sldIdLst")
            .expect("sldIdLst")
            .elements()
            .map(|el| el.attr("id").expect("id").to_string())
            .collect();
        assert_eq!(ids, vec!["256", "257", "258"]);
    }

    #[test]
    fn reserved_characters_in_text_are_escaped() {
        let content = DeckContent {
            title: "R&D <review>".to_string(),
            subtitle: String::new(),
            slides: Vec::new(),
        };
        let bytes = build_deck(&content).expect("build");
        let pkg = Package::from_bytes(&bytes).expect("read");
        let slide = slide_xml(&pkg, "ppt/slides/slide1.xml");
        assert_eq!(slide.gather_text("a:t"), "R&D <review>");
    }
}
