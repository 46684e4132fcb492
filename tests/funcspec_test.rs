// End-to-end composition against the built-in specification template

use specfill::funcspec::{SpecError, SpecTemplate};
use specfill::package::Package;
use specfill::xml::{parse_document, XmlElement};
use specfill::{generate_functional_spec, FieldBundle};

/// The body element of a generated document
fn open_body(bytes: &[u8]) -> XmlElement {
    let pkg = Package::from_bytes(bytes).expect("package");
    let doc = parse_document(pkg.part("word/document.xml").expect("document part")).expect("xml");
    doc.find("w:body").expect("body").clone()
}

/// Visible text of every body-level paragraph, in document order
fn paragraph_texts(bytes: &[u8]) -> Vec<String> {
    open_body(bytes)
        .elements()
        .filter(|el| el.name == "w:p")
        .map(|p| p.gather_text("w:t"))
        .collect()
}

fn position(texts: &[String], needle: &str) -> usize {
    texts
        .iter()
        .position(|t| t == needle)
        .unwrap_or_else(|| panic!("missing paragraph {needle:?}"))
}

/// Labels of every checked checkbox cell, in document order
fn checked_labels(bytes: &[u8]) -> Vec<String> {
    let body = open_body(bytes);
    let mut labels = Vec::new();
    body.visit_named("w:tc", &mut |cell| {
        let mut checked = false;
        cell.visit_named("w14:checked", &mut |el| {
            if el.attr("w14:val") == Some("1") {
                checked = true;
            }
        });
        if checked {
            let text = cell.gather_text("w:t");
            labels.push(
                text.trim_start_matches(['\u{2610}', '\u{2612}', ' '])
                    .trim()
                    .to_string(),
            );
        }
    });
    labels
}

#[test]
fn scenario_fills_story_collapses_problem_keeps_solution() {
    let bundle: FieldBundle = serde_json::from_str(
        r#"{
            "userStory": {"role": "planner", "want": "automate X", "ability": "save time"},
            "problemDescription": "",
            "solutionDescription": "manual steps are slow"
        }"#,
    )
    .expect("bundle");
    let bytes = generate_functional_spec(&bundle, &[], &[]).expect("compose");
    let texts = paragraph_texts(&bytes);

    let role = position(&texts, "I as a planner");
    assert_eq!(texts[role + 1], "want to automate X");
    assert_eq!(texts[role + 2], "to be able to save time");

    // Empty problem text collapses the section to its heading.
    let problem = position(&texts, "Actual Problem what should be solved");
    assert_eq!(texts[problem + 1], "Solution Description");

    // Non-empty solution text lands verbatim in the first slot and the
    // spare slots are gone.
    let solution = position(&texts, "Solution Description");
    assert_eq!(texts[solution + 1], "manual steps are slow");
    assert_eq!(texts[solution + 2], "Solution Design");
}

#[test]
fn instruction_paragraphs_never_survive() {
    let bundle: FieldBundle = serde_json::from_str(
        r#"{"problemDescription": "x", "technicalDetails": "y"}"#,
    )
    .expect("bundle");
    let bytes = generate_functional_spec(&bundle, &[], &[]).expect("compose");
    let texts = paragraph_texts(&bytes);
    for fragment in [
        "check Other and describe it below",
        "Describe the Problem",
        "Describe how could the solution look like",
        "Describe all objects",
        "names in English and German",
        "authorization objects or roles",
    ] {
        assert!(
            !texts.iter().any(|t| t.contains(fragment)),
            "instruction text {fragment:?} leaked into the output"
        );
    }
}

#[test]
fn empty_bundle_collapses_every_prose_section() {
    let bytes = generate_functional_spec(&FieldBundle::default(), &[], &[]).expect("compose");
    let texts = paragraph_texts(&bytes);
    for (heading, next) in [
        ("Actual Problem what should be solved", "Solution Description"),
        ("Solution Description", "Solution Design"),
        ("Technical Details", "Names and Language"),
        ("Names and Language", "Authorization"),
    ] {
        let at = position(&texts, heading);
        assert_eq!(texts[at + 1], next, "section under {heading:?} kept content");
    }
    assert_eq!(texts.last().map(String::as_str), Some("Authorization"));
    // Unfilled placeholders are removed, not left showing their ellipsis.
    assert!(!texts.iter().any(|t| t.ends_with("...")));
}

#[test]
fn selections_check_exactly_the_named_cells() {
    let bundle: FieldBundle = serde_json::from_str(
        r#"{
            "process": {
                "function": {"selected": ["Finance", "Other"]},
                "processArea": {"selected": ["reporting"]}
            },
            "user": {"selected": ["Developer"]},
            "developmentSystem": {"erp": {"selected": ["S/4HANA"]}}
        }"#,
    )
    .expect("bundle");
    let bytes = generate_functional_spec(&bundle, &[], &[]).expect("compose");
    // "Other" exists in all three process columns; only the function
    // column's box may be checked. Matching is case-insensitive.
    assert_eq!(
        checked_labels(&bytes),
        ["Finance", "Reporting", "Other", "Developer", "S/4HANA"]
    );
}

#[test]
fn other_slots_join_their_parts_in_order() {
    let bundle: FieldBundle = serde_json::from_str(
        r#"{
            "process": {
                "function": {"other": "Treasury"},
                "describeBelow": "monthly close"
            },
            "user": {"other": "guests", "describeBelow": "externals use the portal"},
            "developmentSystem": {"scm": {"other": "EWM extension"}}
        }"#,
    )
    .expect("bundle");
    let bytes = generate_functional_spec(&bundle, &[], &[]).expect("compose");
    let texts = paragraph_texts(&bytes);
    assert!(texts.contains(&"Other: Function Other: Treasury  |  monthly close".to_string()));
    assert!(texts.contains(&"Other: guests  |  externals use the portal".to_string()));
    assert!(texts.contains(&"Other: SCM: EWM extension".to_string()));
}

#[test]
fn unused_other_slots_disappear() {
    let bytes = generate_functional_spec(&FieldBundle::default(), &[], &[]).expect("compose");
    let texts = paragraph_texts(&bytes);
    assert!(!texts.iter().any(|t| t.starts_with("Other: ")));
}

#[test]
fn checkbox_glyph_flips_with_the_control_state() {
    let bundle: FieldBundle =
        serde_json::from_str(r#"{"user": {"selected": ["Key User"]}}"#).expect("bundle");
    let bytes = generate_functional_spec(&bundle, &[], &[]).expect("compose");
    let body = open_body(&bytes);
    let mut checked_glyphs = 0;
    body.visit_named("w:tc", &mut |cell| {
        if cell.gather_text("w:t").contains('\u{2612}') {
            checked_glyphs += 1;
        }
    });
    assert_eq!(checked_glyphs, 1, "exactly one cell shows the checked glyph");
}

/// A syntactically valid docx whose body does not match the section map
fn wrong_shape_docx() -> Vec<u8> {
    let document = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        r#"<w:body><w:p/><w:p/><w:p/></w:body></w:document>"#,
    );
    let types = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#,
    );
    let mut pkg = Package::new();
    pkg.set_part("[Content_Types].xml", types.as_bytes().to_vec());
    pkg.set_part("word/document.xml", document.as_bytes().to_vec());
    pkg.to_bytes().expect("write")
}

#[test]
fn template_off_the_map_is_a_fatal_integrity_error() {
    let template = SpecTemplate::from_bytes(wrong_shape_docx());
    let result = template.compose(&FieldBundle::default(), &[], &[]);
    assert!(matches!(result, Err(SpecError::TemplateInvalid(_))));
}

#[test]
fn corrupt_container_never_yields_a_document() {
    let mut bytes =
        generate_functional_spec(&FieldBundle::default(), &[], &[]).expect("compose");
    // First local entry payload: fixed header plus the part name.
    let offset = 30 + "[Content_Types].xml".len() + 2;
    bytes[offset] ^= 0xFF;
    assert!(SpecTemplate::from_bytes(bytes)
        .compose(&FieldBundle::default(), &[], &[])
        .is_err());
}

#[test]
fn output_reopens_as_a_wellformed_package() {
    let bytes = generate_functional_spec(&FieldBundle::default(), &[], &[]).expect("compose");
    let pkg = Package::from_bytes(&bytes).expect("reopen");
    assert_eq!(pkg.part_names().next(), Some("[Content_Types].xml"));
    assert!(pkg.part("word/styles.xml").is_some());
}
