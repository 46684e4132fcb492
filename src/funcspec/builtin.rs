//! Built-in specification template
//!
//! The document skeleton is authored here rather than shipped as a binary
//! asset: 51 body paragraphs and three checkbox tables, in the exact
//! order the section map in [`layout`](super::layout) addresses. Editing
//! this file and the map together is what "re-templating" means.

use crate::docx::ns;
use crate::package::Package;
use crate::xml::{self, XmlElement};

use super::Result;

struct CheckboxGrid {
    header: Option<[&'static str; 3]>,
    columns: [&'static [&'static str]; 3],
}

const PROCESS_GRID: CheckboxGrid = CheckboxGrid {
    header: Some(["Function", "Process Area", "Process Sub-Area"]),
    columns: [
        &[
            "Purchasing",
            "Sales",
            "Production",
            "Finance",
            "Quality Management",
            "Warehouse Logistics",
            "Plant Maintenance",
            "Human Resources",
            "Other",
        ],
        &[
            "Order Processing",
            "Invoice Verification",
            "Master Data",
            "Reporting",
            "Planning",
            "Goods Movement",
            "Customer Service",
            "Compliance",
            "Other",
        ],
        &[
            "Approval Workflow",
            "Output Management",
            "Data Migration",
            "Interfaces",
            "Forms",
            "Analytics",
            "Archiving",
            "Authorizations",
            "Other",
        ],
    ],
};

const USER_GRID: CheckboxGrid = CheckboxGrid {
    header: None,
    columns: [
        &["Business User", "External Partner", "Occasional User"],
        &["Key User", "Administrator", "Power User"],
        &["Manager", "Developer", "Other"],
    ],
};

const DEV_GRID: CheckboxGrid = CheckboxGrid {
    header: Some(["ERP", "SCM", "Cloud"]),
    columns: [
        &[
            "S/4HANA",
            "ECC 6.0",
            "Central Finance",
            "Fiori Apps",
            "Business Warehouse",
            "Other",
        ],
        &["IBP", "EWM", "TM", "APO", "Ariba", "Other"],
        &[
            "BTP",
            "SuccessFactors",
            "Concur",
            "Analytics Cloud",
            "Integration Suite",
            "Other",
        ],
    ],
};

/// Serialize the built-in skeleton to `.docx` bytes.
pub(super) fn template_bytes() -> Result<Vec<u8>> {
    let mut package = Package::new();
    package.set_part(
        "[Content_Types].xml",
        xml::serialize_document(&content_types())?,
    );
    package.set_part("_rels/.rels", xml::serialize_document(&root_rels())?);
    package.set_part("word/document.xml", xml::serialize_document(&document())?);
    package.set_part(
        "word/_rels/document.xml.rels",
        xml::serialize_document(&document_rels())?,
    );
    package.set_part("word/styles.xml", xml::serialize_document(&styles())?);
    Ok(package.to_bytes()?)
}

fn document() -> XmlElement {
    XmlElement::new("w:document")
        .with_attr("xmlns:w", ns::W)
        .with_attr("xmlns:w14", ns::W14)
        .with_attr("xmlns:r", ns::R_DOC)
        .with_attr("xmlns:wp", ns::WP)
        .with_attr("xmlns:a", ns::A)
        .with_attr("xmlns:pic", ns::PIC)
        .with_attr("xmlns:mc", ns::MC)
        .with_attr("mc:Ignorable", "w14")
        .with_child(body())
}

fn body() -> XmlElement {
    let mut body = XmlElement::new("w:body");

    // [0..=1] document title
    body.push_element(heading("Heading1", "Functional Specification"));
    body.push_element(spacer());

    // [2..=6] user story placeholders
    body.push_element(heading("Heading2", "User Story"));
    body.push_element(text_para("I as a ..."));
    body.push_element(text_para("want to ..."));
    body.push_element(text_para("to be able to ..."));
    body.push_element(spacer());

    // [7..=11] process selection around table 0
    body.push_element(heading("Heading2", "Process"));
    body.push_element(spacer());
    body.push_element(checkbox_table(&PROCESS_GRID));
    body.push_element(spacer());
    body.push_element(text_para(
        "If you did not find a suitable Function and Area, check Other and describe it below.",
    ));
    body.push_element(spacer());

    // [12..=16] user selection around table 1
    body.push_element(heading("Heading2", "User"));
    body.push_element(spacer());
    body.push_element(checkbox_table(&USER_GRID));
    body.push_element(spacer());
    body.push_element(text_para(
        "If you did not find a suitable User-Group, check Other and describe it below.",
    ));
    body.push_element(spacer());

    // [17..=22] problem prose section
    body.push_element(heading("Heading2", "Actual Problem what should be solved"));
    body.push_element(text_para(
        "Describe the Problem in a few sentences. Add screenshots if helpful.",
    ));
    push_spacers(&mut body, 4);

    // [23..=27] solution prose section
    body.push_element(heading("Heading2", "Solution Description"));
    body.push_element(text_para("Describe how could the solution look like."));
    push_spacers(&mut body, 3);

    // [28..=32] design part with table 2
    body.push_element(heading("Heading1", "Solution Design"));
    body.push_element(spacer());
    body.push_element(heading("Heading2", "Development System"));
    body.push_element(spacer());
    body.push_element(checkbox_table(&DEV_GRID));
    body.push_element(spacer());

    // [33..=41] technical details prose section
    body.push_element(heading("Heading2", "Technical Details"));
    body.push_element(text_para(
        "Describe all objects which will be created or changed.",
    ));
    push_spacers(&mut body, 7);

    // [42..=45] naming prose section
    body.push_element(heading("Heading2", "Names and Language"));
    body.push_element(text_para(
        "If you create new fields or reports, provide their names in English and German.",
    ));
    push_spacers(&mut body, 2);

    // [46..=50] authorization prose section
    body.push_element(heading("Heading2", "Authorization"));
    body.push_element(text_para(
        "Consider special authorization objects or roles which are needed.",
    ));
    push_spacers(&mut body, 3);

    body.push_element(section_properties());
    body
}

fn push_spacers(body: &mut XmlElement, count: usize) {
    for _ in 0..count {
        body.push_element(spacer());
    }
}

fn heading(style: &str, text: &str) -> XmlElement {
    XmlElement::new("w:p")
        .with_child(
            XmlElement::new("w:pPr")
                .with_child(XmlElement::new("w:pStyle").with_attr("w:val", style)),
        )
        .with_child(XmlElement::new("w:r").with_child(text_element(text)))
}

fn text_para(text: &str) -> XmlElement {
    XmlElement::new("w:p").with_child(XmlElement::new("w:r").with_child(text_element(text)))
}

fn text_element(text: &str) -> XmlElement {
    XmlElement::new("w:t")
        .with_attr("xml:space", "preserve")
        .with_text(text)
}

fn spacer() -> XmlElement {
    XmlElement::new("w:p")
}

fn checkbox_table(grid: &CheckboxGrid) -> XmlElement {
    let mut table = XmlElement::new("w:tbl")
        .with_child(
            XmlElement::new("w:tblPr")
                .with_child(XmlElement::new("w:tblStyle").with_attr("w:val", "TableGrid"))
                .with_child(
                    XmlElement::new("w:tblW")
                        .with_attr("w:w", "0")
                        .with_attr("w:type", "auto"),
                ),
        )
        .with_child(grid_columns());
    if let Some(header) = grid.header {
        let mut row = XmlElement::new("w:tr");
        for label in header {
            row.push_element(header_cell(label));
        }
        table.push_element(row);
    }
    for r in 0..grid.columns[0].len() {
        let mut row = XmlElement::new("w:tr");
        for column in &grid.columns {
            row.push_element(checkbox_cell(column[r]));
        }
        table.push_element(row);
    }
    table
}

fn grid_columns() -> XmlElement {
    let mut grid = XmlElement::new("w:tblGrid");
    for _ in 0..3 {
        grid.push_element(XmlElement::new("w:gridCol").with_attr("w:w", "3116"));
    }
    grid
}

fn cell_properties() -> XmlElement {
    XmlElement::new("w:tcPr").with_child(
        XmlElement::new("w:tcW")
            .with_attr("w:w", "3116")
            .with_attr("w:type", "dxa"),
    )
}

fn header_cell(label: &str) -> XmlElement {
    let run = XmlElement::new("w:r")
        .with_child(XmlElement::new("w:rPr").with_child(XmlElement::new("w:b")))
        .with_child(text_element(label));
    XmlElement::new("w:tc")
        .with_child(cell_properties())
        .with_child(XmlElement::new("w:p").with_child(run))
}

/// Data cell: a Word 2010 checkbox content control followed by the label
fn checkbox_cell(label: &str) -> XmlElement {
    let checkbox = XmlElement::new("w14:checkbox")
        .with_child(XmlElement::new("w14:checked").with_attr("w14:val", "0"))
        .with_child(
            XmlElement::new("w14:checkedState")
                .with_attr("w14:val", "2612")
                .with_attr("w14:font", "MS Gothic"),
        )
        .with_child(
            XmlElement::new("w14:uncheckedState")
                .with_attr("w14:val", "2610")
                .with_attr("w14:font", "MS Gothic"),
        );
    let sdt = XmlElement::new("w:sdt")
        .with_child(XmlElement::new("w:sdtPr").with_child(checkbox))
        .with_child(
            XmlElement::new("w:sdtContent").with_child(
                XmlElement::new("w:r")
                    .with_child(XmlElement::new("w:t").with_text("\u{2610}")),
            ),
        );
    let para = XmlElement::new("w:p").with_child(sdt).with_child(
        XmlElement::new("w:r").with_child(
            XmlElement::new("w:t")
                .with_attr("xml:space", "preserve")
                .with_text(&format!(" {label}")),
        ),
    );
    XmlElement::new("w:tc")
        .with_child(cell_properties())
        .with_child(para)
}

fn section_properties() -> XmlElement {
    // A4 portrait
    XmlElement::new("w:sectPr")
        .with_child(
            XmlElement::new("w:pgSz")
                .with_attr("w:w", "11906")
                .with_attr("w:h", "16838"),
        )
        .with_child(
            XmlElement::new("w:pgMar")
                .with_attr("w:top", "1417")
                .with_attr("w:right", "1417")
                .with_attr("w:bottom", "1134")
                .with_attr("w:left", "1417")
                .with_attr("w:header", "708")
                .with_attr("w:footer", "708")
                .with_attr("w:gutter", "0"),
        )
}

fn styles() -> XmlElement {
    let defaults = XmlElement::new("w:docDefaults").with_child(
        XmlElement::new("w:rPrDefault").with_child(
            XmlElement::new("w:rPr")
                .with_child(
                    XmlElement::new("w:rFonts")
                        .with_attr("w:ascii", "Calibri")
                        .with_attr("w:hAnsi", "Calibri"),
                )
                .with_child(XmlElement::new("w:sz").with_attr("w:val", "22")),
        ),
    );
    let normal = XmlElement::new("w:style")
        .with_attr("w:type", "paragraph")
        .with_attr("w:default", "1")
        .with_attr("w:styleId", "Normal")
        .with_child(XmlElement::new("w:name").with_attr("w:val", "Normal"));
    XmlElement::new("w:styles")
        .with_attr("xmlns:w", ns::W)
        .with_child(defaults)
        .with_child(normal)
        .with_child(heading_style("Heading1", "heading 1", "0", "32"))
        .with_child(heading_style("Heading2", "heading 2", "1", "26"))
}

fn heading_style(id: &str, name: &str, outline_level: &str, half_points: &str) -> XmlElement {
    XmlElement::new("w:style")
        .with_attr("w:type", "paragraph")
        .with_attr("w:styleId", id)
        .with_child(XmlElement::new("w:name").with_attr("w:val", name))
        .with_child(XmlElement::new("w:basedOn").with_attr("w:val", "Normal"))
        .with_child(
            XmlElement::new("w:pPr")
                .with_child(
                    XmlElement::new("w:spacing")
                        .with_attr("w:before", "240")
                        .with_attr("w:after", "120"),
                )
                .with_child(
                    XmlElement::new("w:outlineLvl").with_attr("w:val", outline_level),
                ),
        )
        .with_child(
            XmlElement::new("w:rPr")
                .with_child(XmlElement::new("w:b"))
                .with_child(XmlElement::new("w:sz").with_attr("w:val", half_points))
                .with_child(XmlElement::new("w:color").with_attr("w:val", "0F172A")),
        )
}

fn content_types() -> XmlElement {
    XmlElement::new("Types")
        .with_attr("xmlns", ns::CONTENT_TYPES)
        .with_child(
            XmlElement::new("Default")
                .with_attr("Extension", "rels")
                .with_attr(
                    "ContentType",
                    "application/vnd.openxmlformats-package.relationships+xml",
                ),
        )
        .with_child(
            XmlElement::new("Default")
                .with_attr("Extension", "xml")
                .with_attr("ContentType", "application/xml"),
        )
        .with_child(
            XmlElement::new("Override")
                .with_attr("PartName", "/word/document.xml")
                .with_attr(
                    "ContentType",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
                ),
        )
        .with_child(
            XmlElement::new("Override")
                .with_attr("PartName", "/word/styles.xml")
                .with_attr(
                    "ContentType",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
                ),
        )
}

fn root_rels() -> XmlElement {
    XmlElement::new("Relationships")
        .with_attr("xmlns", ns::PKG_RELS)
        .with_child(
            XmlElement::new("Relationship")
                .with_attr("Id", "rId1")
                .with_attr("Type", ns::REL_OFFICE_DOCUMENT)
                .with_attr("Target", "word/document.xml"),
        )
}

fn document_rels() -> XmlElement {
    XmlElement::new("Relationships")
        .with_attr("xmlns", ns::PKG_RELS)
        .with_child(
            XmlElement::new("Relationship")
                .with_attr("Id", "rId1")
                .with_attr("Type", ns::REL_STYLES)
                .with_attr("Target", "styles.xml"),
        )
}
