//! The composition pass: one linear walk over the template, in the order
//! the sections appear in the document.

use log::debug;

use crate::docx::{
    set_para_text, splice_images, toggle_columns, toggle_flat, BodyEditor, ImageAttachment,
    WordDocument,
};

use super::{FieldBundle, ProseSection, TemplateLayout};

const OTHER_SEPARATOR: &str = "  |  ";

pub(super) fn apply(
    doc: &mut WordDocument,
    editor: &mut BodyEditor,
    layout: &TemplateLayout,
    bundle: &FieldBundle,
    problem_images: &[ImageAttachment],
    solution_images: &[ImageAttachment],
) {
    // User story
    fill_or_remove(editor, layout.story_role, &prefixed("I as a ", &bundle.user_story.role));
    fill_or_remove(editor, layout.story_want, &prefixed("want to ", &bundle.user_story.want));
    fill_or_remove(
        editor,
        layout.story_ability,
        &prefixed("to be able to ", &bundle.user_story.ability),
    );

    // Process table; "Other" recurs per column, so scoping is required
    if let Some(table) = editor.table_mut(layout.process_table.index) {
        toggle_columns(
            table,
            &[
                (0, &bundle.process.function.selected),
                (1, &bundle.process.process_area.selected),
                (2, &bundle.process.process_sub_area.selected),
            ],
            layout.process_table.header_row,
        );
    }
    editor.remove_paragraph(layout.process_hint);
    let process_parts = collect_parts(&[
        ("Function Other: ", &bundle.process.function.other),
        ("Area Other: ", &bundle.process.process_area.other),
        ("", &bundle.process.describe_below),
    ]);
    fill_or_remove(editor, layout.process_other, &join_other(&process_parts));

    // User table; labels are unique here, flat matching suffices
    if let Some(table) = editor.table_mut(layout.user_table.index) {
        toggle_flat(table, &bundle.user.selected, layout.user_table.header_row);
    }
    editor.remove_paragraph(layout.user_hint);
    let user_parts = collect_parts(&[
        ("", &bundle.user.other),
        ("", &bundle.user.describe_below),
    ]);
    fill_or_remove(editor, layout.user_other, &join_other(&user_parts));

    // Problem prose and its screenshots
    prune_section(editor, &layout.problem, bundle.problem_description.trim());
    splice_section_images(doc, editor, &layout.problem, problem_images);

    // Solution prose and its screenshots
    prune_section(editor, &layout.solution, bundle.solution_description.trim());
    splice_section_images(doc, editor, &layout.solution, solution_images);

    // Development system table
    if let Some(table) = editor.table_mut(layout.dev_table.index) {
        toggle_columns(
            table,
            &[
                (0, &bundle.development_system.erp.selected),
                (1, &bundle.development_system.scm.selected),
                (2, &bundle.development_system.cloud.selected),
            ],
            layout.dev_table.header_row,
        );
    }
    let dev_parts = collect_parts(&[
        ("ERP: ", &bundle.development_system.erp.other),
        ("SCM: ", &bundle.development_system.scm.other),
        ("Cloud: ", &bundle.development_system.cloud.other),
    ]);
    fill_or_remove(editor, layout.dev_other, &join_other(&dev_parts));

    // Remaining prose sections
    prune_section(editor, &layout.technical, bundle.technical_details.trim());
    prune_section(editor, &layout.naming, bundle.names_and_language.trim());
    prune_section(editor, &layout.authorization, bundle.authorization.trim());
}

/// Write text into the paragraph, or tombstone it when the text is empty
fn fill_or_remove(editor: &mut BodyEditor, index: usize, text: &str) {
    if text.is_empty() {
        editor.remove_paragraph(index);
    } else if let Some(para) = editor.paragraph_mut(index) {
        set_para_text(para, text);
    }
}

/// Prefix a value unless it is blank
fn prefixed(prefix: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{prefix}{value}")
    }
}

fn collect_parts(fields: &[(&str, &str)]) -> Vec<String> {
    fields
        .iter()
        .map(|&(prefix, value)| prefixed(prefix, value))
        .filter(|part| !part.is_empty())
        .collect()
}

/// The "Other" slot text: `Other: ` plus the parts joined with the fixed
/// display separator. Opaque display text; nothing parses it back.
fn join_other(parts: &[String]) -> String {
    if parts.is_empty() {
        String::new()
    } else {
        format!("Other: {}", parts.join(OTHER_SEPARATOR))
    }
}

/// The instruction paragraph always goes. Non-empty text lands in the
/// first content slot and the spare slots go; empty text collapses the
/// whole content block to just the heading.
fn prune_section(editor: &mut BodyEditor, section: &ProseSection, text: &str) {
    editor.remove_paragraph(section.instruction);
    let (first, last) = section.content;
    if text.is_empty() {
        debug!("no text for section at paragraph {}, collapsing", section.heading);
        for index in first..=last {
            editor.remove_paragraph(index);
        }
    } else {
        fill_or_remove(editor, first, text);
        for index in first + 1..=last {
            editor.remove_paragraph(index);
        }
    }
}

/// Images go right after the section's first content slot; the slot keeps
/// its position even when the section collapsed.
fn splice_section_images(
    doc: &mut WordDocument,
    editor: &mut BodyEditor,
    section: &ProseSection,
    images: &[ImageAttachment],
) {
    if images.is_empty() {
        return;
    }
    if let Some(mut anchor) = editor.anchor_after_paragraph(section.content.0) {
        splice_images(doc, editor, &mut anchor, images);
    }
}
