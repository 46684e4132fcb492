//! Section map: every positional index the compositor touches, in one
//! place. Re-templating means updating this table, nothing else.

use crate::docx::{column_count, data_row_count, BodyEditor};

use super::{Result, SpecError};

/// One prose section: heading, instruction paragraph, reserved content
/// slot range (inclusive)
#[derive(Debug, Clone, Copy)]
pub struct ProseSection {
    pub heading: usize,
    pub instruction: usize,
    pub content: (usize, usize),
}

/// Expected position and shape of one checkbox table
#[derive(Debug, Clone, Copy)]
pub struct TableShape {
    pub index: usize,
    pub rows: usize,
    pub columns: usize,
    pub header_row: bool,
}

/// Paragraph and table indices of the specification template, numbered
/// over body-level paragraphs only (table-internal paragraphs do not
/// count).
#[derive(Debug, Clone)]
pub struct TemplateLayout {
    pub paragraph_count: usize,
    pub story_role: usize,
    pub story_want: usize,
    pub story_ability: usize,
    pub process_table: TableShape,
    pub process_hint: usize,
    pub process_other: usize,
    pub user_table: TableShape,
    pub user_hint: usize,
    pub user_other: usize,
    pub problem: ProseSection,
    pub solution: ProseSection,
    pub dev_table: TableShape,
    pub dev_other: usize,
    pub technical: ProseSection,
    pub naming: ProseSection,
    pub authorization: ProseSection,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            paragraph_count: 51,
            story_role: 3,
            story_want: 4,
            story_ability: 5,
            process_table: TableShape {
                index: 0,
                rows: 10,
                columns: 3,
                header_row: true,
            },
            process_hint: 10,
            process_other: 11,
            user_table: TableShape {
                index: 1,
                rows: 3,
                columns: 3,
                header_row: false,
            },
            user_hint: 15,
            user_other: 16,
            problem: ProseSection {
                heading: 17,
                instruction: 18,
                content: (19, 22),
            },
            solution: ProseSection {
                heading: 23,
                instruction: 24,
                content: (25, 27),
            },
            dev_table: TableShape {
                index: 2,
                rows: 7,
                columns: 3,
                header_row: true,
            },
            dev_other: 32,
            technical: ProseSection {
                heading: 33,
                instruction: 34,
                content: (35, 41),
            },
            naming: ProseSection {
                heading: 42,
                instruction: 43,
                content: (44, 45),
            },
            authorization: ProseSection {
                heading: 46,
                instruction: 47,
                content: (48, 50),
            },
        }
    }
}

impl TemplateLayout {
    /// Check the parsed template against this map. Index arithmetic
    /// downstream relies on these counts, so any mismatch is fatal.
    pub fn validate(&self, editor: &BodyEditor) -> Result<()> {
        if editor.paragraph_count() != self.paragraph_count {
            return Err(SpecError::TemplateInvalid(format!(
                "expected {} body paragraphs, found {}",
                self.paragraph_count,
                editor.paragraph_count()
            )));
        }
        for shape in [&self.process_table, &self.user_table, &self.dev_table] {
            let table = editor.table(shape.index).ok_or_else(|| {
                SpecError::TemplateInvalid(format!("table {} is missing", shape.index))
            })?;
            let rows = data_row_count(table);
            let columns = column_count(table);
            if rows != shape.rows || columns != shape.columns {
                return Err(SpecError::TemplateInvalid(format!(
                    "table {} is {rows}x{columns}, expected {}x{}",
                    shape.index, shape.rows, shape.columns
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_self_consistent() {
        let layout = TemplateLayout::default();
        let sections = [
            layout.problem,
            layout.solution,
            layout.technical,
            layout.naming,
            layout.authorization,
        ];
        for section in sections {
            assert!(section.heading < section.instruction);
            assert!(section.instruction < section.content.0);
            assert!(section.content.0 <= section.content.1);
            assert!(section.content.1 < layout.paragraph_count);
        }
        assert!(layout.process_hint < layout.process_other);
        assert!(layout.user_hint < layout.user_other);
        assert!(layout.dev_other < layout.paragraph_count);
    }

    #[test]
    fn validation_rejects_wrong_paragraph_count() {
        let editor = BodyEditor::new(Vec::new());
        let err = TemplateLayout::default().validate(&editor);
        assert!(matches!(err, Err(SpecError::TemplateInvalid(_))));
    }
}
