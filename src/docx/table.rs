//! Label-matched checkbox toggling over tables
//!
//! Matching is by cell label, never by row position, so template rows can
//! be reordered freely. Two modes: column-scoped, for tables where the
//! same label (typically "Other") recurs in several columns, and flat,
//! where one selection set applies to every data cell. A selected label
//! that matches no cell is skipped silently; upstream owns value
//! validation.

use std::collections::BTreeSet;

use log::debug;

use crate::xml::XmlElement;

use super::checkbox::{cell_label, CheckboxControl};

/// Check cells column by column. `selections` pairs a zero-based column
/// index with the labels selected for that column; `skip_header` leaves
/// the first row alone. Returns how many cells were checked.
pub fn toggle_columns(
    table: &mut XmlElement,
    selections: &[(usize, &[String])],
    skip_header: bool,
) -> usize {
    let start = usize::from(skip_header);
    let mut checked = 0;
    for &(column, labels) in selections {
        let wanted = normalize(labels);
        if wanted.is_empty() {
            continue;
        }
        let mut matched = BTreeSet::new();
        for row in data_rows_mut(table).skip(start) {
            if let Some(cell) = cells_mut(row).nth(column) {
                let label = cell_label(cell);
                if !label.is_empty() && wanted.contains(&label.to_lowercase()) {
                    matched.insert(label.to_lowercase());
                    CheckboxControl::new(cell).set_checked(true);
                    checked += 1;
                }
            }
        }
        for miss in wanted.difference(&matched) {
            debug!("no cell in column {column} matches selected label {miss:?}");
        }
    }
    checked
}

/// Check every data cell whose label is in `labels`, in any column.
/// Returns how many cells were checked.
pub fn toggle_flat(table: &mut XmlElement, labels: &[String], skip_header: bool) -> usize {
    let start = usize::from(skip_header);
    let wanted = normalize(labels);
    if wanted.is_empty() {
        return 0;
    }
    let mut matched = BTreeSet::new();
    let mut checked = 0;
    for row in data_rows_mut(table).skip(start) {
        for cell in cells_mut(row) {
            let label = cell_label(cell);
            if !label.is_empty() && wanted.contains(&label.to_lowercase()) {
                matched.insert(label.to_lowercase());
                CheckboxControl::new(cell).set_checked(true);
                checked += 1;
            }
        }
    }
    for miss in wanted.difference(&matched) {
        debug!("no cell matches selected label {miss:?}");
    }
    checked
}

/// Number of rows in the table
pub fn data_row_count(table: &XmlElement) -> usize {
    table.elements().filter(|el| el.name == "w:tr").count()
}

/// Number of cells in the first row; cell merges are not resolved, the
/// template is authored without them
pub fn column_count(table: &XmlElement) -> usize {
    table
        .elements()
        .find(|el| el.name == "w:tr")
        .map_or(0, |row| {
            row.elements().filter(|el| el.name == "w:tc").count()
        })
}

fn normalize(labels: &[String]) -> BTreeSet<String> {
    labels
        .iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

fn data_rows_mut(table: &mut XmlElement) -> impl Iterator<Item = &mut XmlElement> {
    table.elements_mut().filter(|el| el.name == "w:tr")
}

fn cells_mut(row: &mut XmlElement) -> impl Iterator<Item = &mut XmlElement> {
    row.elements_mut().filter(|el| el.name == "w:tc")
}

#[cfg(test)]
mod tests {
    use super::super::checkbox::test_cell;
    use super::*;

    fn row(cells: Vec<XmlElement>) -> XmlElement {
        let mut tr = XmlElement::new("w:tr");
        for cell in cells {
            tr.push_element(cell);
        }
        tr
    }

    fn header_row(labels: &[&str]) -> XmlElement {
        row(labels
            .iter()
            .map(|&l| {
                XmlElement::new("w:tc").with_child(
                    XmlElement::new("w:p").with_child(
                        XmlElement::new("w:r")
                            .with_child(XmlElement::new("w:t").with_text(l)),
                    ),
                )
            })
            .collect())
    }

    /// Two data columns that both end in an "Other" cell
    fn two_column_table() -> XmlElement {
        XmlElement::new("w:tbl")
            .with_child(header_row(&["Function", "Area"]))
            .with_child(row(vec![
                test_cell("Finance", false),
                test_cell("Reporting", false),
            ]))
            .with_child(row(vec![
                test_cell("Other", false),
                test_cell("Other", false),
            ]))
    }

    fn checked_labels(table: &XmlElement) -> Vec<(usize, usize, String)> {
        let mut out = Vec::new();
        for (r, tr) in table
            .elements()
            .filter(|el| el.name == "w:tr")
            .enumerate()
        {
            for (c, tc) in tr.elements().filter(|el| el.name == "w:tc").enumerate() {
                let mut checked = false;
                tc.visit_named("w14:checked", &mut |el| {
                    if el.attr("w14:val") == Some("1") {
                        checked = true;
                    }
                });
                if checked {
                    out.push((r, c, cell_label(tc)));
                }
            }
        }
        out
    }

    #[test]
    fn column_scoping_keeps_other_labels_apart() {
        let mut table = two_column_table();
        let left = vec!["Other".to_string()];
        let count = toggle_columns(&mut table, &[(0, &left)], true);
        assert_eq!(count, 1);
        assert_eq!(
            checked_labels(&table),
            vec![(2, 0, "Other".to_string())],
            "only the first column's Other may be checked"
        );
    }

    #[test]
    fn different_sets_per_column_toggle_independently() {
        let mut table = two_column_table();
        let left = vec!["finance".to_string()];
        let right = vec!["Other".to_string(), "Reporting".to_string()];
        let count = toggle_columns(&mut table, &[(0, &left), (1, &right)], true);
        assert_eq!(count, 3);
        let hits = checked_labels(&table);
        assert!(hits.contains(&(1, 0, "Finance".to_string())));
        assert!(hits.contains(&(1, 1, "Reporting".to_string())));
        assert!(hits.contains(&(2, 1, "Other".to_string())));
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let mut table = two_column_table();
        let labels = vec!["  FINANCE  ".to_string()];
        assert_eq!(toggle_columns(&mut table, &[(0, &labels)], true), 1);
    }

    #[test]
    fn flat_matching_spans_all_columns() {
        let mut table = two_column_table();
        let labels = vec!["Other".to_string()];
        let count = toggle_flat(&mut table, &labels, true);
        assert_eq!(count, 2, "flat mode checks Other in both columns");
    }

    #[test]
    fn header_row_is_skipped_when_flagged() {
        let mut table = XmlElement::new("w:tbl")
            .with_child(row(vec![test_cell("Finance", false)]))
            .with_child(row(vec![test_cell("Finance", false)]));
        let labels = vec!["Finance".to_string()];
        assert_eq!(toggle_flat(&mut table, &labels, true), 1);
        assert_eq!(checked_labels(&table), vec![(1, 0, "Finance".to_string())]);
    }

    #[test]
    fn unmatched_selection_is_ignored() {
        let mut table = two_column_table();
        let labels = vec!["No Such Label".to_string()];
        assert_eq!(toggle_columns(&mut table, &[(0, &labels)], true), 0);
    }

    #[test]
    fn empty_selection_touches_nothing() {
        let mut table = two_column_table();
        let before = table.clone();
        toggle_columns(&mut table, &[(0, &[])], true);
        toggle_flat(&mut table, &[], true);
        assert_eq!(table, before);
    }

    #[test]
    fn toggling_twice_equals_toggling_once() {
        let mut once = two_column_table();
        let labels = vec!["Finance".to_string()];
        toggle_columns(&mut once, &[(0, &labels)], true);
        let mut twice = two_column_table();
        toggle_columns(&mut twice, &[(0, &labels)], true);
        toggle_columns(&mut twice, &[(0, &labels)], true);
        assert_eq!(once, twice);
    }

    #[test]
    fn shape_helpers_report_rows_and_columns() {
        let table = two_column_table();
        assert_eq!(data_row_count(&table), 3);
        assert_eq!(column_count(&table), 2);
    }
}
