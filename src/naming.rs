//! Download filename hygiene.
//!
//! Generated files are served as attachments, so their names come from
//! user-entered text. The stem keeps only characters that are safe in a
//! `Content-Disposition` header and on every filesystem we care about.

/// Reduce free text to a filename stem: alphanumerics, underscores and
/// hyphens survive, spaces become underscores, everything else is
/// dropped. May return an empty string.
pub fn sanitize_stem(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | ' ' | '-'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Download name for a functional specification document. The stem is
/// the user story role, the piece of the bundle that names the audience.
pub fn spec_download_name(role: &str) -> String {
    let stem = sanitize_stem(role);
    let stem = if stem.is_empty() {
        "Functional_Spec"
    } else {
        stem.as_str()
    };
    format!("{stem}_Functional_Specification.docx")
}

/// Download name for a generated deck, from the deck title.
pub fn deck_download_name(title: &str) -> String {
    let stem = sanitize_stem(title);
    let stem = if stem.is_empty() {
        "Presentation"
    } else {
        stem.as_str()
    };
    format!("{stem}.pptx")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_word_characters_and_joins_with_underscores() {
        assert_eq!(sanitize_stem("SAP/4 Admin!"), "SAP4_Admin");
        assert_eq!(sanitize_stem("re-use_me"), "re-use_me");
    }

    #[test]
    fn unicode_letters_survive() {
        assert_eq!(sanitize_stem("Überblick 2025"), "Überblick_2025");
    }

    #[test]
    fn dropped_characters_leave_no_residue_but_spaces_do() {
        // The colon vanishes outright; "& " leaves a doubled underscore.
        assert_eq!(
            deck_download_name("Q3 Review: Growth & Risks"),
            "Q3_Review_Growth__Risks.pptx"
        );
    }

    #[test]
    fn spec_name_appends_the_fixed_suffix() {
        assert_eq!(
            spec_download_name("planner"),
            "planner_Functional_Specification.docx"
        );
    }

    #[test]
    fn empty_stems_fall_back() {
        assert_eq!(
            spec_download_name("!!!"),
            "Functional_Spec_Functional_Specification.docx"
        );
        assert_eq!(deck_download_name(""), "Presentation.pptx");
    }
}
