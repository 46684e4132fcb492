//! Field bundle: the structured input filled into the specification
//! template. Wire names are camelCase; every field defaults when absent,
//! so a sparse bundle prunes sections instead of failing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldBundle {
    pub user_story: UserStory,
    pub process: ProcessSection,
    pub user: UserSection,
    pub problem_description: String,
    pub solution_description: String,
    pub development_system: DevelopmentSystem,
    pub technical_details: String,
    pub names_and_language: String,
    pub authorization: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserStory {
    pub role: String,
    pub want: String,
    pub ability: String,
}

/// Selected labels for one checkbox column plus its free-text override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnSelection {
    pub selected: Vec<String>,
    pub other: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessSection {
    pub function: ColumnSelection,
    pub process_area: ColumnSelection,
    pub process_sub_area: ColumnSelection,
    pub describe_below: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSection {
    pub selected: Vec<String>,
    pub other: String,
    pub describe_below: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DevelopmentSystem {
    pub erp: ColumnSelection,
    pub scm: ColumnSelection,
    pub cloud: ColumnSelection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_json_fills_defaults() {
        let bundle: FieldBundle =
            serde_json::from_str(r#"{"problemDescription": "slow reports"}"#)
                .expect("parse");
        assert_eq!(bundle.problem_description, "slow reports");
        assert!(bundle.user_story.role.is_empty());
        assert!(bundle.process.function.selected.is_empty());
    }

    #[test]
    fn camel_case_nested_fields_deserialize() {
        let bundle: FieldBundle = serde_json::from_str(
            r#"{
                "userStory": {"role": "planner", "want": "automate", "ability": "save time"},
                "process": {
                    "function": {"selected": ["Finance"], "other": "Treasury"},
                    "processArea": {"selected": ["Reporting"]},
                    "describeBelow": "monthly close"
                },
                "developmentSystem": {"erp": {"selected": ["S/4HANA"]}}
            }"#,
        )
        .expect("parse");
        assert_eq!(bundle.user_story.role, "planner");
        assert_eq!(bundle.process.function.other, "Treasury");
        assert_eq!(bundle.process.process_area.selected, ["Reporting"]);
        assert_eq!(bundle.process.describe_below, "monthly close");
        assert_eq!(bundle.development_system.erp.selected, ["S/4HANA"]);
    }

    #[test]
    fn empty_object_is_a_valid_bundle() {
        let bundle: FieldBundle = serde_json::from_str("{}").expect("parse");
        assert_eq!(bundle, FieldBundle::default());
    }
}
