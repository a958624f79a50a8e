use serde::Serialize;

use super::lookup::{find_section, section_text_or, table_row_value};
use crate::structure::Document;

pub const OVERALL_DESIGN_NUMBER: &str = "1.1.2";
pub const OVERALL_DESIGN_TITLE: &str = "Overall Design";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverallDesign {
    pub intervention_model: String,
    pub population_type: String,
    pub population_diagnosis: String,
    pub population_age: String,
    pub site_distribution: String,
    pub number_of_arms: String,
    pub blind_schema: String,
    pub blinded_roles: String,
    pub number_of_participants: String,
    pub duration: String,
    pub committees: String,
    pub text: String,
}

impl OverallDesign {
    pub fn extract(document: &Document, default_text: &str) -> Self {
        let number = Some(OVERALL_DESIGN_NUMBER);
        let title = Some(OVERALL_DESIGN_TITLE);
        let text = section_text_or(document, number, title, default_text);

        let Some(table) =
            find_section(document, number, title).and_then(|section| section.tables().next())
        else {
            return Self {
                text,
                ..Self::default()
            };
        };
        let value = |label: &str| table_row_value(table, label);

        Self {
            intervention_model: value("Intervention Model"),
            population_type: value("Population Type"),
            population_diagnosis: value("Population Diagnosis or Condition"),
            population_age: value("Population Age"),
            site_distribution: value("Site Distribution"),
            number_of_arms: value("Number of Arms"),
            blind_schema: value("Trial Blind Schema"),
            blinded_roles: value("Blinded Roles"),
            number_of_participants: value("Number of Participants"),
            duration: value("Duration"),
            committees: value("Committees"),
            text,
        }
    }
}
