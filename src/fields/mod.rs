mod lookup;
mod overall_design;
mod title_page;
mod vocabulary;
#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::config::ExtractionProfile;
use crate::structure::Document;

pub use lookup::{
    find_section, section_by_number, section_by_title_contains, section_text_or, table_row_value,
};
pub use overall_design::{OVERALL_DESIGN_NUMBER, OVERALL_DESIGN_TITLE, OverallDesign};
pub use title_page::{TitlePage, split_name_and_address};
pub use vocabulary::{
    Code, CodeTable, NO, NOT_APPLICABLE, TRIAL_PHASE, YES, YES_NO, decode_trial_phase,
    decode_yes_no,
};

pub const DEFAULT_SECTION_TEXT: &str = "Not available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolRecord {
    pub title_page: TitlePage,
    pub overall_design: OverallDesign,
}

pub fn extract_record(document: &Document, profile: &ExtractionProfile) -> ProtocolRecord {
    ProtocolRecord {
        title_page: TitlePage::extract(document, profile),
        overall_design: OverallDesign::extract(document, DEFAULT_SECTION_TEXT),
    }
}
