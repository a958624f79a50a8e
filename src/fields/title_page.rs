use serde::Serialize;
use tracing::info;

use super::lookup::table_row_value;
use super::vocabulary::{Code, decode_trial_phase, decode_yes_no};
use crate::config::ExtractionProfile;
use crate::structure::{Document, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitlePage {
    pub sponsor_confidentiality: String,
    pub full_title: String,
    pub acronym: String,
    pub sponsor_protocol_identifier: String,
    pub original_protocol: Option<Code>,
    pub version_number: String,
    pub version_date: String,
    pub amendment_identifier: String,
    pub amendment_scope: String,
    pub compound_codes: Vec<String>,
    pub compound_names: Vec<String>,
    pub trial_phase_text: String,
    pub trial_phase: Code,
    pub short_title: String,
    pub sponsor_name: String,
    pub sponsor_address: String,
    pub regulatory_agency_identifiers: Vec<String>,
    pub sponsor_approval_date: String,
}

impl TitlePage {
    pub fn extract(document: &Document, profile: &ExtractionProfile) -> Self {
        let table = locate_table(document, &profile.title_page_anchor);
        let value = |label: &str| {
            table
                .map(|table| table_row_value(table, label))
                .unwrap_or_default()
        };

        let trial_phase_text = value("Trial Phase");
        let (sponsor_name, sponsor_address) = split_name_and_address(
            &value("Sponsor Name and Address"),
            &profile.address_delimiter,
            &profile.address_placeholder,
        );

        Self {
            sponsor_confidentiality: value("Sponsor Confidentiality Statement"),
            full_title: value("Full Title"),
            acronym: value("Acronym"),
            sponsor_protocol_identifier: value("Sponsor Protocol Identifier"),
            original_protocol: decode_yes_no(&value("Original Protocol")),
            version_number: value("Version Number"),
            version_date: value("Version Date"),
            amendment_identifier: value("Amendment Identifier"),
            amendment_scope: value("Amendment Scope"),
            compound_codes: split_list(&value("Compound Code")),
            compound_names: split_list(&value("Compound Name")),
            trial_phase: decode_trial_phase(&trial_phase_text),
            trial_phase_text,
            short_title: value("Short Title"),
            sponsor_name,
            sponsor_address,
            regulatory_agency_identifiers: split_list(&value("Regulatory Agency Identifier")),
            sponsor_approval_date: value("Sponsor Approval"),
        }
    }
}

fn locate_table<'a>(document: &'a Document, anchor: &str) -> Option<&'a Table> {
    let table = document
        .tables()
        .find(|table| table.find_row(anchor).is_some())
        .or_else(|| document.tables().next());
    if table.is_none() {
        info!(anchor, "document has no title page table");
    }
    table
}

pub fn split_name_and_address(raw: &str, delimiter: &str, placeholder: &str) -> (String, String) {
    let lines = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>();

    match lines.split_first() {
        Some((name, rest)) if !rest.is_empty() => (name.to_string(), rest.join(delimiter)),
        Some((name, _)) => (name.to_string(), placeholder.to_string()),
        None => (String::new(), placeholder.to_string()),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(['\n', ';', ','])
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
