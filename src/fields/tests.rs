use super::*;
use crate::docx::{
    GridCoordinates, ImageRelationships, RawBlock, RawCell, RawParagraph, RawRow, RawTable,
};
use crate::structure::{Table, assemble};

fn heading(level: u32, text: &str) -> RawBlock {
    RawBlock::Paragraph(RawParagraph::styled(&format!("Heading {level}"), text))
}

fn para(text: &str) -> RawBlock {
    RawBlock::Paragraph(RawParagraph::styled("Normal", text))
}

fn cell(row: usize, column: usize, lines: &[&str]) -> RawCell {
    RawCell {
        row,
        coordinates: GridCoordinates {
            top: row,
            left: column,
            right: column + 1,
            bottom: Some(row + 1),
        },
        blocks: lines.iter().map(|line| para(line)).collect(),
    }
}

fn label_value_table(rows: &[(&str, &[&str])]) -> RawBlock {
    RawBlock::Table(RawTable {
        rows: rows
            .iter()
            .enumerate()
            .map(|(index, &(label, value))| RawRow {
                cells: vec![cell(index, 0, &[label]), cell(index, 1, value)],
            })
            .collect(),
        anomalies: Vec::new(),
    })
}

fn document(blocks: Vec<RawBlock>) -> Document {
    assemble(
        blocks,
        &ImageRelationships::default(),
        &ExtractionProfile::default(),
    )
    .expect("document assembles")
}

fn first_table(document: &Document) -> &Table {
    document.tables().next().expect("table")
}

#[test]
fn trial_phase_row_decodes_to_phase_two() {
    let doc = document(vec![label_value_table(&[("Trial Phase", &["  Phase II Trial "])])]);
    let raw = table_row_value(first_table(&doc), "trial phase");

    assert_eq!(raw, "Phase II Trial");
    assert_eq!(decode_trial_phase(&raw).code, "C15601");
}

#[test]
fn unknown_trial_phase_falls_back_to_not_applicable() {
    assert_eq!(decode_trial_phase("Not A Real Phase"), NOT_APPLICABLE);
    assert_eq!(decode_trial_phase(""), NOT_APPLICABLE);
    assert_eq!(decode_trial_phase("Not Applicable").code, "C48660");
}

#[test]
fn trial_phase_table_prefers_combined_and_lettered_phases() {
    let cases = [
        ("Phase I/II", "C15693"),
        ("phase 2 / 3", "C15694"),
        ("Phase IIa", "C49686"),
        ("PHASE 2B", "C49688"),
        ("Phase IIIb Study", "C49689"),
        ("Phase 1", "C15600"),
        ("Phase III", "C15602"),
        ("Phase IV", "C15603"),
        ("Phase 0", "C54721"),
    ];

    for (raw, code) in cases {
        assert_eq!(decode_trial_phase(raw).code, code, "input {raw}");
    }
    assert_eq!(TRIAL_PHASE.normalize("Phase  I - II trial"), "I-II");
}

#[test]
fn yes_no_decoding_is_optional() {
    assert_eq!(decode_yes_no(" yes "), Some(YES));
    assert_eq!(decode_yes_no("No"), Some(NO));
    assert_eq!(decode_yes_no("maybe"), None);
    assert_eq!(decode_yes_no(""), None);
}

#[test]
fn name_and_address_split_on_lines() {
    assert_eq!(
        split_name_and_address("Acme Pharma\n1 Main Street\n\nBoston, MA", "|", "none"),
        ("Acme Pharma".to_string(), "1 Main Street|Boston, MA".to_string())
    );
    assert_eq!(
        split_name_and_address("Acme Pharma", "|", "Address not provided"),
        ("Acme Pharma".to_string(), "Address not provided".to_string())
    );
    assert_eq!(
        split_name_and_address("   ", "|", "Address not provided"),
        (String::new(), "Address not provided".to_string())
    );
}

#[test]
fn row_value_misses_return_empty_strings() {
    let doc = document(vec![RawBlock::Table(RawTable {
        rows: vec![
            RawRow {
                cells: vec![cell(0, 0, &["Version Number"]), cell(0, 1, &["2.0"])],
            },
            RawRow {
                cells: vec![cell(1, 0, &["Version Date"])],
            },
        ],
        anomalies: Vec::new(),
    })]);
    let table = first_table(&doc);

    assert_eq!(table_row_value(table, "Version Number"), "2.0");
    assert_eq!(table_row_value(table, "Version Date"), "");
    assert_eq!(table_row_value(table, "Amendment Scope"), "");
}

#[test]
fn section_lookup_falls_back_from_number_to_title_to_default() {
    let doc = document(vec![
        heading(1, "Protocol Summary"),
        heading(2, "Synopsis"),
        heading(3, "Overall Design"),
        para("Randomized, parallel group."),
    ]);

    assert!(section_by_number(&doc, "1.1.2").is_none());
    let section = find_section(&doc, Some("1.1.2"), Some("overall design")).expect("title match");
    assert_eq!(section.number.as_deref(), Some("1.1.1"));
    assert_eq!(
        section_text_or(&doc, Some("1.1.2"), Some("Overall Design"), "missing"),
        "<p>Randomized, parallel group.</p>"
    );

    let empty = document(vec![heading(1, "Introduction")]);
    assert_eq!(
        section_text_or(&empty, Some("1.1.2"), Some("Overall Design"), "  verbatim default "),
        "  verbatim default "
    );
    assert_eq!(
        section_text_or(&empty, Some("1"), None, "no content"),
        "no content"
    );
}

#[test]
fn numbered_lookup_wins_over_title_match() {
    let doc = document(vec![
        heading(1, "Overall Design Notes"),
        heading(2, "Synopsis"),
        heading(3, "Objectives"),
        heading(3, "Design Summary"),
        para("numbered content"),
    ]);

    let section = find_section(&doc, Some("1.1.2"), Some("Overall Design")).expect("section");
    assert_eq!(section.title.as_deref(), Some("Design Summary"));
}

fn protocol_document() -> Document {
    document(vec![
        para("Confidential cover page"),
        label_value_table(&[
            ("Sponsor Confidentiality Statement", &["Property of Acme. Do not copy."]),
            ("Full Title", &["A Randomized Study of Examplamab in Adults"]),
            ("Trial Acronym", &["EXAMPLE-1"]),
            ("Sponsor Protocol Identifier", &["ACME-001"]),
            ("Original Protocol", &["No"]),
            ("Version Number", &["3.0"]),
            ("Version Date", &["01 March 2024"]),
            ("Amendment Identifier", &["Amendment 2"]),
            ("Amendment Scope", &["Global"]),
            ("Compound Code(s)", &["ACM-100; ACM-200"]),
            ("Compound Name(s)", &["Examplamab"]),
            ("Trial Phase", &["Phase III"]),
            ("Short Title", &["Examplamab in Adults"]),
            ("Sponsor Name and Address", &["Acme Pharma", "1 Main Street", "Boston"]),
            ("Regulatory Agency Identifier Number(s)", &["IND 123456", "EU CT 2024-000001"]),
            ("Sponsor Approval Date", &["15 March 2024"]),
        ]),
        heading(1, "Protocol Summary"),
        heading(2, "Synopsis"),
        heading(3, "Objectives"),
        heading(3, "Overall Design"),
        para("Parallel group design."),
        label_value_table(&[
            ("Intervention Model", &["Parallel"]),
            ("Population Type", &["Patients"]),
            ("Population Diagnosis or Condition", &["Asthma"]),
            ("Population Age", &["18 to 65 years"]),
            ("Site Distribution", &["Multicentre"]),
            ("Number of Arms", &["2"]),
            ("Trial Blind Schema", &["Double blind"]),
            ("Blinded Roles", &["Participant, Investigator"]),
            ("Number of Participants", &["400"]),
            ("Duration", &["52 weeks"]),
            ("Committees", &["Data Monitoring Committee"]),
        ]),
    ])
}

#[test]
fn title_page_fields_come_from_anchor_table() {
    let doc = protocol_document();
    let title_page = TitlePage::extract(&doc, &ExtractionProfile::default());

    assert_eq!(title_page.sponsor_confidentiality, "Property of Acme. Do not copy.");
    assert_eq!(title_page.full_title, "A Randomized Study of Examplamab in Adults");
    assert_eq!(title_page.acronym, "EXAMPLE-1");
    assert_eq!(title_page.sponsor_protocol_identifier, "ACME-001");
    assert_eq!(title_page.original_protocol, Some(NO));
    assert_eq!(title_page.version_number, "3.0");
    assert_eq!(title_page.version_date, "01 March 2024");
    assert_eq!(title_page.amendment_identifier, "Amendment 2");
    assert_eq!(title_page.amendment_scope, "Global");
    assert_eq!(title_page.compound_codes, vec!["ACM-100", "ACM-200"]);
    assert_eq!(title_page.compound_names, vec!["Examplamab"]);
    assert_eq!(title_page.trial_phase_text, "Phase III");
    assert_eq!(title_page.trial_phase.code, "C15602");
    assert_eq!(title_page.short_title, "Examplamab in Adults");
    assert_eq!(title_page.sponsor_name, "Acme Pharma");
    assert_eq!(title_page.sponsor_address, "1 Main Street|Boston");
    assert_eq!(
        title_page.regulatory_agency_identifiers,
        vec!["IND 123456", "EU CT 2024-000001"]
    );
    assert_eq!(title_page.sponsor_approval_date, "15 March 2024");
}

#[test]
fn title_page_without_tables_uses_fallbacks() {
    let doc = document(vec![heading(1, "Introduction")]);
    let title_page = TitlePage::extract(&doc, &ExtractionProfile::default());

    assert_eq!(title_page.full_title, "");
    assert_eq!(title_page.trial_phase, NOT_APPLICABLE);
    assert_eq!(title_page.original_protocol, None);
    assert_eq!(title_page.sponsor_address, "Address not provided");
}

#[test]
fn overall_design_reads_numbered_section_table() {
    let doc = protocol_document();
    let record = extract_record(&doc, &ExtractionProfile::default());
    let design = record.overall_design;

    assert_eq!(design.intervention_model, "Parallel");
    assert_eq!(design.population_type, "Patients");
    assert_eq!(design.population_diagnosis, "Asthma");
    assert_eq!(design.population_age, "18 to 65 years");
    assert_eq!(design.site_distribution, "Multicentre");
    assert_eq!(design.number_of_arms, "2");
    assert_eq!(design.blind_schema, "Double blind");
    assert_eq!(design.blinded_roles, "Participant, Investigator");
    assert_eq!(design.number_of_participants, "400");
    assert_eq!(design.duration, "52 weeks");
    assert_eq!(design.committees, "Data Monitoring Committee");
    assert!(design.text.starts_with("<p>Parallel group design.</p><table>"));
    assert_eq!(record.title_page.trial_phase.code, "C15602");
}

#[test]
fn overall_design_missing_uses_default_text() {
    let doc = document(vec![heading(1, "Introduction"), para("text")]);
    let design = OverallDesign::extract(&doc, DEFAULT_SECTION_TEXT);

    assert_eq!(design.text, DEFAULT_SECTION_TEXT);
    assert_eq!(design.intervention_model, "");
}
