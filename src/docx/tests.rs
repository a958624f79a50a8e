use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::body::walk_body;
use super::package::{parse_image_relationships, parse_style_names};
use super::*;
use crate::config::ExtractionProfile;
use crate::structure::Block;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/></w:style>
</w:styles>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
  <Relationship Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../customXml/logo.png"/>
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="https://example.org/remote.png" TargetMode="External"/>
</Relationships>"#;

fn document_xml(body: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="{}" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
            r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:v="urn:schemas-microsoft-com:vml">"#,
            "<w:body>{}</w:body></w:document>"
        ),
        W_NS, body
    )
}

fn build_package(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start part");
        writer.write_all(content.as_bytes()).expect("write part");
    }
    writer.finish().expect("finish package").into_inner()
}

fn docx(body: &str) -> Vec<u8> {
    build_package(&[
        (DOCUMENT_PART, document_xml(body).as_str()),
        (STYLES_PART, STYLES_XML),
        (RELATIONSHIPS_PART, RELS_XML),
        ("word/media/image1.png", "png-bytes"),
    ])
}

fn read_blocks(body: &str) -> Vec<RawBlock> {
    let styles = parse_style_names(STYLES_XML).expect("styles parse");
    walk_body(&document_xml(body), &styles).expect("body parses")
}

fn paragraph(style: &str, text: &str) -> String {
    let style = if style.is_empty() {
        String::new()
    } else {
        format!(r#"<w:pPr><w:pStyle w:val="{style}"/></w:pPr>"#)
    };
    format!("<w:p>{style}<w:r><w:t>{text}</w:t></w:r></w:p>")
}

fn table_cell(properties: &str, text: &str) -> String {
    format!("<w:tc><w:tcPr>{properties}</w:tcPr>{}</w:tc>", paragraph("", text))
}

fn only_table(blocks: &[RawBlock]) -> &RawTable {
    match blocks {
        [RawBlock::Table(table)] => table,
        other => panic!("expected a single table, got {other:?}"),
    }
}

#[test]
fn paragraphs_carry_style_names_and_run_text() {
    let blocks = read_blocks(concat!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr>"#,
        "<w:r><w:t>Trial </w:t></w:r><w:r><w:t>Schema</w:t></w:r></w:p>",
        "<w:p><w:r><w:t>Arm A</w:t><w:tab/><w:t>Arm B</w:t><w:br/><w:t>Notes &amp; caveats</w:t></w:r></w:p>",
        r#"<w:p><w:pPr><w:pStyle w:val="CustomStyle"/></w:pPr><w:r><w:t>custom</w:t></w:r></w:p>"#,
    ));

    assert_eq!(
        blocks,
        vec![
            RawBlock::Paragraph(RawParagraph::styled("heading 1", "Trial Schema")),
            RawBlock::Paragraph(RawParagraph::styled(
                DEFAULT_STYLE_NAME,
                "Arm A\tArm B\nNotes & caveats"
            )),
            RawBlock::Paragraph(RawParagraph::styled("CustomStyle", "custom")),
        ]
    );
}

#[test]
fn numbering_properties_set_indent_level() {
    let blocks = read_blocks(concat!(
        r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="1"/><w:numId w:val="3"/></w:numPr></w:pPr>"#,
        "<w:r><w:t>nested</w:t></w:r></w:p>",
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="0"/></w:numPr></w:pPr>"#,
        "<w:r><w:t>cancelled</w:t></w:r></w:p>",
        r#"<w:p><w:pPr><w:numPr><w:numId w:val="4"/></w:numPr></w:pPr><w:r><w:t>no level</w:t></w:r></w:p>"#,
    ));

    let levels = blocks
        .iter()
        .map(|block| match block {
            RawBlock::Paragraph(paragraph) => paragraph.indent_level,
            RawBlock::Table(_) => panic!("unexpected table"),
        })
        .collect::<Vec<Option<u32>>>();
    assert_eq!(levels, vec![Some(1), None, Some(0)]);
}

#[test]
fn graphics_collect_relationship_ids() {
    let blocks = read_blocks(concat!(
        r#"<w:p><w:r><w:drawing><a:graphic><a:graphicData><a:blip r:embed="rId5"/></a:graphicData></a:graphic></w:drawing></w:r></w:p>"#,
        r#"<w:p><w:r><w:pict><v:shape><v:imagedata r:id="rId7"/></v:shape></w:pict></w:r></w:p>"#,
    ));

    match blocks.as_slice() {
        [RawBlock::Paragraph(drawing), RawBlock::Paragraph(picture)] => {
            assert!(drawing.has_graphic);
            assert_eq!(drawing.graphic_rel_ids, vec!["rId5".to_string()]);
            assert!(picture.has_graphic);
            assert_eq!(picture.graphic_rel_ids, vec!["rId7".to_string()]);
        }
        other => panic!("unexpected blocks {other:?}"),
    }
}

#[test]
fn image_relationships_skip_external_targets() {
    let images = parse_image_relationships(RELS_XML).expect("rels parse");

    assert_eq!(images.len(), 2);
    assert_eq!(images.resolve("rId5"), Some("word/media/image1.png"));
    assert_eq!(images.resolve("rId6"), Some("customXml/logo.png"));
    assert_eq!(images.resolve("rId7"), None);
    assert_eq!(images.resolve("rId1"), None);
    assert_eq!(images.paths(), vec!["customXml/logo.png", "word/media/image1.png"]);
}

#[test]
fn style_names_fall_back_to_style_id() {
    let styles = parse_style_names(STYLES_XML).expect("styles parse");

    assert_eq!(styles.display_name("Heading2"), "heading 2");
    assert_eq!(styles.display_name("Unknown"), "Unknown");
}

#[test]
fn grid_properties_become_region_coordinates() {
    let body = format!(
        "<w:tbl><w:tr>{}{}</w:tr><w:tr>{}{}</w:tr><w:tr>{}{}{}</w:tr></w:tbl>",
        table_cell(r#"<w:gridSpan w:val="2"/><w:vMerge w:val="restart"/>"#, "A"),
        table_cell("", "B"),
        table_cell(r#"<w:gridSpan w:val="2"/><w:vMerge/>"#, ""),
        table_cell("", "C"),
        r#"<w:trPr><w:gridBefore w:val="1"/></w:trPr>"#,
        table_cell("", "D"),
        table_cell("", "E"),
    );
    let blocks = read_blocks(&body);
    let table = only_table(&blocks);

    let coordinates = table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| {
                    let c = cell.coordinates;
                    (cell.row, c.top, c.left, c.right, c.bottom)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    assert_eq!(
        coordinates,
        vec![
            vec![(0, 0, 0, 2, Some(2)), (0, 0, 2, 3, Some(1))],
            vec![(1, 0, 0, 2, Some(2)), (1, 1, 2, 3, Some(2))],
            vec![(2, 2, 1, 2, Some(3)), (2, 2, 2, 3, Some(3))],
        ]
    );
    assert!(table.anomalies.is_empty());
}

#[test]
fn merged_docx_table_anchors_cover_the_grid() {
    let body = format!(
        "{}<w:tbl><w:tr>{}{}</w:tr><w:tr>{}{}</w:tr><w:tr>{}</w:tr></w:tbl>",
        paragraph("Heading1", "Schedule"),
        table_cell(r#"<w:gridSpan w:val="2"/><w:vMerge w:val="restart"/>"#, "A"),
        table_cell("", "B"),
        table_cell(r#"<w:gridSpan w:val="2"/><w:vMerge/>"#, ""),
        table_cell("", "C"),
        table_cell(r#"<w:gridSpan w:val="3"/>"#, "D"),
    );

    let parsed = crate::parse_docx_bytes(docx(&body), &ExtractionProfile::default())
        .expect("docx parses");
    let table = parsed.document.tables().next().expect("table");

    let anchors = table.anchor_cells().collect::<Vec<_>>();
    let area = anchors
        .iter()
        .map(|cell| cell.h_span * cell.v_span)
        .sum::<usize>();
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.column_count(), 3);
    assert_eq!(area, table.rows.len() * table.column_count());
    assert_eq!(
        anchors
            .iter()
            .map(|cell| (cell.text(), cell.h_span, cell.v_span))
            .collect::<Vec<_>>(),
        vec![
            ("A".to_string(), 2, 2),
            ("B".to_string(), 1, 1),
            ("C".to_string(), 1, 1),
            ("D".to_string(), 3, 1),
        ]
    );
    assert!(parsed.document.anomalies().is_empty());
}

#[test]
fn mismatched_continuation_span_leaves_bottom_unknown() {
    let body = format!(
        "<w:tbl><w:tr>{}</w:tr><w:tr>{}{}</w:tr></w:tbl>",
        table_cell(r#"<w:gridSpan w:val="2"/><w:vMerge w:val="restart"/>"#, "Merged"),
        table_cell("<w:vMerge/>", ""),
        table_cell("", "Right"),
    );
    let blocks = read_blocks(&body);
    let table = only_table(&blocks);

    assert_eq!(table.rows[0].cells[0].coordinates.bottom, None);
    assert_eq!(table.rows[1].cells[0].coordinates.bottom, None);
    assert_eq!(table.rows[1].cells[1].coordinates.bottom, Some(2));
}

#[test]
fn continuation_without_origin_starts_new_region() {
    let body = format!(
        "<w:tbl><w:tr>{}</w:tr></w:tbl>",
        table_cell("<w:vMerge/>", "Orphan")
    );
    let blocks = read_blocks(&body);
    let table = only_table(&blocks);

    assert_eq!(
        table.anomalies,
        vec![Anomaly::VerticalMergeWithoutOrigin { row: 0, column: 0 }]
    );
    let coordinates = table.rows[0].cells[0].coordinates;
    assert_eq!((coordinates.top, coordinates.bottom), (0, Some(1)));
}

#[test]
fn nested_tables_are_reported_inside_cells() {
    let inner = format!("<w:tbl><w:tr>{}</w:tr></w:tbl>", table_cell("", "inner"));
    let body = format!(
        "<w:tbl><w:tr><w:tc>{}{}</w:tc></w:tr></w:tbl>",
        paragraph("", "outer"),
        inner
    );
    let blocks = read_blocks(&body);
    let table = only_table(&blocks);

    let cell_blocks = &table.rows[0].cells[0].blocks;
    assert_eq!(cell_blocks.len(), 2);
    assert!(matches!(cell_blocks[1], RawBlock::Table(_)));

    let err = crate::parse_docx_bytes(docx(&body), &ExtractionProfile::default())
        .expect_err("nested table rejected");
    assert!(matches!(err, ExtractError::UnsupportedNesting(_)));
}

#[test]
fn unterminated_table_is_an_error() {
    let styles = StyleNames::default();
    let xml = format!(r#"<w:document xmlns:w="{W_NS}"><w:body><w:tbl><w:tr>"#);

    let result = walk_body(&xml, &styles);
    assert!(matches!(
        result,
        Err(ExtractError::UnexpectedNode(_) | ExtractError::Xml { .. })
    ));
}

#[test]
fn package_without_document_part_is_rejected() {
    let bytes = build_package(&[(STYLES_PART, STYLES_XML)]);
    let mut package = DocxPackage::from_bytes(bytes).expect("archive opens");

    let err = package.read().expect_err("document part required");
    assert!(matches!(err, ExtractError::MissingPart(ref part) if part == DOCUMENT_PART));
}

#[test]
fn non_zip_input_is_an_archive_error() {
    let result = DocxPackage::from_bytes(b"not a docx".to_vec());
    assert!(matches!(result, Err(ExtractError::Archive(_))));
}

#[test]
fn docx_bytes_parse_into_sections_and_media() {
    let body = [
        paragraph("", "Sponsor cover page"),
        paragraph("Heading1", "Introduction"),
        paragraph("", "Background text"),
        r#"<w:p><w:r><w:drawing><a:blip r:embed="rId5"/></w:drawing></w:r></w:p>"#.to_string(),
        paragraph("Heading2", "Rationale"),
        r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/></w:pPr><w:r><w:t>point one</w:t></w:r></w:p>"#
            .to_string(),
        "<w:p/>".to_string(),
    ]
    .concat();
    let bytes = docx(&body);

    let parsed = crate::parse_docx_bytes(bytes.clone(), &ExtractionProfile::default())
        .expect("docx parses");
    let document = &parsed.document;

    assert_eq!(document.sections().len(), 3);
    assert_eq!(document.root().text(), "Sponsor cover page");
    let introduction = document.section_by_number("1").expect("section 1");
    assert_eq!(introduction.title.as_deref(), Some("Introduction"));
    assert!(matches!(introduction.items[1], Block::Image(_)));
    let rationale = document.section_by_number("1.1").expect("section 1.1");
    assert!(matches!(rationale.items.as_slice(), [Block::List(_)]));
    assert_eq!(document.images(), vec!["word/media/image1.png"]);
    assert_eq!(parsed.narrative.len(), 3);

    let mut package = DocxPackage::from_bytes(bytes).expect("archive opens");
    assert_eq!(
        package.media("word/media/image1.png").expect("media part"),
        b"png-bytes".to_vec()
    );
    assert!(matches!(
        package.media("word/media/missing.png"),
        Err(ExtractError::MissingPart(_))
    ));
}
