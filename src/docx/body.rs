use quick_xml::Reader;
use quick_xml::events::Event;

use super::*;

#[derive(Debug, Default)]
struct TableDraft {
    rows: Vec<RowDraft>,
    row: Option<RowDraft>,
    cell: Option<CellDraft>,
}

#[derive(Debug, Default)]
struct ParagraphDraft {
    paragraph: RawParagraph,
    numbering_seen: bool,
    numbering_cancelled: bool,
    indent_level: Option<u32>,
}

impl ParagraphDraft {
    fn finish(mut self) -> RawParagraph {
        if self.numbering_seen && !self.numbering_cancelled {
            self.paragraph.indent_level = Some(self.indent_level.unwrap_or(0));
        }
        if self.paragraph.style_name.is_empty() {
            self.paragraph.style_name = DEFAULT_STYLE_NAME.to_string();
        }
        self.paragraph
    }
}

struct BodyWalker<'a> {
    styles: &'a StyleNames,
    blocks: Vec<RawBlock>,
    tables: Vec<TableDraft>,
    paragraph: Option<ParagraphDraft>,
    paragraph_depth: usize,
    run_depth: usize,
    in_text: bool,
    in_numbering: bool,
}

impl<'a> BodyWalker<'a> {
    fn new(styles: &'a StyleNames) -> Self {
        Self {
            styles,
            blocks: Vec::new(),
            tables: Vec::new(),
            paragraph: None,
            paragraph_depth: 0,
            run_depth: 0,
            in_text: false,
            in_numbering: false,
        }
    }

    fn open(&mut self, element: &BytesStart, empty: bool) {
        match local_name(element).as_str() {
            "p" => {
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 {
                    self.paragraph = Some(ParagraphDraft::default());
                }
                if empty {
                    self.close_paragraph();
                }
            }
            "pStyle" if self.paragraph_depth == 1 => {
                if let (Some(draft), Some(style_id)) =
                    (self.paragraph.as_mut(), attr_value(element, b"val"))
                {
                    draft.paragraph.style_name = self.styles.display_name(&style_id);
                }
            }
            "numPr" if self.paragraph_depth == 1 && self.run_depth == 0 => {
                if let Some(draft) = self.paragraph.as_mut() {
                    draft.numbering_seen = true;
                }
                self.in_numbering = !empty;
            }
            "ilvl" if self.in_numbering => {
                if let Some(draft) = self.paragraph.as_mut() {
                    draft.indent_level =
                        attr_value(element, b"val").and_then(|value| value.parse::<u32>().ok());
                }
            }
            "numId" if self.in_numbering => {
                if let Some(draft) = self.paragraph.as_mut() {
                    draft.numbering_cancelled =
                        attr_value(element, b"val").as_deref() == Some("0");
                }
            }
            "r" if !empty => self.run_depth += 1,
            "t" if self.run_depth > 0 && !empty => self.in_text = true,
            "tab" if self.run_depth > 0 => self.push_text("\t"),
            "br" | "cr" if self.run_depth > 0 => self.push_text("\n"),
            "drawing" | "pict" | "object" => {
                if let Some(draft) = self.paragraph.as_mut() {
                    draft.paragraph.has_graphic = true;
                }
            }
            "blip" => self.push_graphic_ref(attr_value(element, b"embed")),
            "imagedata" => self.push_graphic_ref(attr_value(element, b"id")),
            "tbl" if !empty => self.tables.push(TableDraft::default()),
            "tr" => {
                if let Some(table) = self.tables.last_mut() {
                    table.row = Some(RowDraft::default());
                }
                if empty {
                    self.close_row();
                }
            }
            "gridBefore" => {
                if let Some(row) = self.tables.last_mut().and_then(|table| table.row.as_mut()) {
                    row.grid_before = attr_value(element, b"val")
                        .and_then(|value| value.parse::<usize>().ok())
                        .unwrap_or(0);
                }
            }
            "tc" => {
                if let Some(table) = self.tables.last_mut() {
                    table.cell = Some(CellDraft::default());
                }
                if empty {
                    self.close_cell();
                }
            }
            "gridSpan" => {
                if let Some(cell) = self.open_cell() {
                    cell.grid_span = attr_value(element, b"val")
                        .and_then(|value| value.parse::<usize>().ok())
                        .unwrap_or(1);
                }
            }
            "vMerge" => {
                if let Some(cell) = self.open_cell() {
                    cell.vertical_merge = match attr_value(element, b"val").as_deref() {
                        Some("restart") => Some(VerticalMerge::Restart),
                        _ => Some(VerticalMerge::Continue),
                    };
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) -> Result<(), ExtractError> {
        match name {
            "p" => self.close_paragraph(),
            "numPr" => self.in_numbering = false,
            "r" => self.run_depth = self.run_depth.saturating_sub(1),
            "t" => self.in_text = false,
            "tc" => self.close_cell(),
            "tr" => self.close_row(),
            "tbl" => {
                let table = self.tables.pop().ok_or_else(|| {
                    ExtractError::UnexpectedNode("table end without table start".to_string())
                })?;
                let raw = resolve_grid(table.rows);
                self.push_block(RawBlock::Table(raw));
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            self.push_text(text);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(draft) = self.paragraph.as_mut() {
            draft.paragraph.text.push_str(text);
        }
    }

    fn push_graphic_ref(&mut self, rel_id: Option<String>) {
        if let (Some(draft), Some(rel_id)) = (self.paragraph.as_mut(), rel_id) {
            draft.paragraph.graphic_rel_ids.push(rel_id);
        }
    }

    fn open_cell(&mut self) -> Option<&mut CellDraft> {
        self.tables.last_mut().and_then(|table| table.cell.as_mut())
    }

    fn close_paragraph(&mut self) {
        self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
        if self.paragraph_depth > 0 {
            return;
        }
        if let Some(draft) = self.paragraph.take() {
            self.push_block(RawBlock::Paragraph(draft.finish()));
        }
    }

    fn close_cell(&mut self) {
        if let Some(table) = self.tables.last_mut() {
            if let (Some(row), Some(cell)) = (table.row.as_mut(), table.cell.take()) {
                row.cells.push(cell);
            }
        }
    }

    fn close_row(&mut self) {
        if let Some(table) = self.tables.last_mut() {
            if let Some(row) = table.row.take() {
                table.rows.push(row);
            }
        }
    }

    fn push_block(&mut self, block: RawBlock) {
        match self.open_cell() {
            Some(cell) => cell.blocks.push(block),
            None => self.blocks.push(block),
        }
    }
}

pub(super) fn walk_body(xml: &str, styles: &StyleNames) -> Result<Vec<RawBlock>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut walker = BodyWalker::new(styles);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => walker.open(e, false),
            Ok(Event::Empty(ref e)) => walker.open(e, true),
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                walker.close(&name)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| ExtractError::xml(DOCUMENT_PART, err))?;
                walker.text(&text);
            }
            Ok(Event::CData(ref e)) => {
                walker.text(&String::from_utf8_lossy(e));
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(ExtractError::xml(DOCUMENT_PART, err)),
            _ => {}
        }
    }

    if !walker.tables.is_empty() {
        return Err(ExtractError::UnexpectedNode(
            "document ended inside an open table".to_string(),
        ));
    }

    Ok(walker.blocks)
}
