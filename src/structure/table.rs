use serde::Serialize;
use tracing::warn;

use super::block::{Block, blocks_text};
use crate::docx::GridCoordinates;
use crate::error::Anomaly;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub h_span: usize,
    pub v_span: usize,
    pub is_anchor: bool,
    pub items: Vec<Block>,
}

impl Table {
    pub fn add(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
    }

    pub fn anchor_cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| cell.is_anchor)
    }

    pub fn find_row(&self, label: &str) -> Option<&Row> {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let first_cell_text = |row: &Row| {
            row.cells
                .first()
                .map(|cell| cell.text().trim().to_lowercase())
                .unwrap_or_default()
        };

        self.rows
            .iter()
            .find(|row| first_cell_text(row).starts_with(&needle))
            .or_else(|| {
                self.rows
                    .iter()
                    .find(|row| first_cell_text(row).contains(&needle))
            })
    }

    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .filter(|cell| cell.is_anchor)
                    .map(|cell| cell.text())
                    .collect::<Vec<String>>()
                    .join("\t")
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl Row {
    pub fn add(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn find_cell(&self, label: &str) -> Option<&Cell> {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.cells
            .iter()
            .find(|cell| cell.text().to_lowercase().contains(&needle))
    }

    pub fn next_cell(&self, from_column: usize) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|cell| cell.is_anchor && cell.column > from_column)
    }
}

impl Cell {
    pub fn from_grid(
        row: usize,
        column: usize,
        coordinates: GridCoordinates,
    ) -> (Self, Option<Anomaly>) {
        let is_anchor = row == coordinates.top && column == coordinates.left;
        let h_span = coordinates.right.saturating_sub(coordinates.left).max(1);
        let mut anomaly = None;
        let v_span = match coordinates.bottom {
            Some(bottom) => bottom.saturating_sub(coordinates.top).max(1),
            None => {
                if is_anchor {
                    warn!(row, column, "merge bottom unavailable, using single-row span");
                    anomaly = Some(Anomaly::MissingMergeBottom { row, column });
                }
                1
            }
        };

        (
            Self {
                row,
                column,
                h_span,
                v_span,
                is_anchor,
                items: Vec::new(),
            },
            anomaly,
        )
    }

    pub fn text(&self) -> String {
        blocks_text(&self.items)
    }
}
