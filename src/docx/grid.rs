use std::collections::HashMap;

use tracing::warn;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum VerticalMerge {
    Restart,
    Continue,
}

#[derive(Debug, Default)]
pub(super) struct RowDraft {
    pub grid_before: usize,
    pub cells: Vec<CellDraft>,
}

#[derive(Debug)]
pub(super) struct CellDraft {
    pub grid_span: usize,
    pub vertical_merge: Option<VerticalMerge>,
    pub blocks: Vec<RawBlock>,
}

impl Default for CellDraft {
    fn default() -> Self {
        Self {
            grid_span: 1,
            vertical_merge: None,
            blocks: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct MergeRegion {
    top: usize,
    grid_span: usize,
    last_row: usize,
    consistent: bool,
}

pub(super) fn resolve_grid(rows: Vec<RowDraft>) -> RawTable {
    let mut regions = Vec::<MergeRegion>::new();
    let mut region_by_column = HashMap::<usize, usize>::new();
    let mut placed = Vec::<Vec<(usize, usize, usize, CellDraft)>>::with_capacity(rows.len());
    let mut anomalies = Vec::<Anomaly>::new();

    for (row_index, row) in rows.into_iter().enumerate() {
        let mut column = row.grid_before;
        let mut placed_row = Vec::with_capacity(row.cells.len());

        for cell in row.cells {
            let grid_span = cell.grid_span.max(1);
            let continued = match cell.vertical_merge {
                Some(VerticalMerge::Continue) => region_by_column
                    .get(&column)
                    .copied()
                    .filter(|&region| regions[region].last_row + 1 == row_index),
                _ => None,
            };

            let region = match continued {
                Some(region) => {
                    let merge = &mut regions[region];
                    merge.last_row = row_index;
                    if merge.grid_span != grid_span {
                        merge.consistent = false;
                    }
                    region
                }
                None => {
                    if cell.vertical_merge == Some(VerticalMerge::Continue) {
                        warn!(
                            row = row_index,
                            column, "vertical merge continuation without origin cell"
                        );
                        anomalies.push(Anomaly::VerticalMergeWithoutOrigin {
                            row: row_index,
                            column,
                        });
                    }
                    regions.push(MergeRegion {
                        top: row_index,
                        grid_span,
                        last_row: row_index,
                        consistent: true,
                    });
                    region_by_column.insert(column, regions.len() - 1);
                    regions.len() - 1
                }
            };

            placed_row.push((region, column, grid_span, cell));
            column += grid_span;
        }

        placed.push(placed_row);
    }

    let rows = placed
        .into_iter()
        .enumerate()
        .map(|(row_index, cells)| RawRow {
            cells: cells
                .into_iter()
                .map(|(region, left, grid_span, cell)| {
                    let merge = &regions[region];
                    RawCell {
                        row: row_index,
                        coordinates: GridCoordinates {
                            top: merge.top,
                            left,
                            right: left + grid_span,
                            bottom: merge.consistent.then_some(merge.last_row + 1),
                        },
                        blocks: cell.blocks,
                    }
                })
                .collect(),
        })
        .collect();

    RawTable { rows, anomalies }
}
