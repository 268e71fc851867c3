use serde::{Deserialize, Serialize};

use crate::record::PositionRecord;

/// Guard against pathological inputs (one token claiming row 4 billion).
/// Exceeding it is an error, never a silent truncation.
pub const MAX_GRID_CELLS: usize = 10_000_000;

/// Dense grid of optional sample identifiers, sized to the maximum row and
/// column observed across all placed records. Internally sparse: a cell is
/// either empty or holds exactly one identifier.
///
/// Immutable once built; construct via [`GridBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    num_rows: usize,
    num_cols: usize,
    cells: Vec<Vec<Option<String>>>,
}

impl Grid {
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Identifier at a 0-based coordinate, or None for empty / out-of-range.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col)?.as_deref()
    }

    /// Iterate populated cells in row-major order as (row, col, id), 0-based.
    pub fn populated_cells(&self) -> impl Iterator<Item = (usize, usize, &str)> {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.as_deref().map(|id| (r, c, id)))
        })
    }
}

/// Accumulates position records into a [`Grid`], tracking observed bounds.
///
/// Placement is last-write-wins on duplicate coordinates; the number of
/// overwrites is surfaced in [`BuildStats`] so the condition is visible.
#[derive(Debug, Default)]
pub struct GridBuilder {
    num_rows: usize,
    num_cols: usize,
    cells: Vec<Vec<Option<String>>>,
    stats: BuildStats,
}

/// Counters accumulated while materializing a grid.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildStats {
    /// Records placed into the grid (including overwrites).
    pub records_placed: usize,
    /// Placements that replaced an earlier identifier at the same coordinate.
    pub overwrites: usize,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place one record, growing the grid to cover its coordinate.
    ///
    /// Errors only when the grown grid would exceed [`MAX_GRID_CELLS`].
    pub fn place(&mut self, record: PositionRecord) -> Result<(), String> {
        let rows = self.num_rows.max(record.row);
        let cols = self.num_cols.max(record.column);
        if rows.saturating_mul(cols) > MAX_GRID_CELLS {
            return Err(format!(
                "grid of {}x{} cells exceeds the {} cell limit (record {};{};{})",
                rows, cols, MAX_GRID_CELLS, record.row, record.column, record.id
            ));
        }

        self.num_rows = rows;
        self.num_cols = cols;
        if self.cells.len() < rows {
            self.cells.resize(rows, Vec::new());
        }
        let row = &mut self.cells[record.row - 1];
        if row.len() < cols {
            row.resize(cols, None);
        }

        let cell = &mut row[record.column - 1];
        if cell.is_some() {
            self.stats.overwrites += 1;
        }
        *cell = Some(record.id);
        self.stats.records_placed += 1;
        Ok(())
    }

    /// Finalize into an immutable grid, padding every row to the full width.
    pub fn finish(mut self) -> (Grid, BuildStats) {
        for row in &mut self.cells {
            row.resize(self.num_cols, None);
        }
        self.cells.resize(self.num_rows, vec![None; self.num_cols]);
        (
            Grid {
                num_rows: self.num_rows,
                num_cols: self.num_cols,
                cells: self.cells,
            },
            self.stats,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, column: usize, id: &str) -> PositionRecord {
        PositionRecord {
            row,
            column,
            id: id.to_string(),
        }
    }

    fn build(records: &[(usize, usize, &str)]) -> (Grid, BuildStats) {
        let mut builder = GridBuilder::new();
        for (r, c, id) in records {
            builder.place(record(*r, *c, id)).unwrap();
        }
        builder.finish()
    }

    #[test]
    fn test_bounds_track_maximum_coordinates() {
        let (grid, _) = build(&[(1, 1, "S1"), (3, 2, "S2"), (2, 5, "S3")]);
        assert_eq!(grid.num_rows(), 3);
        assert_eq!(grid.num_cols(), 5);
        assert_eq!(grid.get(0, 0), Some("S1"));
        assert_eq!(grid.get(2, 1), Some("S2"));
        assert_eq!(grid.get(1, 4), Some("S3"));
        assert_eq!(grid.get(0, 1), None);
    }

    #[test]
    fn test_empty_stream_yields_zero_dimensions() {
        let (grid, stats) = build(&[]);
        assert_eq!(grid.num_rows(), 0);
        assert_eq!(grid.num_cols(), 0);
        assert_eq!(grid.populated_cells().count(), 0);
        assert_eq!(stats.records_placed, 0);
    }

    #[test]
    fn test_duplicate_coordinate_last_write_wins() {
        let (grid, stats) = build(&[(1, 1, "S1"), (1, 1, "S2")]);
        assert_eq!(grid.get(0, 0), Some("S2"));
        assert_eq!(stats.overwrites, 1);
        assert_eq!(stats.records_placed, 2);
    }

    #[test]
    fn test_materialization_is_idempotent() {
        let records = [(2, 1, "S1"), (1, 2, "S2"), (1, 1, "S1")];
        let (a, _) = build(&records);
        let (b, _) = build(&records);
        assert_eq!(a, b);
    }

    #[test]
    fn test_populated_cells_row_major_order() {
        let (grid, _) = build(&[(2, 1, "S1"), (1, 2, "S2"), (1, 1, "S3")]);
        let cells: Vec<_> = grid.populated_cells().collect();
        assert_eq!(
            cells,
            vec![(0, 0, "S3"), (0, 1, "S2"), (1, 0, "S1")]
        );
    }

    #[test]
    fn test_cell_limit_is_an_error_not_truncation() {
        let mut builder = GridBuilder::new();
        builder.place(record(1, 1, "S1")).unwrap();
        let err = builder.place(record(MAX_GRID_CELLS + 1, 1, "S2")).unwrap_err();
        assert!(err.contains("cell limit"));
        // Builder state is unchanged by the rejected record
        let (grid, _) = builder.finish();
        assert_eq!(grid.num_rows(), 1);
        assert_eq!(grid.num_cols(), 1);
    }

    #[test]
    fn test_out_of_range_get_is_none() {
        let (grid, _) = build(&[(1, 1, "S1")]);
        assert_eq!(grid.get(5, 5), None);
    }
}
