use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A position inside a named view. A location, never a value: later views
/// store these to point at authoritative cells instead of copying them.
///
/// Row and column are 0-based view coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLocation {
    pub view: String,
    pub row: usize,
    pub col: usize,
}

impl CellLocation {
    pub fn new(view: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            view: view.into(),
            row,
            col,
        }
    }

    /// Relative A1-style reference including the view name, e.g. `Grid!D2`.
    pub fn to_formula(&self) -> String {
        format!("{}!{}{}", self.view, col_to_letter(self.col), self.row + 1)
    }
}

/// Convert column index to Excel column letter (0 = A, 25 = Z, 26 = AA, etc.)
fn col_to_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// One appearance of an identifier in the rendered Grid view: where the
/// identifier cell landed and where its adjacent score placeholder landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub id_cell: CellLocation,
    pub score_cell: CellLocation,
}

/// Per-identifier list of Grid-view occurrences, in row-major discovery
/// order. The single mechanism by which List and AnonGrid point back at
/// authoritative score cells instead of duplicating them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossRefIndex {
    occurrences: HashMap<String, Vec<Occurrence>>,
}

impl CrossRefIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an occurrence to an identifier's list.
    pub fn record(&mut self, id: &str, id_cell: CellLocation, score_cell: CellLocation) {
        self.occurrences
            .entry(id.to_string())
            .or_default()
            .push(Occurrence { id_cell, score_cell });
    }

    /// Occurrences of an identifier in discovery order. Empty slice for
    /// unknown identifiers.
    pub fn occurrences_of(&self, id: &str) -> &[Occurrence] {
        self.occurrences.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total occurrence entries across all identifiers.
    pub fn total_occurrences(&self) -> usize {
        self.occurrences.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_formula_single_letter_columns() {
        assert_eq!(CellLocation::new("Grid", 0, 0).to_formula(), "Grid!A1");
        assert_eq!(CellLocation::new("Grid", 1, 3).to_formula(), "Grid!D2");
        assert_eq!(CellLocation::new("Grid", 49, 25).to_formula(), "Grid!Z50");
    }

    #[test]
    fn test_to_formula_multi_letter_columns() {
        assert_eq!(CellLocation::new("Grid", 0, 26).to_formula(), "Grid!AA1");
        assert_eq!(CellLocation::new("Grid", 0, 27).to_formula(), "Grid!AB1");
        assert_eq!(CellLocation::new("Grid", 0, 51).to_formula(), "Grid!AZ1");
        assert_eq!(CellLocation::new("Grid", 0, 52).to_formula(), "Grid!BA1");
    }

    #[test]
    fn test_occurrences_kept_in_discovery_order() {
        let mut index = CrossRefIndex::new();
        index.record(
            "S1",
            CellLocation::new("Grid", 1, 2),
            CellLocation::new("Grid", 1, 3),
        );
        index.record(
            "S1",
            CellLocation::new("Grid", 2, 2),
            CellLocation::new("Grid", 2, 3),
        );
        let occ = index.occurrences_of("S1");
        assert_eq!(occ.len(), 2);
        assert_eq!(occ[0].score_cell.row, 1);
        assert_eq!(occ[1].score_cell.row, 2);
    }

    #[test]
    fn test_unknown_identifier_has_no_occurrences() {
        let index = CrossRefIndex::new();
        assert!(index.occurrences_of("S1").is_empty());
    }
}
