use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Prefix for anonymized labels.
pub const LABEL_PREFIX: &str = "Anon-";
/// Zero-padding width of the label sequence number.
pub const LABEL_DIGITS: usize = 3;

/// Bijective mapping between distinct sample identifiers and anonymized
/// labels.
///
/// Labels are a pure function of the identifier set: ids are collected from
/// the grid, deduplicated, sorted ascending, and numbered 1-based in sorted
/// order (`Anon-001`, `Anon-002`, ...). Grid layout and occurrence order do
/// not influence the assignment, so the same identifiers always get the same
/// labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRegistry {
    ids: Vec<String>,
    labels: HashMap<String, String>,
}

impl IdentityRegistry {
    /// Build the registry from a materialized grid (row-major scan,
    /// duplicates collapse).
    pub fn from_grid(grid: &Grid) -> Self {
        let mut ids: Vec<String> = grid
            .populated_cells()
            .filter(|(_, _, id)| !id.is_empty())
            .map(|(_, _, id)| id.to_string())
            .collect();
        ids.sort();
        ids.dedup();

        let labels = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), Self::label_at(i + 1)))
            .collect();

        Self { ids, labels }
    }

    fn label_at(seq: usize) -> String {
        format!("{}{:0width$}", LABEL_PREFIX, seq, width = LABEL_DIGITS)
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Distinct identifiers in ascending lexicographic order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Anonymized label for an identifier, if it is registered.
    pub fn label_for(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Iterate `(id, label)` pairs in sorted identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids
            .iter()
            .map(move |id| (id.as_str(), self.labels[id].as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuilder;
    use crate::record::PositionRecord;

    fn grid_of(records: &[(usize, usize, &str)]) -> Grid {
        let mut builder = GridBuilder::new();
        for (row, column, id) in records {
            builder
                .place(PositionRecord {
                    row: *row,
                    column: *column,
                    id: id.to_string(),
                })
                .unwrap();
        }
        builder.finish().0
    }

    #[test]
    fn test_duplicates_collapse() {
        let registry = IdentityRegistry::from_grid(&grid_of(&[
            (1, 1, "S1"),
            (1, 2, "S2"),
            (2, 1, "S1"),
        ]));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), &["S1".to_string(), "S2".to_string()]);
    }

    #[test]
    fn test_labels_follow_sorted_order() {
        // Grid layout deliberately places ids out of lexicographic order
        let registry = IdentityRegistry::from_grid(&grid_of(&[
            (1, 1, "S3"),
            (1, 2, "S1"),
            (2, 1, "S2"),
        ]));
        assert_eq!(registry.label_for("S1"), Some("Anon-001"));
        assert_eq!(registry.label_for("S2"), Some("Anon-002"));
        assert_eq!(registry.label_for("S3"), Some("Anon-003"));
    }

    #[test]
    fn test_labels_independent_of_layout() {
        let a = IdentityRegistry::from_grid(&grid_of(&[(1, 1, "S1"), (1, 2, "S2")]));
        let b = IdentityRegistry::from_grid(&grid_of(&[(7, 3, "S2"), (2, 2, "S1")]));
        assert_eq!(a.label_for("S1"), b.label_for("S1"));
        assert_eq!(a.label_for("S2"), b.label_for("S2"));
    }

    #[test]
    fn test_bijection() {
        let registry = IdentityRegistry::from_grid(&grid_of(&[
            (1, 1, "a"),
            (1, 2, "b"),
            (1, 3, "c"),
        ]));
        let labels: std::collections::HashSet<_> =
            registry.iter().map(|(_, label)| label.to_string()).collect();
        assert_eq!(labels.len(), registry.len());
    }

    #[test]
    fn test_empty_grid_yields_empty_registry() {
        let registry = IdentityRegistry::from_grid(&grid_of(&[]));
        assert!(registry.is_empty());
        assert_eq!(registry.label_for("S1"), None);
    }

    #[test]
    fn test_unknown_id_has_no_label() {
        let registry = IdentityRegistry::from_grid(&grid_of(&[(1, 1, "S1")]));
        assert_eq!(registry.label_for("S2"), None);
    }

    #[test]
    fn test_label_padding() {
        assert_eq!(IdentityRegistry::label_at(1), "Anon-001");
        assert_eq!(IdentityRegistry::label_at(42), "Anon-042");
        assert_eq!(IdentityRegistry::label_at(1000), "Anon-1000");
    }
}
