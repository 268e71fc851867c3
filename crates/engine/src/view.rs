use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::registry::IdentityRegistry;
use crate::xref::{CellLocation, CrossRefIndex};

pub const GRID_VIEW: &str = "Grid";
pub const LIST_VIEW: &str = "List";
pub const ANON_GRID_VIEW: &str = "AnonGrid";

/// Score placeholder written for every populated identifier cell. -1 means
/// "unscored"; scorers fill these in later, and every other view references
/// them instead of copying.
pub const UNSCORED: f64 = -1.0;

/// Column character-width for identifier columns in the grid-shaped views.
const ID_COL_WIDTH: f64 = 18.0;
/// Column character-width for score columns.
const SCORE_COL_WIDTH: f64 = 6.0;

/// What a rendered cell holds: an authoritative value, or a one-hop
/// reference to a cell in an earlier view. References are never chased
/// transitively; List and AnonGrid point at Grid directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellContent {
    Number(f64),
    Text(String),
    Reference(CellLocation),
}

/// Style tag for a rendered cell. The io layer maps these to concrete
/// fonts/fills/borders; the renderer only says what role a cell plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Header,
    RowNumber,
    Id,
    Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewCell {
    pub row: usize,
    pub col: usize,
    pub content: CellContent,
    pub kind: CellKind,
}

/// Column layout hints for a view, applied by the writer.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewLayout {
    /// (column index, character width) pairs.
    pub col_widths: Vec<(usize, f64)>,
    /// Columns hidden in the output (the grid views' spacer column).
    pub hidden_cols: Vec<usize>,
}

/// One rendered sheet: a name plus its cells in emission order.
/// Immutable once rendered; later phases only read earlier views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub cells: Vec<ViewCell>,
    pub layout: ViewLayout,
}

impl View {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
            layout: ViewLayout::default(),
        }
    }

    fn push(&mut self, row: usize, col: usize, content: CellContent, kind: CellKind) {
        self.cells.push(ViewCell {
            row,
            col,
            content,
            kind,
        });
    }

    /// Number of data rows below the header.
    pub fn data_rows(&self) -> usize {
        self.cells.iter().map(|c| c.row).max().unwrap_or(0)
    }
}

/// Output of a full render pass: the three views in phase order plus the
/// cross-reference index built while emitting the Grid view.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedViews {
    pub grid: View,
    pub list: View,
    pub anon_grid: View,
    pub xref: CrossRefIndex,
}

impl RenderedViews {
    pub fn views(&self) -> [&View; 3] {
        [&self.grid, &self.list, &self.anon_grid]
    }
}

/// Render the three views from a materialized grid and its registry.
///
/// Phases run strictly in order Grid -> List -> AnonGrid. The Grid phase is
/// the only one that writes score values; both later phases store
/// [`CellContent::Reference`] to Grid score cells, keeping a single source
/// of truth.
pub fn render(grid: &Grid, registry: &IdentityRegistry) -> RenderedViews {
    let mut xref = CrossRefIndex::new();
    let grid_view = render_grid_view(grid, &mut xref);
    let list_view = render_list_view(registry, &xref);
    let anon_grid_view = render_anon_grid_view(grid, registry, &xref);
    RenderedViews {
        grid: grid_view,
        list: list_view,
        anon_grid: anon_grid_view,
        xref,
    }
}

/// Shared skeleton of the two grid-shaped views: ID/Score header pairs, the
/// row-number column, widths, and the hidden spacer column. Data columns sit
/// at 2c+2 (id) and 2c+3 (score).
fn grid_shaped_view(name: &str, grid: &Grid) -> View {
    let mut view = View::new(name);
    for c in 0..grid.num_cols() {
        view.push(
            0,
            2 * c + 2,
            CellContent::Text(format!("ID {}", c + 1)),
            CellKind::Header,
        );
        view.push(
            0,
            2 * c + 3,
            CellContent::Text(format!("S {}", c + 1)),
            CellKind::Header,
        );
        view.layout.col_widths.push((2 * c + 2, ID_COL_WIDTH));
        view.layout.col_widths.push((2 * c + 3, SCORE_COL_WIDTH));
    }
    view.layout.hidden_cols.push(1);
    for r in 0..grid.num_rows() {
        view.push(
            r + 1,
            0,
            CellContent::Number((r + 1) as f64),
            CellKind::RowNumber,
        );
    }
    view
}

fn render_grid_view(grid: &Grid, xref: &mut CrossRefIndex) -> View {
    let mut view = grid_shaped_view(GRID_VIEW, grid);
    for (r, c, id) in grid.populated_cells() {
        let id_cell = CellLocation::new(GRID_VIEW, r + 1, 2 * c + 2);
        let score_cell = CellLocation::new(GRID_VIEW, r + 1, 2 * c + 3);
        view.push(
            id_cell.row,
            id_cell.col,
            CellContent::Text(id.to_string()),
            CellKind::Id,
        );
        view.push(
            score_cell.row,
            score_cell.col,
            CellContent::Number(UNSCORED),
            CellKind::Score,
        );
        xref.record(id, id_cell, score_cell);
    }
    view
}

fn render_list_view(registry: &IdentityRegistry, xref: &CrossRefIndex) -> View {
    let mut view = View::new(LIST_VIEW);
    view.push(
        0,
        0,
        CellContent::Text("Anonymized ID".to_string()),
        CellKind::Header,
    );
    view.push(
        0,
        1,
        CellContent::Text("Sample ID".to_string()),
        CellKind::Header,
    );
    view.push(
        0,
        2,
        CellContent::Text("Score".to_string()),
        CellKind::Header,
    );
    view.layout.col_widths.push((0, 14.0));
    view.layout.col_widths.push((1, ID_COL_WIDTH));

    for (i, (id, label)) in registry.iter().enumerate() {
        let row = i + 1;
        view.push(row, 0, CellContent::Text(label.to_string()), CellKind::Id);
        view.push(row, 1, CellContent::Text(id.to_string()), CellKind::Id);
        for (k, occurrence) in xref.occurrences_of(id).iter().enumerate() {
            view.push(
                row,
                2 + k,
                CellContent::Reference(occurrence.score_cell.clone()),
                CellKind::Score,
            );
        }
    }
    view
}

fn render_anon_grid_view(grid: &Grid, registry: &IdentityRegistry, xref: &CrossRefIndex) -> View {
    let mut view = grid_shaped_view(ANON_GRID_VIEW, grid);
    // Row-major scan matches the index's discovery order, so each id's next
    // unconsumed occurrence is the one for this cell.
    let mut cursors: HashMap<&str, usize> = HashMap::new();
    for (r, c, id) in grid.populated_cells() {
        let Some(label) = registry.label_for(id) else {
            continue;
        };
        view.push(
            r + 1,
            2 * c + 2,
            CellContent::Text(label.to_string()),
            CellKind::Id,
        );
        let cursor = cursors.entry(id).or_insert(0);
        if let Some(occurrence) = xref.occurrences_of(id).get(*cursor) {
            view.push(
                r + 1,
                2 * c + 3,
                CellContent::Reference(occurrence.score_cell.clone()),
                CellKind::Score,
            );
        }
        *cursor += 1;
    }
    view
}
