// Excel file import (position-token sheets) and export (rendered views)
//
// Import: One-way conversion. The first sheet's cells are read as strings,
//         parsed as `row;column;identifier` tokens, and materialized into a
//         dense grid. Per-token parse errors are collected, never fatal.
// Export: Writes the three rendered views (Grid, List, AnonGrid) to a new
//         workbook. Reference cells become formulas pointing at the Grid
//         sheet. The file is saved to a `.tmp` sibling and renamed into
//         place so a failed save never leaves a torn output.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook as XlsxWorkbook};

use samplegrid_engine::grid::{Grid, GridBuilder};
use samplegrid_engine::record::parse_token;
use samplegrid_engine::view::{CellContent, CellKind, RenderedViews, View};

/// Maximum number of per-token error messages kept for the import report.
/// The total failure count is always exact.
const MAX_PARSE_ERROR_SAMPLES: usize = 100;

/// Result of a token-sheet import operation
#[derive(Debug, Default)]
pub struct ImportResult {
    /// Grid dimensions after materialization
    pub num_rows: usize,
    pub num_cols: usize,
    /// Tokens successfully parsed into records
    pub tokens_parsed: usize,
    /// Header lines skipped silently
    pub headers_skipped: usize,
    /// Tokens rejected with a parse error
    pub tokens_failed: usize,
    /// Per-token error messages (up to MAX_PARSE_ERROR_SAMPLES)
    pub parse_errors: Vec<String>,
    /// Records that replaced an earlier identifier at the same coordinate
    pub overwrites: usize,
    /// Total import duration in milliseconds
    pub import_duration_ms: u128,
}

impl ImportResult {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} rows x {} columns", self.num_rows, self.num_cols),
            format!("{} records", self.tokens_parsed),
        ];
        if self.tokens_failed > 0 {
            parts.push(format!("{} parse errors", self.tokens_failed));
        }
        if self.overwrites > 0 {
            parts.push(format!("{} overwritten cells", self.overwrites));
        }
        parts.join(" · ")
    }

    /// Returns true if there are actionable warnings
    pub fn has_warnings(&self) -> bool {
        self.tokens_failed > 0 || self.overwrites > 0
    }
}

/// Import the first sheet of a workbook as a stream of position tokens.
///
/// Cells are visited in document scan order (rows top to bottom, cells left
/// to right). Non-string cells are coerced to their text form before
/// parsing. Malformed tokens are reported in the result and skipped.
pub fn import(path: &Path) -> Result<(Grid, ImportResult), String> {
    let start_time = Instant::now();

    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| format!("Failed to read sheet '{}': {}", first_sheet, e))?;

    let mut result = ImportResult::default();
    let mut builder = GridBuilder::new();

    for row in range.rows() {
        for cell in row {
            let Some(token) = cell_to_token(cell) else {
                continue;
            };
            match parse_token(&token) {
                Ok(Some(record)) => {
                    builder.place(record)?;
                    result.tokens_parsed += 1;
                }
                Ok(None) => {
                    result.headers_skipped += 1;
                }
                Err(e) => {
                    result.tokens_failed += 1;
                    if result.parse_errors.len() < MAX_PARSE_ERROR_SAMPLES {
                        result
                            .parse_errors
                            .push(format!("error parsing token '{}': {}", token, e));
                    }
                }
            }
        }
    }

    let (grid, stats) = builder.finish();
    result.num_rows = grid.num_rows();
    result.num_cols = grid.num_cols();
    result.overwrites = stats.overwrites;
    result.import_duration_ms = start_time.elapsed().as_millis();

    Ok((grid, result))
}

/// Coerce a calamine cell to the raw token string, or None for cells that
/// carry no token (empty cells, error cells).
fn cell_to_token(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Some(format!("{}", *n as i64))
            } else {
                Some(format!("{}", n))
            }
        }
        Data::Int(n) => Some(format!("{}", n)),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => Some(format!("{}", dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Result of an export operation
#[derive(Debug, Default)]
pub struct ExportResult {
    pub sheets_written: usize,
    pub cells_written: usize,
    /// Cells written as formulas referencing the Grid sheet
    pub references_written: usize,
    /// Total export duration in milliseconds
    pub export_duration_ms: u128,
}

impl ExportResult {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        format!(
            "{} sheet{} · {} cells · {} references",
            self.sheets_written,
            if self.sheets_written == 1 { "" } else { "s" },
            self.cells_written,
            self.references_written
        )
    }
}

/// Cell formats for the output workbook, keyed by the renderer's style tags.
struct ViewFormats {
    header: Format,
    id: Format,
    score: Format,
}

impl ViewFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_background_color(Color::RGB(0xC0C0C0))
                .set_border(FormatBorder::Medium)
                .set_align(FormatAlign::Center),
            id: Format::new()
                .set_font_size(12)
                .set_background_color(Color::RGB(0xCCCCFF))
                .set_border_top(FormatBorder::Thin)
                .set_border_left(FormatBorder::Thin)
                .set_border_bottom(FormatBorder::Thin),
            score: Format::new()
                .set_font_size(12)
                .set_border_top(FormatBorder::Thin)
                .set_border_right(FormatBorder::Thin)
                .set_border_bottom(FormatBorder::Thin),
        }
    }

    fn for_kind(&self, kind: CellKind) -> Option<&Format> {
        match kind {
            CellKind::Header => Some(&self.header),
            CellKind::Id => Some(&self.id),
            CellKind::Score => Some(&self.score),
            CellKind::RowNumber => None,
        }
    }
}

/// Export the rendered views as a three-sheet workbook.
pub fn export(views: &RenderedViews, path: &Path) -> Result<ExportResult, String> {
    let start_time = Instant::now();
    let mut result = ExportResult::default();

    let formats = ViewFormats::new();
    let mut xlsx_workbook = XlsxWorkbook::new();

    for view in views.views() {
        write_view(&mut xlsx_workbook, view, &formats, &mut result)?;
        result.sheets_written += 1;
    }

    // Save to a sibling temp path, then move into place
    let tmp_path = tmp_sibling(path);
    xlsx_workbook
        .save(&tmp_path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;
    fs::rename(&tmp_path, path).map_err(|e| {
        format!(
            "Failed to move output into place at '{}': {}",
            path.display(),
            e
        )
    })?;

    result.export_duration_ms = start_time.elapsed().as_millis();
    Ok(result)
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_view(
    xlsx_workbook: &mut XlsxWorkbook,
    view: &View,
    formats: &ViewFormats,
    result: &mut ExportResult,
) -> Result<(), String> {
    let worksheet = xlsx_workbook
        .add_worksheet()
        .set_name(&view.name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", view.name, e))?;

    for cell in &view.cells {
        let row32 = cell.row as u32;
        let col16 = cell.col as u16;
        let format = formats.for_kind(cell.kind);

        match &cell.content {
            CellContent::Text(s) => {
                match format {
                    Some(format) => worksheet.write_string_with_format(row32, col16, s, format),
                    None => worksheet.write_string(row32, col16, s),
                }
                .map_err(|e| format!("Failed to write cell ({}, {}): {}", cell.row, cell.col, e))?;
            }
            CellContent::Number(n) => {
                match format {
                    Some(format) => worksheet.write_number_with_format(row32, col16, *n, format),
                    None => worksheet.write_number(row32, col16, *n),
                }
                .map_err(|e| format!("Failed to write cell ({}, {}): {}", cell.row, cell.col, e))?;
            }
            CellContent::Reference(location) => {
                let formula = location.to_formula();
                match format {
                    Some(format) => worksheet
                        .write_formula_with_format(row32, col16, formula.as_str(), format),
                    None => worksheet.write_formula(row32, col16, formula.as_str()),
                }
                .map_err(|e| {
                    format!("Failed to write formula ({}, {}): {}", cell.row, cell.col, e)
                })?;
                result.references_written += 1;
            }
        }
        result.cells_written += 1;
    }

    // Apply layout (column widths, hidden spacer column)
    for (col, width) in &view.layout.col_widths {
        worksheet
            .set_column_width(*col as u16, *width)
            .map_err(|e| format!("Failed to set column {} width: {}", col, e))?;
    }
    for col in &view.layout.hidden_cols {
        worksheet
            .set_column_hidden(*col as u16)
            .map_err(|e| format!("Failed to hide column {}: {}", col, e))?;
    }

    Ok(())
}
