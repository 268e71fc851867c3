use serde::{Deserialize, Serialize};

/// Marker substring identifying the passthrough header line in input sheets.
/// Tokens containing it are skipped without being counted as errors.
pub const HEADER_MARKER: &str = "Row;Column";

/// One parsed position token: a 1-based grid coordinate plus the sample
/// identifier observed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// 1-based row index.
    pub row: usize,
    /// 1-based column index.
    pub column: usize,
    /// Sample identifier as it appears in the source document.
    pub id: String,
}

/// Error when parsing a position token.
///
/// Always per-token: callers report the error and continue with the
/// remaining tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenParseError {
    /// Token did not split into exactly three `;`-separated fields.
    FieldCount(usize),
    /// Row field is not a positive integer.
    InvalidRow(String),
    /// Column field is not a positive integer.
    InvalidColumn(String),
    /// Identifier field is empty (e.g. a trailing `;`).
    EmptyIdentifier,
}

impl std::fmt::Display for TokenParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenParseError::FieldCount(n) => {
                write!(f, "expected 3 fields separated by ';', found {}", n)
            }
            TokenParseError::InvalidRow(s) => write!(f, "row is not a positive integer: '{}'", s),
            TokenParseError::InvalidColumn(s) => {
                write!(f, "column is not a positive integer: '{}'", s)
            }
            TokenParseError::EmptyIdentifier => write!(f, "identifier field is empty"),
        }
    }
}

/// Parse one raw cell string as a `row;column;identifier` token.
///
/// Returns `Ok(None)` for the header line (contains [`HEADER_MARKER`]),
/// which is skipped silently. Coordinates of 0 or less are rejected here
/// rather than at placement time, so the grid never sees them.
pub fn parse_token(raw: &str) -> Result<Option<PositionRecord>, TokenParseError> {
    if raw.contains(HEADER_MARKER) {
        return Ok(None);
    }

    let parts: Vec<&str> = raw.split(';').collect();
    if parts.len() != 3 {
        return Err(TokenParseError::FieldCount(parts.len()));
    }

    let row: usize = parts[0]
        .trim()
        .parse()
        .ok()
        .filter(|r| *r >= 1)
        .ok_or_else(|| TokenParseError::InvalidRow(parts[0].to_string()))?;
    let column: usize = parts[1]
        .trim()
        .parse()
        .ok()
        .filter(|c| *c >= 1)
        .ok_or_else(|| TokenParseError::InvalidColumn(parts[1].to_string()))?;

    if parts[2].is_empty() {
        return Err(TokenParseError::EmptyIdentifier);
    }

    Ok(Some(PositionRecord {
        row,
        column,
        id: parts[2].to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_token() {
        let record = parse_token("3;2;S17").unwrap().unwrap();
        assert_eq!(record.row, 3);
        assert_eq!(record.column, 2);
        assert_eq!(record.id, "S17");
    }

    #[test]
    fn test_header_line_is_skipped_silently() {
        assert_eq!(parse_token("Row;Column;ID").unwrap(), None);
        // Marker anywhere in the cell counts as a header
        assert_eq!(parse_token("xx Row;Column yy").unwrap(), None);
    }

    #[test]
    fn test_wrong_field_count_is_rejected() {
        assert_eq!(parse_token("bad-token"), Err(TokenParseError::FieldCount(1)));
        assert_eq!(parse_token("1;2"), Err(TokenParseError::FieldCount(2)));
        assert_eq!(
            parse_token("1;2;S1;extra"),
            Err(TokenParseError::FieldCount(4))
        );
    }

    #[test]
    fn test_non_integer_coordinates_are_rejected() {
        assert_eq!(
            parse_token("x;2;S1"),
            Err(TokenParseError::InvalidRow("x".to_string()))
        );
        assert_eq!(
            parse_token("2;x;S3"),
            Err(TokenParseError::InvalidColumn("x".to_string()))
        );
    }

    #[test]
    fn test_non_positive_coordinates_are_rejected() {
        assert_eq!(
            parse_token("0;2;S1"),
            Err(TokenParseError::InvalidRow("0".to_string()))
        );
        assert_eq!(
            parse_token("2;0;S1"),
            Err(TokenParseError::InvalidColumn("0".to_string()))
        );
        assert_eq!(
            parse_token("-1;2;S1"),
            Err(TokenParseError::InvalidRow("-1".to_string()))
        );
    }

    #[test]
    fn test_empty_identifier_is_rejected() {
        assert_eq!(parse_token("1;2;"), Err(TokenParseError::EmptyIdentifier));
    }

    #[test]
    fn test_identifier_preserved_verbatim() {
        // Identifier field is not trimmed or normalized
        let record = parse_token("1;1; S1 ").unwrap().unwrap();
        assert_eq!(record.id, " S1 ");
    }

    #[test]
    fn test_whitespace_around_coordinates_tolerated() {
        let record = parse_token(" 1 ; 2 ;S1").unwrap().unwrap();
        assert_eq!((record.row, record.column), (1, 2));
    }
}
