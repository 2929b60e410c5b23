use std::io::Read;
use std::path::Path;

use crate::error::{AnalysisError, Result};

use super::model::{ColumnSchema, SampleRow, SampleTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a raw harness file into a [`SampleTable`].
///
/// Expected layout: plain text, no header, one run per line, numeric fields
/// separated by whitespace. Every row must carry exactly
/// `schema.columns` fields.
pub fn read_table(path: &Path, schema: ColumnSchema) -> Result<SampleTable> {
    if !path.is_file() {
        return Err(AnalysisError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| AnalysisError::Read {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;

    let table = parse_table(file, path, schema)?;
    log::debug!(
        "read {} rows x {} columns from {}",
        table.len(),
        table.width,
        path.display()
    );
    Ok(table)
}

/// Parse sample rows from any reader. `source` is only used for messages.
pub fn parse_table<R: Read>(input: R, source: &Path, schema: ColumnSchema) -> Result<SampleTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input);

    let mut rows = Vec::new();

    for result in reader.byte_records() {
        let record = result.map_err(|e| AnalysisError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;
        let line = record.position().map_or(0, |p| p.line());

        let mut fields: Vec<&str> = Vec::new();
        for (col, raw) in record.iter().enumerate() {
            let text = std::str::from_utf8(raw).map_err(|_| AnalysisError::MalformedRow {
                path: source.to_path_buf(),
                line,
                reason: format!("field {col} is not valid UTF-8"),
            })?;
            // Runs of spaces and tabs count as a single separator.
            fields.extend(text.split_whitespace());
        }
        if fields.is_empty() {
            continue;
        }

        if fields.len() != schema.columns {
            return Err(AnalysisError::MalformedRow {
                path: source.to_path_buf(),
                line,
                reason: format!(
                    "expected {} columns, found {}",
                    schema.columns,
                    fields.len()
                ),
            });
        }

        let values = fields
            .iter()
            .enumerate()
            .map(|(col, tok)| parse_number(tok, col, source, line))
            .collect::<Result<Vec<f64>>>()?;

        rows.push(SampleRow::new(values));
    }

    Ok(SampleTable::new(source, schema.columns, rows))
}

fn parse_number(tok: &str, col: usize, source: &Path, line: u64) -> Result<f64> {
    match tok.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AnalysisError::MalformedRow {
            path: source.to_path_buf(),
            line,
            reason: format!("column {col}: '{tok}' is not a number"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, columns: usize) -> Result<SampleTable> {
        parse_table(text.as_bytes(), Path::new("inline.csv"), ColumnSchema::new(columns))
    }

    #[test]
    fn parses_space_delimited_rows_in_order() {
        let table = parse("100 600 1200 500\n200 900 1800 700\n", 4).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.width, 4);
        assert_eq!(table.rows[0].values, vec![100.0, 600.0, 1200.0, 500.0]);
        assert_eq!(table.rows[1].values, vec![200.0, 900.0, 1800.0, 700.0]);
    }

    #[test]
    fn tolerates_repeated_separators_and_blank_lines() {
        let table = parse("1  2\t3\n\n   \n4 5 6 \n", 3).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].values, vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn wrong_column_count_reports_line() {
        let err = parse("1 2 3\n4 5\n", 3).unwrap_err();
        match err {
            AnalysisError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("expected 3 columns, found 2"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let err = parse("1 abc 3\n", 3).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRow { line: 1, .. }));

        let err = parse("1 NaN 3\n", 3).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRow { .. }));
    }

    #[test]
    fn quotes_do_not_group_fields() {
        let err = parse("100 \"600 1200\" 500\n", 4).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRow { line: 1, .. }), "{err}");

        // An unbalanced quote must not swallow the following lines.
        let err = parse("100 \"600 1200 500\n200 900 1800 700\n", 4).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedRow { line: 1, .. }), "{err}");
    }

    #[test]
    fn invalid_utf8_is_a_malformed_row() {
        let input: &[u8] = b"100 600 1200 500\n100 6\xff0 1200 500\n";
        let err = parse_table(input, Path::new("inline.csv"), ColumnSchema::SWEPT).unwrap_err();
        match err {
            AnalysisError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("UTF-8"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let err = read_table(
            Path::new("definitely/not/here/sparse_bullshark_9000.csv"),
            ColumnSchema::SWEPT,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingFile { .. }));
    }
}
