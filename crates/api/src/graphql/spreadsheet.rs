//! Ad-hoc spreadsheet (CSV) export and import helpers.
//!
//! Exports are built in memory as CSV text and returned inline in the
//! GraphQL response; imports accept CSV text pasted or uploaded by the
//! client and report per-row outcomes instead of failing wholesale.

use async_graphql::SimpleObject;

/// An exported spreadsheet returned inline in a query response.
#[derive(Debug, SimpleObject)]
pub struct ExportFile {
    /// Suggested download file name, e.g. `production_records_2026-08-30.csv`.
    pub file_name: String,
    /// MIME type of `content` (always `text/csv`).
    pub content_type: String,
    /// The CSV text itself.
    pub content: String,
}

impl ExportFile {
    /// Build an export from a base name and CSV content, stamping today's
    /// date into the file name.
    pub fn csv(base_name: &str, content: String) -> Self {
        let today = chrono::Utc::now().format("%Y-%m-%d");
        Self {
            file_name: format!("{base_name}_{today}.csv"),
            content_type: "text/csv".to_string(),
            content,
        }
    }
}

/// Outcome of a spreadsheet import.
///
/// Rows that fail validation or reference resolution are skipped and
/// reported; the remaining rows are imported.
#[derive(Debug, Default, SimpleObject)]
pub struct ImportSummary {
    /// Number of rows successfully imported.
    pub imported: i32,
    /// Number of rows skipped due to errors.
    pub skipped: i32,
    /// One message per skipped row, prefixed with its 1-based line number.
    pub errors: Vec<String>,
}

impl ImportSummary {
    pub fn record_error(&mut self, line_no: usize, message: impl std::fmt::Display) {
        self.skipped += 1;
        self.errors.push(format!("line {line_no}: {message}"));
    }
}

/// Escape a single CSV field: quote when it contains a comma, quote, or
/// newline, doubling embedded quotes.
pub fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Build CSV text from a header row and data rows.
pub fn build_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&headers.join(","));
    out.push('\n');
    for row in rows {
        let escaped: Vec<String> = row.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }
    out
}

/// Parse CSV text into data rows, skipping the header row and blank lines.
///
/// Honors double-quoted fields with doubled-quote escapes; a quoted field
/// may span physical lines, so a record is terminated only by a newline
/// outside quotes. Returns `(1-based line number, fields)` per row, where
/// the line number is the row's first physical line, so import errors can
/// point back at the source.
pub fn parse_csv(content: &str) -> Vec<(usize, Vec<String>)> {
    let mut records: Vec<(usize, Vec<String>)> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line_no = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    current.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line_no += 1;
                    current.push('\n');
                }
                _ => current.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' => {
                    line_no += 1;
                    fields.push(std::mem::take(&mut current));
                    if fields.len() > 1 || !fields[0].trim().is_empty() {
                        records.push((record_line, std::mem::take(&mut fields)));
                    } else {
                        fields.clear();
                    }
                    record_line = line_no;
                }
                _ => current.push(c),
            }
        }
    }
    // A final record without a trailing newline.
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        if fields.len() > 1 || !fields[0].trim().is_empty() {
            records.push((record_line, fields));
        }
    }
    // The first non-blank record is the header.
    if !records.is_empty() {
        records.remove(0);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_field_unchanged() {
        assert_eq!(csv_escape("plain"), "plain");
    }

    #[test]
    fn test_escape_comma_and_quote() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_build_csv_shape() {
        let csv = build_csv(
            &["name", "qty"],
            &[
                vec!["broiler".into(), "10".into()],
                vec!["a,b".into(), "2".into()],
            ],
        );
        assert_eq!(csv, "name,qty\nbroiler,10\n\"a,b\",2\n");
    }

    #[test]
    fn test_parse_quoted_fields() {
        let rows = parse_csv("h1,h2,h3\n\"a,b\",2,\"say \"\"hi\"\"\"\n");
        assert_eq!(
            rows,
            vec![(
                2,
                vec!["a,b".to_string(), "2".to_string(), "say \"hi\"".to_string()]
            )]
        );
    }

    #[test]
    fn test_parse_quoted_newline_survives_round_trip() {
        let csv = build_csv(
            &["name", "remarks"],
            &[vec!["broiler".into(), "line one\nline two".into()]],
        );
        let rows = parse_csv(&csv);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            (
                2,
                vec!["broiler".to_string(), "line one\nline two".to_string()]
            )
        );
        // The next record's line number accounts for the spanned line.
        let rows = parse_csv(&format!("{csv}x,1\n"));
        assert_eq!(rows[1], (4, vec!["x".to_string(), "1".to_string()]));
    }

    #[test]
    fn test_parse_skips_header_and_blank_lines() {
        let rows = parse_csv("h1,h2\nx,1\n\ny,2\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], (2, vec!["x".to_string(), "1".to_string()]));
        assert_eq!(rows[1], (4, vec!["y".to_string(), "2".to_string()]));
    }

    #[test]
    fn test_import_summary_error_lines() {
        let mut summary = ImportSummary::default();
        summary.record_error(3, "unknown district code");
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors[0], "line 3: unknown district code");
    }
}
