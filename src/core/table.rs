use crate::domain::model::{Row, Table};
use crate::utils::error::{PurgeError, Result};
use csv::ReaderBuilder;

const UTF8_BOM: char = '\u{feff}';

/// Parses a delimited export into a `Table`.
///
/// Fails with `SchemaError` when either mandatory column is absent from the
/// header row. Rows shorter than the header read as empty trailing fields.
pub fn parse_table(
    data: &[u8],
    delimiter: u8,
    email_column: &str,
    status_column: &str,
) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let (email_index, status_index) = match (position(email_column), position(status_column)) {
        (Some(e), Some(s)) => (e, s),
        (e, s) => {
            let missing = [(e, email_column), (s, status_column)]
                .into_iter()
                .filter(|(idx, _)| idx.is_none())
                .map(|(_, name)| name.to_string())
                .collect();
            return Err(PurgeError::SchemaError { missing });
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(Row::new(record.iter()));
    }

    tracing::debug!(
        "Parsed {} rows with {} columns (email at {}, last sign-in at {})",
        rows.len(),
        headers.len(),
        email_index,
        status_index
    );

    Ok(Table::new(headers, rows, email_index, status_index))
}
