use crate::domain::model::OutputRecord;
use crate::utils::error::{PurgeError, Result};
use csv::{Terminator, WriterBuilder};
use std::path::{Path, PathBuf};

/// `<input dir>/<domain><suffix>`, e.g. `exports/x.com-to-delete.csv`.
pub fn output_path(input: &Path, domain: &str, suffix: &str) -> PathBuf {
    let file_name = format!("{}{}", domain, suffix);
    match input.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Serializes the worklist: a `primaryEmail` header and one row per record.
pub fn render_worklist(records: &[OutputRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    // Written explicitly so an empty worklist still carries its header.
    writer.write_record(["primaryEmail"])?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| PurgeError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(emails: &[&str]) -> Vec<OutputRecord> {
        emails
            .iter()
            .map(|e| OutputRecord {
                primary_email: e.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_render_header_and_rows() {
        let bytes = render_worklist(&records(&["b@x.com", "c@x.com"])).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "primaryEmail\nb@x.com\nc@x.com\n"
        );
    }

    #[test]
    fn test_render_reads_back_with_csv_reader() {
        let bytes = render_worklist(&records(&["a@x.com", "b@x.com", "c@x.com"])).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        let headers: Vec<&str> = reader.headers().unwrap().iter().collect();
        assert_eq!(headers, vec!["primaryEmail"]);
        let rows: Vec<OutputRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, records(&["a@x.com", "b@x.com", "c@x.com"]));
    }

    #[test]
    fn test_output_path_is_sibling_of_input() {
        let path = output_path(Path::new("/data/exports/users.csv"), "x.com", "-to-delete.csv");
        assert_eq!(path, PathBuf::from("/data/exports/x.com-to-delete.csv"));

        let relative = output_path(Path::new("users.csv"), "x.com", "-to-delete.csv");
        assert_eq!(relative, PathBuf::from("x.com-to-delete.csv"));
    }
}
