use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;

/// Rows are written as-is; there is no synthetic header line.
pub fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv_to_string(rows: &[Vec<String>]) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::<u8>::new());
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

#[cfg(test)]
mod tests {
    use super::write_csv_to_string;

    #[test]
    fn quotes_delimiters_and_keeps_first_row_as_data() {
        let rows = vec![
            vec!["City".to_string(), "Note".to_string()],
            vec!["Paris".to_string(), "big, \"old\"".to_string()],
        ];

        let csv = write_csv_to_string(&rows).expect("csv should render");
        assert_eq!(csv, "City,Note\nParis,\"big, \"\"old\"\"\"\n");
    }

    #[test]
    fn empty_grid_renders_empty_text() {
        assert_eq!(write_csv_to_string(&[]).expect("csv should render"), "");
    }
}
