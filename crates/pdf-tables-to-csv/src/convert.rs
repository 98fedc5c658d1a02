use std::path::{Path, PathBuf};

use crate::charset::{DetectedCharset, detect_charset};
use crate::concat::concat_tables;
use crate::csv_out::write_csv_to_string;
use crate::error::ExtractError;
use crate::model::TableList;
use crate::options::{PageSpec, ReadOptions};
use crate::{read_pdf, read_pdf_bytes};

pub const CONTINUOUS_FILE_NAME: &str = "continuous_output.csv";
pub const STAGED_UPLOAD_FILE_NAME: &str = "input.pdf";
pub const DEFAULT_PAGE_NUMBER: &str = "1";

/// User choices for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Merge the tables of every page into one CSV and ignore `page_number`.
    pub continuous: bool,
    /// Free-text page specifier, passed through to the page parser untouched.
    pub page_number: String,
    /// Zero-based table to export in single-page mode.
    pub table_index: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            continuous: false,
            page_number: DEFAULT_PAGE_NUMBER.to_string(),
            table_index: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub rows: Vec<Vec<String>>,
    pub csv: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousExport {
    pub source_tables: usize,
    pub detected_charset: DetectedCharset,
    pub export: CsvExport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SinglePageExport {
    pub page_number: String,
    pub table_count: usize,
    pub selected: usize,
    pub export: CsvExport,
}

impl SinglePageExport {
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Found {} table(s) on page {}",
            self.table_count, self.page_number
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// Extraction succeeded but found nothing; nothing is exported.
    NoTables { message: String },
    Continuous(ContinuousExport),
    SinglePage(SinglePageExport),
}

#[must_use]
pub fn single_page_file_name(page_number: &str, table_index: usize) -> String {
    format!("output_table_page{page_number}_table{}.csv", table_index + 1)
}

/// Page selection sent to the extractor for the given options.
pub fn page_spec_for(options: &ConvertOptions) -> Result<PageSpec, ExtractError> {
    if options.continuous {
        Ok(PageSpec::All)
    } else {
        options.page_number.parse()
    }
}

/// Turns an extraction result into the continuous or single-page export.
pub fn assemble(tables: &TableList, options: &ConvertOptions) -> Result<Conversion, ExtractError> {
    if options.continuous {
        assemble_continuous(tables)
    } else {
        assemble_single_page(tables, options)
    }
}

fn assemble_continuous(tables: &TableList) -> Result<Conversion, ExtractError> {
    if tables.is_empty() {
        return Ok(Conversion::NoTables {
            message: "No tables found in the PDF.".to_string(),
        });
    }

    let rows = concat_tables(tables);
    let csv = write_csv_to_string(&rows)?;
    let detected_charset = detect_charset(csv.as_bytes());
    tracing::info!(
        tables = tables.len(),
        rows = rows.len(),
        encoding = detected_charset.encoding,
        confidence = detected_charset.confidence,
        "combined tables across all pages"
    );

    Ok(Conversion::Continuous(ContinuousExport {
        source_tables: tables.len(),
        detected_charset,
        export: CsvExport {
            rows,
            csv,
            file_name: CONTINUOUS_FILE_NAME.to_string(),
        },
    }))
}

fn assemble_single_page(
    tables: &TableList,
    options: &ConvertOptions,
) -> Result<Conversion, ExtractError> {
    if tables.is_empty() {
        return Ok(Conversion::NoTables {
            message: format!("No tables found on page {}.", options.page_number),
        });
    }

    let table = tables
        .get(options.table_index)
        .ok_or(ExtractError::TableIndexOutOfRange {
            index: options.table_index,
            table_count: tables.len(),
        })?;
    let csv = write_csv_to_string(&table.rows)?;
    tracing::info!(
        page = %options.page_number,
        tables = tables.len(),
        selected = options.table_index,
        "selected table for export"
    );

    Ok(Conversion::SinglePage(SinglePageExport {
        page_number: options.page_number.clone(),
        table_count: tables.len(),
        selected: options.table_index,
        export: CsvExport {
            rows: table.rows.clone(),
            csv,
            file_name: single_page_file_name(&options.page_number, options.table_index),
        },
    }))
}

pub fn convert_pdf_bytes(
    input_pdf: &[u8],
    options: &ConvertOptions,
) -> Result<Conversion, ExtractError> {
    let read_options = ReadOptions::for_pages(page_spec_for(options)?);
    let tables = read_pdf_bytes(input_pdf, &read_options)?;
    assemble(&tables, options)
}

pub fn convert_pdf_file(
    input_pdf: &Path,
    options: &ConvertOptions,
) -> Result<Conversion, ExtractError> {
    let read_options = ReadOptions::for_pages(page_spec_for(options)?);
    let tables = read_pdf(input_pdf, &read_options)?;
    assemble(&tables, options)
}

/// Writes uploaded bytes to `dir/input.pdf`, replacing whatever an earlier
/// run left there.
pub fn stage_upload(dir: &Path, bytes: &[u8]) -> Result<PathBuf, ExtractError> {
    let path = dir.join(STAGED_UPLOAD_FILE_NAME);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{Conversion, ConvertOptions, assemble, page_spec_for, single_page_file_name};
    use crate::error::ExtractError;
    use crate::model::{Table, TableList};
    use crate::options::PageSpec;

    fn table(page: u32, order: usize, rows: &[&[&str]]) -> Table {
        Table::from_rows(
            page,
            order,
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        )
    }

    fn sample() -> TableList {
        TableList::new(vec![
            table(3, 1, &[&["Name", "Age"], &["Ann", "31"]]),
            table(3, 2, &[&["Item", "Qty", "Price"], &["Pen", "3", "1.5"], &["Cup", "1", "4"]]),
        ])
    }

    #[test]
    fn single_page_exports_selected_table() {
        let options = ConvertOptions {
            page_number: "3".to_string(),
            table_index: 1,
            ..ConvertOptions::default()
        };

        let Conversion::SinglePage(export) = assemble(&sample(), &options).expect("assemble")
        else {
            panic!("expected single-page export");
        };
        assert_eq!(export.table_count, 2);
        assert_eq!(export.summary(), "Found 2 table(s) on page 3");
        assert_eq!(export.export.file_name, "output_table_page3_table2.csv");
        assert_eq!(export.export.csv, "Item,Qty,Price\nPen,3,1.5\nCup,1,4\n");
    }

    #[test]
    fn continuous_stacks_every_table() {
        let options = ConvertOptions {
            continuous: true,
            ..ConvertOptions::default()
        };

        let Conversion::Continuous(export) = assemble(&sample(), &options).expect("assemble")
        else {
            panic!("expected continuous export");
        };
        assert_eq!(export.source_tables, 2);
        assert_eq!(export.export.rows.len(), 5);
        assert_eq!(export.export.rows[1], vec!["Ann", "31", ""]);
        assert_eq!(export.export.file_name, "continuous_output.csv");
        assert_eq!(export.detected_charset.encoding, "ascii");
    }

    #[test]
    fn empty_results_report_no_tables_per_mode() {
        let empty = TableList::default();

        let continuous = ConvertOptions {
            continuous: true,
            ..ConvertOptions::default()
        };
        assert_eq!(
            assemble(&empty, &continuous).expect("assemble"),
            Conversion::NoTables {
                message: "No tables found in the PDF.".to_string()
            }
        );

        let single = ConvertOptions {
            page_number: "7".to_string(),
            ..ConvertOptions::default()
        };
        assert_eq!(
            assemble(&empty, &single).expect("assemble"),
            Conversion::NoTables {
                message: "No tables found on page 7.".to_string()
            }
        );
    }

    #[test]
    fn rejects_selection_past_last_table() {
        let options = ConvertOptions {
            table_index: 2,
            ..ConvertOptions::default()
        };

        let err = assemble(&sample(), &options).expect_err("index 2 does not exist");
        assert!(matches!(
            err,
            ExtractError::TableIndexOutOfRange {
                index: 2,
                table_count: 2
            }
        ));
    }

    #[test]
    fn continuous_mode_ignores_page_number() {
        let options = ConvertOptions {
            continuous: true,
            page_number: "not a page".to_string(),
            table_index: 0,
        };
        assert_eq!(page_spec_for(&options).expect("all pages"), PageSpec::All);
    }

    #[test]
    fn file_name_uses_literal_page_text() {
        assert_eq!(
            single_page_file_name("1-3", 0),
            "output_table_page1-3_table1.csv"
        );
    }
}
