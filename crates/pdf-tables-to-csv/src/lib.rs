mod charset;
mod concat;
mod convert;
mod csv_out;
mod error;
mod model;
mod options;
mod pdf_reader;
mod table_detect;
mod table_parse;

use std::path::Path;

use crate::pdf_reader::{PdfSource, read_pdf_pages};
use crate::table_detect::detect_tables;

pub use charset::{DetectedCharset, detect_charset};
pub use concat::concat_tables;
pub use convert::{
    CONTINUOUS_FILE_NAME, ContinuousExport, Conversion, ConvertOptions, CsvExport,
    DEFAULT_PAGE_NUMBER, STAGED_UPLOAD_FILE_NAME, SinglePageExport, assemble, convert_pdf_bytes,
    convert_pdf_file, page_spec_for, single_page_file_name, stage_upload,
};
pub use csv_out::{write_csv, write_csv_to_string};
pub use error::ExtractError;
pub use model::{ParsingReport, Table, TableList};
pub use options::{Flavor, PageRange, PageSpec, ReadOptions};

fn read_tables(source: PdfSource<'_>, options: &ReadOptions) -> Result<TableList, ExtractError> {
    let pages = read_pdf_pages(source, &options.pages)?;
    let tables = detect_tables(&pages, options);
    tracing::debug!(
        pages = pages.len(),
        tables = tables.len(),
        flavor = %options.flavor,
        "table extraction finished"
    );
    Ok(TableList::new(tables))
}

/// Extracts the tables found on the selected pages of a PDF file.
pub fn read_pdf(input_pdf: &Path, options: &ReadOptions) -> Result<TableList, ExtractError> {
    read_tables(PdfSource::Path(input_pdf), options)
}

/// Same as [`read_pdf`] for a PDF already held in memory.
pub fn read_pdf_bytes(input_pdf: &[u8], options: &ReadOptions) -> Result<TableList, ExtractError> {
    read_tables(PdfSource::Bytes(input_pdf), options)
}
