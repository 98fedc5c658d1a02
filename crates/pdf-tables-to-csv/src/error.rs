use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("page {page} is out of range (document has {page_count} page(s))")]
    PageOutOfRange { page: u32, page_count: usize },

    #[error("no pages available after applying selection")]
    NoPagesSelected,

    #[error("table index {index} is out of range ({table_count} table(s) found)")]
    TableIndexOutOfRange { index: usize, table_count: usize },

    #[error("invalid option: {0}")]
    InvalidOption(String),
}
