#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Detection quality for one table, both values in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsingReport {
    pub page: u32,
    pub order: usize,
    pub accuracy: f32,
    pub whitespace: f32,
}

/// A rectangular grid of cells detected on one page. `order` is the 1-based
/// position of the table on its page.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub page: u32,
    pub order: usize,
    pub rows: Vec<Vec<String>>,
    pub report: ParsingReport,
}

impl Table {
    /// Builds a table from raw rows, padding every row to the widest one.
    #[must_use]
    pub fn from_rows(page: u32, order: usize, rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let accuracy = crate::table_detect::row_consistency(&rows) * 100.0;
        let rows = crate::table_parse::pad_rows(&rows, width);
        let whitespace = crate::table_parse::empty_cell_ratio(&rows) * 100.0;

        Self {
            page,
            order,
            rows,
            report: ParsingReport {
                page,
                order,
                accuracy,
                whitespace,
            },
        }
    }

    /// `(rows, columns)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Tables in extraction order: ascending page, then position on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableList {
    tables: Vec<Table>,
}

impl TableList {
    #[must_use]
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Table> {
        self.tables.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }
}

impl<'a> IntoIterator for &'a TableList {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
