use crate::model::Table;
use crate::table_parse::pad_rows;

/// Stacks every table's rows in order. Columns line up by position only, and
/// narrower tables are padded with empty cells to the widest table.
#[must_use]
pub fn concat_tables<'a, I>(tables: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = &'a Table>,
{
    let tables = tables.into_iter().collect::<Vec<_>>();
    let width = tables
        .iter()
        .map(|table| table.column_count())
        .max()
        .unwrap_or(0);

    tables
        .iter()
        .flat_map(|table| pad_rows(&table.rows, width))
        .collect()
}
