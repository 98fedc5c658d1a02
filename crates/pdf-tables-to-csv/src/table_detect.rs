use crate::model::{PageText, Table};
use crate::options::{Flavor, ReadOptions};
use crate::table_parse::{modal_width, split_line_into_cells, word_cells};

/// Share of rows matching the modal width, blended with how far the widest
/// and narrowest rows diverge. Returns a value in `0.0..=1.0`.
pub(crate) fn row_consistency(rows: &[Vec<String>]) -> f32 {
    let modal = modal_width(rows);
    if modal == 0 {
        return 0.0;
    }

    let consistent =
        rows.iter().filter(|row| row.len() == modal).count() as f32 / rows.len() as f32;
    let max_width = rows.iter().map(Vec::len).max().unwrap_or(modal);
    let min_width = rows.iter().map(Vec::len).min().unwrap_or(modal);
    let uniformity = if max_width == 0 {
        0.0
    } else {
        1.0 - ((max_width - min_width) as f32 / max_width as f32)
    };

    (consistent * 0.75 + uniformity * 0.25).clamp(0.0, 1.0)
}

fn stream_cells(line: &str, min_cols: usize) -> Vec<String> {
    let cells = split_line_into_cells(line);
    if cells.len() >= min_cols {
        return cells;
    }

    let soft_cells = word_cells(line);
    let has_numeric = soft_cells
        .iter()
        .any(|cell| cell.chars().any(|ch| ch.is_ascii_digit()));
    let looks_like_sentence = ['.', '!', '?']
        .iter()
        .any(|punctuation| line.trim_end().ends_with(*punctuation));
    if soft_cells.len() >= min_cols && !looks_like_sentence && (has_numeric || soft_cells.len() <= 6)
    {
        soft_cells
    } else {
        cells
    }
}

fn detect_stream_tables(page: &PageText, min_cols: usize) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current_rows: Vec<Vec<String>> = Vec::new();

    let mut flush_current = |rows: &mut Vec<Vec<String>>| {
        if rows.len() >= 2 {
            let order = tables.len() + 1;
            tables.push(Table::from_rows(
                page.page_number,
                order,
                std::mem::take(rows),
            ));
        } else {
            rows.clear();
        }
    };

    for line in page.text.lines() {
        let cells = stream_cells(line, min_cols);
        if cells.len() >= min_cols {
            current_rows.push(cells);
        } else {
            flush_current(&mut current_rows);
        }
    }
    flush_current(&mut current_rows);

    tables
}

pub(crate) fn detect_tables(pages: &[PageText], options: &ReadOptions) -> Vec<Table> {
    let min_cols = options.min_cols.max(2);
    let mut tables = Vec::new();
    for page in pages {
        let found = match options.flavor {
            Flavor::Stream => detect_stream_tables(page, min_cols),
        };
        tracing::debug!(
            page = page.page_number,
            tables = found.len(),
            "stream detection finished"
        );
        tables.extend(found);
    }
    tables
}
