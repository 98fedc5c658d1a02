use std::collections::BTreeMap;
use std::iter;

/// Cells are separated by tabs or by runs of two or more spaces. Single
/// spaces stay inside the cell.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    line.split('\t').flat_map(split_on_wide_gaps).collect()
}

fn split_on_wide_gaps(segment: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut gap = 0_usize;

    for ch in segment.chars() {
        if ch.is_whitespace() {
            gap += 1;
            continue;
        }
        if !cell.is_empty() {
            match gap {
                0 => {}
                1 => cell.push(' '),
                _ => cells.push(std::mem::take(&mut cell)),
            }
        }
        gap = 0;
        cell.push(ch);
    }

    if !cell.is_empty() {
        cells.push(cell);
    }
    cells
}

/// Every whitespace-separated word as its own cell.
pub(crate) fn word_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Right-pads each row with empty cells up to `width`.
pub(crate) fn pad_rows(rows: &[Vec<String>], width: usize) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .cloned()
                .chain(iter::repeat(String::new()))
                .take(width.max(row.len()))
                .collect()
        })
        .collect()
}

pub(crate) fn empty_cell_ratio(rows: &[Vec<String>]) -> f32 {
    let (empty, total) = rows
        .iter()
        .flatten()
        .fold((0_usize, 0_usize), |(empty, total), cell| {
            (empty + usize::from(cell.trim().is_empty()), total + 1)
        });

    if total == 0 {
        0.0
    } else {
        empty as f32 / total as f32
    }
}

/// Most common row width; ties go to the wider one.
pub(crate) fn modal_width(rows: &[Vec<String>]) -> usize {
    let counts = rows.iter().fold(BTreeMap::new(), |mut counts, row| {
        *counts.entry(row.len()).or_insert(0_usize) += 1;
        counts
    });

    counts
        .into_iter()
        .max_by_key(|&(width, count)| (count, width))
        .map_or(0, |(width, _)| width)
}

#[cfg(test)]
mod tests {
    use super::{empty_cell_ratio, modal_width, pad_rows, split_line_into_cells, word_cells};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    #[test]
    fn splits_double_space_separated_cells() {
        assert_eq!(split_line_into_cells("Alice  30  98"), vec!["Alice", "30", "98"]);
    }

    #[test]
    fn keeps_single_spaces_inside_a_cell() {
        let cells = split_line_into_cells("  New York   8,336,817\tUSA ");
        assert_eq!(cells, vec!["New York", "8,336,817", "USA"]);
    }

    #[test]
    fn blank_lines_have_no_cells() {
        assert!(split_line_into_cells("   \t  ").is_empty());
    }

    #[test]
    fn word_cells_split_on_any_whitespace() {
        assert_eq!(word_cells("Name Age  Score"), vec!["Name", "Age", "Score"]);
    }

    #[test]
    fn pads_ragged_rows() {
        let padded = pad_rows(&[row(&["a"]), row(&["b", "c"])], 3);
        assert_eq!(padded, vec![row(&["a", "", ""]), row(&["b", "c", ""])]);
    }

    #[test]
    fn counts_empty_cells() {
        let rows = vec![row(&["a", ""]), row(&[" ", "d"])];
        assert!((empty_cell_ratio(&rows) - 0.5).abs() < f32::EPSILON);
        assert!(empty_cell_ratio(&[]).abs() < f32::EPSILON);
    }

    #[test]
    fn detects_modal_width() {
        let rows = vec![row(&["a", "b"]), row(&["1", "2"]), row(&["x"])];
        assert_eq!(modal_width(&rows), 2);
        assert_eq!(modal_width(&[row(&["x"]), row(&["y", "z"])]), 2);
        assert_eq!(modal_width(&[]), 0);
    }
}
