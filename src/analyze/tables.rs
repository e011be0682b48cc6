//! Table detection from column alignment of text positions.
//!
//! No graphical ruling lines are consulted: candidate rows come from
//! Y-proximity, cells from X gaps, and acceptance from how consistently
//! cell left edges align to per-column means.

use std::collections::HashSet;

use crate::model::{BBox, TableStructure, TextBlock};

use super::lists::marker_style;
use super::AnalyzeOptions;

/// A detected table and the position it occupies in the block stream.
#[derive(Debug, Clone)]
pub struct PageTable {
    /// Global index of the first block consumed by the table
    pub first_block: usize,
    pub table: TableStructure,
}

/// Result of table detection over the whole block stream.
#[derive(Debug, Default)]
pub struct TableDetection {
    pub tables: Vec<PageTable>,
    /// Global indices of blocks consumed by tables
    pub consumed: HashSet<usize>,
}

#[derive(Debug, Clone)]
struct Cell {
    x: f32,
    text: String,
    bold: bool,
    font_size: f32,
}

#[derive(Debug, Clone)]
struct CandidateRow {
    y: f32,
    cells: Vec<Cell>,
    block_indices: Vec<usize>,
}

/// Detect tables across all pages of an ordered block stream.
pub fn detect_tables(blocks: &[TextBlock], options: &AnalyzeOptions) -> TableDetection {
    let mut detection = TableDetection::default();
    if blocks.is_empty() {
        return detection;
    }

    let mut start = 0;
    while start < blocks.len() {
        let page = blocks[start].page;
        let mut end = start;
        while end < blocks.len() && blocks[end].page == page {
            end += 1;
        }
        if let Some(page_table) = detect_page_table(blocks, start..end, options) {
            detection.consumed.extend(page_table.1.iter().copied());
            detection.tables.push(page_table.0);
        }
        start = end;
    }

    detection
}

/// Detect at most one table on a page's block range.
fn detect_page_table(
    blocks: &[TextBlock],
    range: std::ops::Range<usize>,
    options: &AnalyzeOptions,
) -> Option<(PageTable, HashSet<usize>)> {
    let page = blocks[range.start].page;
    let rows = candidate_rows(blocks, range, options);

    if rows.len() < 2 {
        return None;
    }
    if is_list_pattern(&rows) {
        log::debug!("page {page}: aligned rows look like a list, not a table");
        return None;
    }

    let score = alignment_score(&rows, options);
    log::debug!(
        "page {page}: {} candidate rows, alignment score {score:.2}",
        rows.len()
    );
    if score < options.table_alignment_threshold {
        return None;
    }

    let column_count = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let has_header = detect_header_row(&rows[0]);

    let mut consumed: HashSet<usize> = HashSet::new();
    for row in &rows {
        consumed.extend(row.block_indices.iter().copied());
    }
    let first_block = *consumed.iter().min().unwrap();

    let min_x = rows
        .iter()
        .flat_map(|r| r.cells.iter())
        .map(|c| c.x)
        .fold(f32::MAX, f32::min);
    let bbox = BBox {
        x: min_x,
        y: rows.last().unwrap().y,
        width: 0.0,
        height: rows.first().unwrap().y - rows.last().unwrap().y,
    };

    let table = TableStructure {
        rows: rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.text.clone()).collect())
            .collect(),
        column_count,
        has_header,
        bbox,
        page,
    };

    Some((PageTable { first_block, table }, consumed))
}

/// Group a page's elements into visual rows and split rows into cells on
/// X gaps. Only rows with at least two cells are table candidates.
fn candidate_rows(
    blocks: &[TextBlock],
    range: std::ops::Range<usize>,
    options: &AnalyzeOptions,
) -> Vec<CandidateRow> {
    // (y, x, right, text, bold, size, block index)
    let mut items: Vec<(f32, f32, f32, &str, bool, f32, usize)> = Vec::new();
    for idx in range {
        for e in &blocks[idx].elements {
            items.push((e.y, e.x, e.right(), &e.text, e.bold, e.font_size, idx));
        }
    }
    items.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut rows: Vec<CandidateRow> = Vec::new();
    let mut current: Vec<(f32, f32, f32, &str, bool, f32, usize)> = Vec::new();
    let mut current_y: Option<f32> = None;

    let mut flush = |line: &mut Vec<(f32, f32, f32, &str, bool, f32, usize)>,
                     rows: &mut Vec<CandidateRow>| {
        if line.is_empty() {
            return;
        }
        let y = line[0].0;
        let mut cells: Vec<Cell> = Vec::new();
        let mut block_indices: Vec<usize> = Vec::new();
        let mut prev_right: Option<f32> = None;

        for (_, x, right, text, bold, size, idx) in line.drain(..) {
            block_indices.push(idx);
            let starts_new_cell = prev_right
                .map(|pr| x - pr >= options.table_min_column_gap)
                .unwrap_or(true);
            if starts_new_cell {
                cells.push(Cell {
                    x,
                    text: text.trim().to_string(),
                    bold,
                    font_size: size,
                });
            } else {
                let cell = cells.last_mut().unwrap();
                if !cell.text.is_empty() {
                    cell.text.push(' ');
                }
                cell.text.push_str(text.trim());
                cell.bold |= bold;
                cell.font_size = cell.font_size.max(size);
            }
            prev_right = Some(right);
        }

        if cells.len() >= 2 {
            block_indices.sort_unstable();
            block_indices.dedup();
            rows.push(CandidateRow {
                y,
                cells,
                block_indices,
            });
        }
    };

    for item in items {
        match current_y {
            Some(y) if (item.0 - y).abs() <= options.table_row_tolerance => {
                current.push(item);
            }
            _ => {
                flush(&mut current, &mut rows);
                current_y = Some(item.0);
                current.push(item);
            }
        }
    }
    flush(&mut current, &mut rows);

    rows
}

/// Mean per-column alignment score: the fraction of cells whose left edge
/// falls within tolerance of the column's mean X, averaged over up to
/// `table_max_columns` columns that have at least two cells.
fn alignment_score(rows: &[CandidateRow], options: &AnalyzeOptions) -> f32 {
    let mut total = 0.0f32;
    let mut columns_scored = 0usize;

    for col in 0..options.table_max_columns {
        let xs: Vec<f32> = rows.iter().filter_map(|r| r.cells.get(col).map(|c| c.x)).collect();
        if xs.len() < 2 {
            continue;
        }
        let mean = xs.iter().sum::<f32>() / xs.len() as f32;
        let aligned = xs
            .iter()
            .filter(|x| (**x - mean).abs() <= options.table_column_tolerance)
            .count();
        total += aligned as f32 / xs.len() as f32;
        columns_scored += 1;
    }

    if columns_scored == 0 {
        0.0
    } else {
        total / columns_scored as f32
    }
}

/// Reject aligned rows that are actually a marker list: a bullet or number
/// marker split into its own span looks exactly like a two-column table.
fn is_list_pattern(rows: &[CandidateRow]) -> bool {
    let marker_rows = rows
        .iter()
        .filter(|r| {
            r.cells
                .first()
                .map(|c| marker_style(&c.text).is_some() || is_bare_marker(&c.text))
                .unwrap_or(false)
        })
        .count();
    marker_rows as f32 / rows.len() as f32 >= 0.5
}

/// A cell that is nothing but a marker: "•", "-", "1.", "12)", "a.", "3".
/// The marker regexes require trailing item text, so bare markers that
/// were split into their own span need a separate check.
fn is_bare_marker(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    if matches!(
        trimmed,
        "-" | "\u{2013}" | "\u{2014}" | "\u{2022}" | "\u{00B7}" | "*" | "\u{25E6}" | "\u{25AA}"
            | "\u{2023}" | "\u{2043}"
    ) {
        return true;
    }

    let cleaned: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    // Digits followed by "." or ")", e.g. "1.", "12)"
    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (prefix, suffix) = cleaned.split_at(pos);
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    // A bare number
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    // Letter marker: "a.", "B)"
    if cleaned.chars().count() == 2 {
        let chars: Vec<char> = cleaned.chars().collect();
        if chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')') {
            return true;
        }
    }

    false
}

/// Flag the first row as a header when it is formatted distinctly or all
/// of its cells read like short title-cased labels.
fn detect_header_row(first: &CandidateRow) -> bool {
    let distinct_formatting = first.cells.iter().any(|c| c.bold || c.font_size > 12.0);

    let looks_like_labels = !first.cells.is_empty()
        && first.cells.iter().all(|c| {
            c.text.chars().count() < 50
                && c.text.chars().next().map(|ch| ch.is_uppercase()).unwrap_or(false)
        });

    distinct_formatting || looks_like_labels
}
