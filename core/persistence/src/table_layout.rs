//! FILENAME: core/persistence/src/table_layout.rs
//! Table layout for the printable document.
//!
//! This module turns a cell matrix into positioned pages: column widths,
//! wrapped cell lines, row heights and page breaks. The PDF writer only
//! draws what the layout says, so the layout is also the place to read the
//! exact cell text of the document back from.
//!
//! Positions are measured in points from the top-left corner of the page.

use crate::config::PageSetup;

// ============================================================================
// LAYOUT TYPES
// ============================================================================

/// A laid-out table, split across one or more pages.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub title: String,
    /// Left edge of each column.
    pub column_x: Vec<f32>,
    pub column_widths: Vec<f32>,
    pub pages: Vec<PageLayout>,
}

/// Rows placed on a single page. The first row of every page is the header.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub rows: Vec<PlacedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub kind: RowKind,
    /// Distance from the top edge of the page to the top of the row.
    pub top: f32,
    pub height: f32,
    pub cells: Vec<LaidOutCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    /// Body row with its index into the source rows.
    Record(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutCell {
    /// Full cell text, as it appears in the spreadsheet.
    pub text: String,
    /// `text` wrapped to the column width.
    pub lines: Vec<String>,
}

impl TableLayout {
    /// Text of every record row in source order, one entry per column.
    pub fn record_text(&self) -> Vec<Vec<String>> {
        self.pages
            .iter()
            .flat_map(|page| page.rows.iter())
            .filter(|row| matches!(row.kind, RowKind::Record(_)))
            .map(|row| row.cells.iter().map(|c| c.text.clone()).collect())
            .collect()
    }

    pub fn header_text(&self) -> Vec<String> {
        self.pages
            .first()
            .and_then(|page| page.rows.first())
            .map(|row| row.cells.iter().map(|c| c.text.clone()).collect())
            .unwrap_or_default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Lay out `headers` and `body` on pages described by `page`.
///
/// Rows that do not fit move to the next page and the header repeats at the
/// top of each page. A row taller than a whole page is still placed, alone,
/// and runs past the bottom margin.
pub fn layout_table(title: &str, headers: &[&str], body: &[Vec<&str>], page: &PageSetup) -> TableLayout {
    let column_widths = column_widths(headers, body, page);
    let mut column_x = Vec::with_capacity(column_widths.len());
    let mut x = page.margin;
    for width in &column_widths {
        column_x.push(x);
        x += width;
    }

    let header = lay_out_row(headers, &column_widths, page);
    let header_height = row_height(&header, page);
    let bottom = page.table_bottom();

    let mut pages = Vec::new();
    let mut current = PageLayout { rows: Vec::new() };
    let mut cursor = page.first_table_top();
    place(&mut current, &mut cursor, RowKind::Header, header.clone(), header_height);

    for (index, values) in body.iter().enumerate() {
        let row = lay_out_row(values, &column_widths, page);
        let height = row_height(&row, page);
        let page_has_records = current.rows.len() > 1;

        if cursor + height > bottom && page_has_records {
            pages.push(std::mem::replace(&mut current, PageLayout { rows: Vec::new() }));
            cursor = page.margin;
            place(&mut current, &mut cursor, RowKind::Header, header.clone(), header_height);
        }
        place(&mut current, &mut cursor, RowKind::Record(index), row, height);
    }
    pages.push(current);

    log::debug!(
        "laid out {} rows x {} columns on {} page(s)",
        body.len(),
        headers.len(),
        pages.len()
    );

    TableLayout {
        title: title.to_string(),
        column_x,
        column_widths,
        pages,
    }
}

fn place(page: &mut PageLayout, cursor: &mut f32, kind: RowKind, cells: Vec<LaidOutCell>, height: f32) {
    page.rows.push(PlacedRow {
        kind,
        top: *cursor,
        height,
        cells,
    });
    *cursor += height;
}

fn row_height(cells: &[LaidOutCell], page: &PageSetup) -> f32 {
    let lines = cells.iter().map(|c| c.lines.len().max(1)).max().unwrap_or(1);
    lines as f32 * page.line_height() + 2.0 * page.cell_padding
}

fn lay_out_row(values: &[&str], column_widths: &[f32], page: &PageSetup) -> Vec<LaidOutCell> {
    values
        .iter()
        .zip(column_widths)
        .map(|(text, width)| LaidOutCell {
            text: text.to_string(),
            lines: wrap_text(text, width - 2.0 * page.cell_padding, page.body_font_size),
        })
        .collect()
}

/// Widths proportional to each column's widest text, filling the content width.
fn column_widths(headers: &[&str], body: &[Vec<&str>], page: &PageSetup) -> Vec<f32> {
    let available = page.content_width();
    if headers.is_empty() {
        return Vec::new();
    }

    let natural: Vec<f32> = (0..headers.len())
        .map(|col| {
            let widest = std::iter::once(headers[col])
                .chain(body.iter().filter_map(|row| row.get(col).copied()))
                .map(|text| text_width(text, page.body_font_size))
                .fold(0.0, f32::max);
            widest + 2.0 * page.cell_padding
        })
        .collect();

    let total: f32 = natural.iter().sum();
    if total <= 0.0 {
        let even = available / headers.len() as f32;
        return vec![even; headers.len()];
    }
    natural.iter().map(|w| w / total * available).collect()
}

// ============================================================================
// TEXT METRICS
// ============================================================================

/// Approximate Helvetica advance width, in ems.
fn glyph_width(c: char) -> f32 {
    match c {
        _ if c.is_control() => 0.0,
        'i' | 'j' | 'l' | '\'' | '|' | '!' | '.' | ',' | ':' | ';' => 0.24,
        ' ' | 'f' | 't' | 'I' | '[' | ']' | '(' | ')' | '/' | '\\' => 0.28,
        'r' | '-' => 0.33,
        'm' | 'M' | 'W' | '%' | '@' => 0.85,
        'w' => 0.72,
        'A'..='Z' => 0.67,
        '0'..='9' => 0.56,
        _ => 0.5,
    }
}

pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(glyph_width).sum::<f32>() * font_size
}

/// Width of `text` without its trailing whitespace, which may overhang.
fn inked_width(text: &str, font_size: f32) -> f32 {
    text_width(text.trim_end(), font_size)
}

/// Greedy word wrap. Lines break after whitespace; words wider than
/// `max_width` are broken between characters.
///
/// The lines concatenate back to `text` exactly: whitespace at a break and
/// each hard `\n` stay at the end of their line. Empty text has no lines.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split_inclusive('\n') {
        let mut line = String::new();
        for chunk in word_chunks(paragraph) {
            let candidate = format!("{}{}", line, chunk);
            if inked_width(&candidate, font_size) <= max_width {
                line = candidate;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if inked_width(chunk, font_size) <= max_width {
                line = chunk.to_string();
            } else {
                let mut pieces = break_word(chunk, max_width, font_size);
                line = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

/// Split into words, each carrying the whitespace that follows it.
/// Leading whitespace forms a chunk of its own.
fn word_chunks(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut after_space = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            after_space = true;
        } else if after_space {
            if i > start {
                chunks.push(&text[start..i]);
            }
            start = i;
            after_space = false;
        }
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

fn break_word(word: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        let overflows = text_width(&piece, font_size) + glyph_width(c) * font_size > max_width;
        if !piece.is_empty() && !c.is_whitespace() && overflows {
            pieces.push(std::mem::take(&mut piece));
        }
        piece.push(c);
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
