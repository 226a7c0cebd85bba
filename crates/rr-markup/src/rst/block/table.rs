//! Grid tables, simple tables and CSV table data.

use std::collections::BTreeSet;

use super::{Block, BlockParser, Line, dedent, ends_without_blank};
use crate::message::SystemMessage;
use crate::rst::inline::Inline;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cell {
    pub rowspan: usize,
    pub colspan: usize,
    pub body: Vec<Block>,
}

impl Cell {
    pub(crate) fn new(body: Vec<Block>) -> Self {
        Self {
            rowspan: 1,
            colspan: 1,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Table {
    pub title: Option<Vec<Inline>>,
    pub head: Vec<Vec<Cell>>,
    pub body: Vec<Vec<Cell>>,
}

impl Table {
    /// Split `rows` into `header_rows` header rows and the body.
    pub(crate) fn new(mut rows: Vec<Vec<Cell>>, header_rows: usize) -> Self {
        let body = rows.split_off(header_rows.min(rows.len()));
        Self {
            title: None,
            head: rows,
            body,
        }
    }
}

/// Top border of a grid table, `+-----+-----+`.
pub(super) fn is_grid_border(text: &str) -> bool {
    text.len() >= 3
        && text.starts_with("+-")
        && text.ends_with("-+")
        && text.chars().all(|c| c == '+' || c == '-')
}

/// Top border of a simple table: at least two runs of `=`.
pub(super) fn is_simple_border(text: &str) -> bool {
    text.starts_with('=')
        && text.chars().all(|c| c == '=' || c == ' ')
        && text.split(' ').filter(|run| !run.is_empty()).count() >= 2
}

/// Any later simple table border, which may span all columns.
fn is_simple_rule(text: &str, ch: char) -> bool {
    text.starts_with(ch) && text.chars().all(|c| c == ch || c == ' ')
}

/// The characters `from..to` of `text`, clamped to its length.
fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let byte = |n: usize| text.char_indices().nth(n).map_or(text.len(), |(b, _)| b);
    let start = byte(from);
    &text[start..byte(to).max(start)]
}

/// A cell line from a slice of a table row, indentation kept relative to
/// the cell's left edge.
fn cell_line<'a>(no: usize, offset: usize, slice: &'a str) -> Line<'a> {
    let text = slice.trim();
    Line {
        no,
        indent: if text.is_empty() {
            0
        } else {
            offset + slice.chars().take_while(|c| *c == ' ').count()
        },
        text,
    }
}

/// Cell rectangle in grid coordinates: top, left, bottom, right.
type Rect = (usize, usize, usize, usize);

/// Grid table cell scanner.
///
/// Starting from the top-left corner, each cell is traced right, down, left
/// and up along its border; corners of finished cells seed the next scans.
struct GridScanner<'g> {
    grid: &'g [Vec<char>],
    bottom: usize,
    right: usize,
    /// One past the last finished row, per column.
    done: Vec<usize>,
    rowseps: BTreeSet<usize>,
    colseps: BTreeSet<usize>,
    cells: Vec<Rect>,
}

impl<'g> GridScanner<'g> {
    fn new(grid: &'g [Vec<char>]) -> Self {
        let width = grid.first().map_or(0, Vec::len);
        Self {
            grid,
            bottom: grid.len().saturating_sub(1),
            right: width.saturating_sub(1),
            done: vec![0; width],
            rowseps: BTreeSet::from([0]),
            colseps: BTreeSet::from([0]),
            cells: Vec::new(),
        }
    }

    /// Trace every cell; false when the grid is malformed.
    fn scan(&mut self) -> bool {
        let mut corners = vec![(0, 0)];
        while !corners.is_empty() {
            let (top, left) = corners.remove(0);
            if top == self.bottom
                || left == self.right
                || top < self.done[left]
                || self.grid[top][left] != '+'
            {
                continue;
            }
            let Some((bottom, right, rowseps, colseps)) = self.scan_right(top, left) else {
                continue;
            };
            self.rowseps.extend(rowseps);
            self.colseps.extend(colseps);
            for col in left..right {
                self.done[col] = bottom;
            }
            self.cells.push((top, left, bottom, right));
            corners.push((top, right));
            corners.push((bottom, left));
            corners.sort_unstable();
        }
        self.done[..self.right].iter().all(|&d| d == self.bottom)
    }

    fn scan_right(&self, top: usize, left: usize) -> Option<(usize, usize, Vec<usize>, Vec<usize>)> {
        let line = &self.grid[top];
        let mut colseps = Vec::new();
        for i in left + 1..=self.right {
            match line[i] {
                '+' => {
                    colseps.push(i);
                    if let Some((bottom, rowseps, more)) = self.scan_down(top, left, i) {
                        colseps.extend(more);
                        return Some((bottom, i, rowseps, colseps));
                    }
                }
                '-' => {}
                _ => return None,
            }
        }
        None
    }

    fn scan_down(&self, top: usize, left: usize, right: usize) -> Option<(usize, Vec<usize>, Vec<usize>)> {
        let mut rowseps = Vec::new();
        for i in top + 1..=self.bottom {
            match self.grid[i][right] {
                '+' => {
                    rowseps.push(i);
                    if let Some((more, colseps)) = self.scan_left(top, left, i, right) {
                        rowseps.extend(more);
                        return Some((i, rowseps, colseps));
                    }
                }
                '|' => {}
                _ => return None,
            }
        }
        None
    }

    fn scan_left(
        &self,
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
    ) -> Option<(Vec<usize>, Vec<usize>)> {
        let line = &self.grid[bottom];
        let mut colseps = Vec::new();
        for i in (left + 1..right).rev() {
            match line[i] {
                '+' => colseps.push(i),
                '-' => {}
                _ => return None,
            }
        }
        if line[left] != '+' {
            return None;
        }
        let rowseps = self.scan_up(top, left, bottom)?;
        Some((rowseps, colseps))
    }

    fn scan_up(&self, top: usize, left: usize, bottom: usize) -> Option<Vec<usize>> {
        let mut rowseps = Vec::new();
        for i in (top + 1..bottom).rev() {
            match self.grid[i][left] {
                '+' => rowseps.push(i),
                '|' => {}
                _ => return None,
            }
        }
        Some(rowseps)
    }
}

impl BlockParser {
    fn malformed_table(&mut self, line: usize, detail: &str) {
        let message = if detail.is_empty() {
            "Malformed table.".to_owned()
        } else {
            format!("Malformed table.\n{detail}")
        };
        self.messages.push(SystemMessage::error(line, message));
    }

    fn table_end_check(&mut self, lines: &[Line<'_>], end: usize) {
        if ends_without_blank(lines, end) {
            self.messages.push(SystemMessage::warning(
                lines[end].no,
                "Blank line required after table.",
            ));
        }
    }

    /// Parse a grid table starting at `start`, returning the next line index.
    pub(super) fn grid_table(
        &mut self,
        lines: &[Line<'_>],
        start: usize,
        blocks: &mut Vec<Block>,
    ) -> usize {
        let mut end = start;
        while lines
            .get(end)
            .is_some_and(|l| l.indent == 0 && l.text.starts_with(['+', '|']))
        {
            end += 1;
        }
        let rows = &lines[start..end];
        self.table_end_check(lines, end);

        let width = rows.iter().map(|l| l.text.chars().count()).max().unwrap_or(0);
        let mut grid: Vec<Vec<char>> = rows
            .iter()
            .map(|l| {
                let mut chars: Vec<char> = l.text.chars().collect();
                chars.resize(width, ' ');
                chars
            })
            .collect();

        // The `+===+` line separates header rows from the body.
        let head_sep = grid
            .iter()
            .skip(1)
            .position(|row| row.contains(&'=') && row.iter().all(|c| *c == '+' || *c == '='))
            .map(|pos| pos + 1);
        if let Some(sep) = head_sep {
            for c in &mut grid[sep] {
                if *c == '=' {
                    *c = '-';
                }
            }
        }

        let mut scanner = GridScanner::new(&grid);
        if grid.len() < 2 || !scanner.scan() {
            self.malformed_table(lines[start].no, "");
            return end;
        }

        let row_index: Vec<usize> = scanner.rowseps.iter().copied().collect();
        let col_index: Vec<usize> = scanner.colseps.iter().copied().collect();
        let position = |seps: &[usize], at: usize| seps.binary_search(&at).unwrap_or_default();

        let mut cells = std::mem::take(&mut scanner.cells);
        cells.sort_unstable();
        let mut table_rows: Vec<Vec<Cell>> = vec![Vec::new(); row_index.len().saturating_sub(1)];
        for (top, left, bottom, right) in cells {
            let cell_lines: Vec<Line<'_>> = rows[top + 1..bottom]
                .iter()
                .map(|l| cell_line(l.no, 0, char_slice(l.text, left + 1, right)))
                .collect();
            let body = self.parse_blocks(&dedent(&cell_lines), true);
            let row = position(&row_index, top);
            if let Some(target) = table_rows.get_mut(row) {
                target.push(Cell {
                    rowspan: position(&row_index, bottom) - row,
                    colspan: position(&col_index, right) - position(&col_index, left),
                    body,
                });
            }
        }

        let header_rows = head_sep.map_or(0, |sep| position(&row_index, sep));
        blocks.push(Block::Table(Table::new(table_rows, header_rows)));
        end
    }

    /// Parse a simple table starting at `start`, returning the next line index.
    pub(super) fn simple_table(
        &mut self,
        lines: &[Line<'_>],
        start: usize,
        blocks: &mut Vec<Block>,
    ) -> usize {
        let top = lines[start].text;
        let top_len = top.chars().count();

        // The bottom border is the first border followed by a blank line
        // (or the end), or the third border overall.
        let mut head_sep = None;
        let mut bottom = None;
        for i in start + 1..lines.len() {
            let l = lines[i];
            if l.indent != 0 || !is_simple_rule(l.text, '=') {
                continue;
            }
            if l.text.chars().count() != top_len {
                self.malformed_table(
                    l.no,
                    "Bottom/header table border does not match top border.",
                );
                return skip_to_blank(lines, start);
            }
            if head_sep.is_some() || lines.get(i + 1).is_none_or(Line::is_blank) {
                bottom = Some(i);
                break;
            }
            head_sep = Some(i);
        }
        let Some(bottom) = bottom else {
            self.malformed_table(lines[start].no, "No bottom table border found.");
            return skip_to_blank(lines, start);
        };
        let end = bottom + 1;
        self.table_end_check(lines, end);

        // Column start positions; the last column runs to the end of the line.
        let mut columns = Vec::new();
        let mut in_run = false;
        for (pos, c) in top.chars().enumerate() {
            if c == '=' && !in_run {
                columns.push(pos);
            }
            in_run = c == '=';
        }
        let mut margins = Vec::new();
        let mut run_end = None;
        for (pos, c) in top.chars().enumerate() {
            if c == ' ' && run_end.is_none() {
                run_end = Some(pos);
            }
            if c == '=' {
                if let Some(from) = run_end.take() {
                    margins.push((from, pos));
                }
            }
        }

        let mut rows: Vec<Vec<Vec<Line<'_>>>> = Vec::new();
        let mut header_rows = 0;
        for (idx, l) in lines[start + 1..bottom].iter().enumerate() {
            let at = start + 1 + idx;
            if Some(at) == head_sep {
                header_rows = rows.len();
                continue;
            }
            if l.indent == 0 && is_simple_rule(l.text, '-') {
                continue;
            }
            if l.is_blank() {
                if let Some(row) = rows.last_mut() {
                    for cell in row {
                        cell.push(Line { no: l.no, indent: 0, text: "" });
                    }
                }
                continue;
            }

            let text_start = l.indent;
            let text_end = text_start + l.text.chars().count();
            let in_margin = margins.iter().any(|&(from, to)| {
                (from.max(text_start)..to.min(text_end))
                    .any(|col| l.text.chars().nth(col - text_start).is_some_and(|c| c != ' '))
            });
            if in_margin {
                self.malformed_table(
                    l.no,
                    &format!("Text in column margin in table line {}.", at - start + 1),
                );
                return end;
            }

            let cells: Vec<Line<'_>> = columns
                .iter()
                .enumerate()
                .map(|(n, &from)| {
                    let to = columns.get(n + 1).copied().unwrap_or(usize::MAX);
                    let offset = text_start.saturating_sub(from);
                    let slice = char_slice(
                        l.text,
                        from.saturating_sub(text_start),
                        to.saturating_sub(text_start),
                    );
                    cell_line(l.no, offset, slice)
                })
                .collect();

            let continues = cells[0].is_blank() && !rows.is_empty();
            if continues {
                if let Some(row) = rows.last_mut() {
                    for (cell, line) in row.iter_mut().zip(cells) {
                        cell.push(line);
                    }
                }
            } else {
                rows.push(cells.into_iter().map(|line| vec![line]).collect());
            }
        }

        let table_rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| Cell::new(self.parse_blocks(&dedent(cell), true)))
                    .collect()
            })
            .collect();
        blocks.push(Block::Table(Table::new(table_rows, header_rows)));
        end
    }
}

fn skip_to_blank(lines: &[Line<'_>], start: usize) -> usize {
    (start..lines.len())
        .find(|&i| lines[i].is_blank())
        .unwrap_or(lines.len())
}

/// Split CSV text into records, each with its line offset from the start.
///
/// Fields may be quoted with `quote`; a doubled quote inside a quoted field
/// is a literal quote. Whitespace after a delimiter is skipped and blank
/// lines produce no record.
pub(super) fn parse_csv(
    text: &str,
    delim: char,
    quote: char,
) -> Result<Vec<(usize, Vec<String>)>, String> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line = 0;
    let mut record_line = 0;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == quote {
                if chars.peek() == Some(&quote) {
                    field.push(quote);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                if c == '\n' {
                    line += 1;
                }
                field.push(c);
            }
            continue;
        }
        if c == '\n' {
            record.push(std::mem::take(&mut field).trim_end().to_owned());
            if record.len() > 1 || !record[0].is_empty() {
                records.push((record_line, std::mem::take(&mut record)));
            }
            record.clear();
            line += 1;
            record_line = line;
            at_field_start = true;
        } else if c == delim {
            record.push(std::mem::take(&mut field).trim_end().to_owned());
            at_field_start = true;
        } else if c == quote && at_field_start {
            in_quotes = true;
            at_field_start = false;
        } else if c != ' ' || !at_field_start {
            field.push(c);
            at_field_start = false;
        }
    }
    if in_quotes {
        return Err(format!("unexpected end of data (line {})", line + 1));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field.trim_end().to_owned());
        records.push((record_line, record));
    }
    Ok(records)
}
