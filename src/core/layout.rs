//! Column layout for the default (grid) output format.
//!
//! Names are laid out column-major: entry `i` lands in row `i % rows`, column `i / rows`, so
//! reading goes top to bottom within a column before moving right. Cells are padded with tabs
//! to a fixed number of tab stops per column.

use unicode_width::UnicodeWidthStr;

/// Width of a tab stop in terminal cells.
pub const TAB_WIDTH: usize = 8;

/// Grid geometry for one batch of names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    count: usize,
    columns: usize,
    rows: usize,
    col_tabs: usize,
    tab_width: usize,
}

impl GridLayout {
    /// Computes the layout for names with the given display widths.
    ///
    /// Each column is as many tab stops as the widest name needs plus at least one separating
    /// tab. The column count is bounded to `1..=count`.
    pub fn compute(widths: &[usize], tab_width: usize, line_width: usize) -> Self {
        let tab_width = tab_width.max(1);
        let count = widths.len();
        let widest = widths.iter().copied().max().unwrap_or(0);
        let col_tabs = widest / tab_width + 1;

        if count == 0 {
            return GridLayout {
                count,
                columns: 0,
                rows: 0,
                col_tabs,
                tab_width,
            };
        }

        let columns = (line_width / (col_tabs * tab_width)).clamp(1, count);
        let rows = count.div_ceil(columns);
        GridLayout {
            count,
            columns,
            rows,
            col_tabs,
            tab_width,
        }
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tab stops per column.
    #[inline]
    pub fn col_tabs(&self) -> usize {
        self.col_tabs
    }

    /// One name per line; no padding is produced.
    #[inline]
    pub fn is_single_column(&self) -> bool {
        self.columns <= 1
    }

    /// Row and column of entry `index`.
    pub fn cell(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.count {
            return None;
        }
        Some((index % self.rows, index / self.rows))
    }

    /// Entry index shown at `row`, `column`, if that cell is populated.
    pub fn index(&self, row: usize, column: usize) -> Option<usize> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let i = column * self.rows + row;
        (i < self.count).then_some(i)
    }

    /// Tabs needed after a cell of display width `width` to reach the next column.
    pub fn tabs_after(&self, width: usize) -> usize {
        self.col_tabs.saturating_sub(width / self.tab_width).max(1)
    }

    /// Renders `names` (in layout order) into output lines.
    ///
    /// The last populated cell of a row and cells in the last column get no trailing padding.
    pub fn render<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        if self.is_single_column() {
            return names.iter().map(|n| n.as_ref().to_string()).collect();
        }

        let mut lines = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            let mut line = String::new();
            for column in 0..self.columns {
                let Some(i) = self.index(row, column) else {
                    break;
                };
                let name = names[i].as_ref();
                line.push_str(name);

                if column == self.columns - 1 || i + self.rows >= self.count {
                    continue;
                }
                let tabs = self.tabs_after(name.width());
                line.extend(std::iter::repeat_n('\t', tabs));
            }
            lines.push(line);
        }
        lines
    }
}

/// Lays out `names` for a line `line_width` cells wide.
pub fn layout_columns<S: AsRef<str>>(names: &[S], tab_width: usize, line_width: usize) -> GridLayout {
    let widths: Vec<usize> = names.iter().map(|n| n.as_ref().width()).collect();
    GridLayout::compute(&widths, tab_width, line_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, rng};

    #[test]
    fn seven_short_names_in_forty_cells() {
        let names = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf1234"];
        let grid = layout_columns(&names, TAB_WIDTH, 40);

        // Widest is 8 cells, which needs two tab stops per column.
        assert_eq!(grid.col_tabs(), 2);
        assert_eq!(grid.columns(), (40 / (2 * TAB_WIDTH)).clamp(1, 7));
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cell(0), Some((0, 0)));
        assert_eq!(grid.cell(1), Some((1, 0)));
        assert_eq!(grid.cell(4), Some((0, 1)));
        assert_eq!(grid.cell(7), None);

        let lines = grid.render(&names);
        assert_eq!(
            lines,
            [
                "alpha\t\techo",
                "bravo\t\tfoxtrot",
                "charlie\t\tgolf1234",
                "delta",
            ]
        );
    }

    #[test]
    fn narrow_terminal_falls_back_to_one_per_line() {
        let names = ["a_rather_long_file_name.txt", "b"];
        let grid = layout_columns(&names, TAB_WIDTH, 20);
        assert!(grid.is_single_column());
        assert_eq!(grid.render(&names), ["a_rather_long_file_name.txt", "b"]);
    }

    #[test]
    fn columns_never_exceed_entry_count() {
        let names = ["a", "b"];
        let grid = layout_columns(&names, TAB_WIDTH, 200);
        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.render(&names), ["a\tb"]);
    }

    #[test]
    fn wide_characters_use_display_width() {
        let names = ["🦀🦀🦀🦀", "x"];
        let grid = layout_columns(&names, TAB_WIDTH, 80);
        assert_eq!(grid.col_tabs(), 2);
        assert_eq!(grid.render(&names), ["🦀🦀🦀🦀\tx"]);
    }

    #[test]
    fn empty_batch_renders_nothing() {
        let names: [&str; 0] = [];
        let grid = layout_columns(&names, TAB_WIDTH, 80);
        assert_eq!(grid.columns(), 0);
        assert!(grid.render(&names).is_empty());
    }

    #[test]
    fn layout_is_always_feasible() {
        let mut rng = rng();
        for _ in 0..200 {
            let count = rng.random_range(1..60);
            let widths: Vec<usize> = (0..count).map(|_| rng.random_range(0..40)).collect();
            let line_width = rng.random_range(1..300);
            let grid = GridLayout::compute(&widths, TAB_WIDTH, line_width);

            assert!((1..=count).contains(&grid.columns()));
            assert!(grid.rows() * grid.columns() >= count);
            for row in 0..grid.rows() {
                let populated = (0..grid.columns())
                    .filter(|&c| grid.index(row, c).is_some())
                    .count();
                assert!(populated >= 1 && populated <= grid.columns());
            }
            for i in 0..count {
                let (row, column) = grid.cell(i).expect("every entry has a cell");
                assert_eq!(grid.index(row, column), Some(i));
            }
        }
    }
}
