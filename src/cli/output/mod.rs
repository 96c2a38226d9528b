//! Terminal rendering of an [ActivityGrid].

use ansi_term::Colour;

use crate::grid::entities::{pluralize_contributions, ActivityGrid, GridCell, DAYS_PER_WEEK};

/// Column width of a single week, glyph and separator.
const CELL_WIDTH: usize = 2;
const ROW_LABELS: [&str; DAYS_PER_WEEK] = ["", "Mon", "", "Wed", "", "Fri", ""];
const ROW_LABEL_WIDTH: usize = 4;

/// 256 color approximations of the dark GitHub contribution palette.
const LEVEL_COLOURS: [u8; 5] = [235, 22, 28, 34, 41];
const LEVEL_GLYPHS: [&str; 5] = ["·", "░", "▒", "▓", "█"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Colored,
    Plain,
}

impl Palette {
    fn paint(&self, cell: &GridCell) -> String {
        let level = *cell.level as usize;
        match self {
            Palette::Colored => Colour::Fixed(LEVEL_COLOURS[level]).paint("■").to_string(),
            Palette::Plain => LEVEL_GLYPHS[level].to_string(),
        }
    }
}

/// Draws month labels, one row per weekday and the total under it.
pub fn render_heatmap(grid: &ActivityGrid, palette: Palette) -> String {
    let mut output = month_row(grid);
    output.push('\n');

    for (day, label) in ROW_LABELS.iter().enumerate() {
        output.push_str(&format!("{label:<ROW_LABEL_WIDTH$}"));
        let row = grid
            .weeks
            .iter()
            .map(|week| palette.paint(&week[day]))
            .collect::<Vec<_>>();
        output.push_str(&row.join(" "));
        output.push('\n');
    }

    output.push_str(&format!(
        "{} in the last year\n",
        pluralize_contributions(grid.total_contributions)
    ));
    output
}

/// Labels start at the column of their week. A label that would overlap the previous one is
/// dropped.
fn month_row(grid: &ActivityGrid) -> String {
    let mut row = " ".repeat(ROW_LABEL_WIDTH);
    for week in 0..grid.weeks.len() {
        let label = grid.month_label(week);
        let column = ROW_LABEL_WIDTH + week * CELL_WIDTH;
        if label.is_empty() || row.len() > column {
            continue;
        }
        row.push_str(&" ".repeat(column - row.len()));
        row.push_str(label);
    }
    row.trim_end().to_string()
}
