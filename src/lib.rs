//! Calendar heatmap of daily contributions. Daily activity records, usually a year worth of
//! GitHub contributions, are laid out on a 50 week grid that always ends with the current week.
//! The grid can be drawn in a terminal or handed to another renderer as json.

pub mod cli;
pub mod grid;
pub mod source;
pub mod utils;
