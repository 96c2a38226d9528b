use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;

use crate::{
    grid::{
        build_grid,
        entities::{GridLayout, SizedGrid},
    },
    source::{load_contributions, ContributionsDocument},
    utils::{clock::Clock, time::date_to_key},
};

use super::{parse_day, SourceArgs};

#[derive(Debug, Parser)]
pub struct TotalsCommand {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Debug, Parser)]
pub struct DayCommand {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long, help = "Day to display, parsed like --today")]
    date: String,
}

pub async fn process_totals_command(
    TotalsCommand { source }: TotalsCommand,
    clock: &dyn Clock,
) -> Result<()> {
    let today = source.resolve_today(clock)?;
    let document = load_contributions(&source.input).await?;
    let sized = build_grid(&document.contributions, today, GridLayout::default());
    print!("{}", format_totals(&document, &sized));
    Ok(())
}

pub async fn process_day_command(
    DayCommand { source, date }: DayCommand,
    clock: &dyn Clock,
) -> Result<()> {
    let today = source.resolve_today(clock)?;
    let date = parse_day(&date, clock.time(), source.date_style, "date")?;
    let document = load_contributions(&source.input).await?;
    let sized = build_grid(&document.contributions, today, GridLayout::default());
    println!("{}", describe_day(&sized, date));
    Ok(())
}

/// `total` sums every record of the document, `visible` only what made it into the grid. Both are
/// shown since they differ whenever the document reaches past the 50 week window.
fn format_totals(document: &ContributionsDocument, sized: &SizedGrid) -> String {
    let mut output = format!(
        "total\t{}\nvisible\t{}\n",
        sized.grid.total_contributions,
        sized.grid.visible_contributions()
    );
    for (period, total) in &document.yearly_totals {
        output.push_str(&format!("{period}\t{total}\n"));
    }
    output
}

fn describe_day(sized: &SizedGrid, date: NaiveDate) -> String {
    match sized.grid.cell(date) {
        Some(cell) => cell.label(),
        None => format!("{}, outside of the graph", date_to_key(date)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use crate::{
        grid::{
            build_grid,
            entities::{ActivityRecord, GridLayout},
        },
        source::ContributionsDocument,
    };

    use super::{describe_day, format_totals};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn document() -> ContributionsDocument {
        ContributionsDocument {
            contributions: vec![
                ActivityRecord::new("2024-06-10", 4, 2),
                ActivityRecord::new("2024-06-11", 1, 1),
                ActivityRecord::new("2022-01-01", 10, 3),
            ],
            yearly_totals: BTreeMap::from([("2022".to_string(), 10), ("2024".to_string(), 5)]),
        }
    }

    #[test]
    fn test_format_totals() {
        let document = document();
        let sized = build_grid(&document.contributions, date(2024, 6, 12), GridLayout::default());
        assert_eq!(
            format_totals(&document, &sized),
            "total\t15\nvisible\t5\n2022\t10\n2024\t5\n"
        );
    }

    #[test]
    fn test_describe_day() {
        let document = document();
        let sized = build_grid(&document.contributions, date(2024, 6, 12), GridLayout::default());
        assert_eq!(describe_day(&sized, date(2024, 6, 10)), "2024-06-10: 4 contributions");
        assert_eq!(describe_day(&sized, date(2024, 6, 11)), "2024-06-11: 1 contribution");
        assert_eq!(describe_day(&sized, date(2024, 6, 12)), "2024-06-12: 0 contributions");
        assert_eq!(
            describe_day(&sized, date(2022, 1, 1)),
            "2022-01-01, outside of the graph"
        );
        assert_eq!(
            describe_day(&sized, date(2024, 6, 16)),
            "2024-06-16, outside of the graph"
        );
    }
}
