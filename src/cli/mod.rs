pub mod graph;
pub mod output;
pub mod summary;

use std::{fmt::Display, path::PathBuf};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use graph::{process_graph_command, GraphCommand};
use summary::{process_day_command, process_totals_command, DayCommand, TotalsCommand};
use tracing::{level_filters::LevelFilter, warn};

use crate::{
    grid::window,
    utils::{
        clock::{Clock, DefaultClock},
        dir::create_application_default_path,
        logging::{enable_logging, LogSettings, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "contribgrid", version, long_about = None)]
#[command(about = "Calendar heatmap of daily contributions", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Display the contribution heatmap of the last 50 weeks")]
    Graph {
        #[command(flatten)]
        command: GraphCommand,
    },
    #[command(about = "Display contribution totals")]
    Totals {
        #[command(flatten)]
        command: TotalsCommand,
    },
    #[command(about = "Display contributions of a single day")]
    Day {
        #[command(flatten)]
        command: DayCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    // Not having a state directory only costs us the log files.
    let application_data_path = create_application_default_path()
        .inspect_err(|e| eprintln!("Logging to files is disabled: {e:?}"))
        .ok();
    enable_logging(LogSettings {
        prefix: CLI_PREFIX,
        application_data_path,
        level,
        show_std: args.log,
    })?;

    let clock = DefaultClock;
    match args.commands {
        Commands::Graph { command } => process_graph_command(command, &clock).await,
        Commands::Totals { command } => process_totals_command(command, &clock).await,
        Commands::Day { command } => process_day_command(command, &clock).await,
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Options shared by every command: where records come from and which day is "today".
#[derive(Debug, Clone, clap::Args)]
pub struct SourceArgs {
    #[arg(
        long,
        short,
        help = "Contributions document. Either a list of {date, count, level} records or the GitHub contributions API response. Use - to read stdin"
    )]
    pub input: PathBuf,
    #[arg(
        long,
        help = "Day the graph ends with. Examples are \"yesterday\", \"15/03/2025\", \"2025-03-15\". Defaults to the current UTC day"
    )]
    pub today: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    pub date_style: DateStyle,
}

impl SourceArgs {
    /// The graph needs its whole window on the calendar, so days at the very ends of it are
    /// rejected.
    pub fn resolve_today(&self, clock: &dyn Clock) -> Result<NaiveDate> {
        let now = clock.time();
        let today = match &self.today {
            Some(today) => parse_day(today, now, self.date_style, "today")?,
            None => now.date_naive(),
        };
        if window(today).is_none() {
            warn!("Rejected today {today}, the graph would leave the calendar");
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate today {today}, it is too close to the calendar edge"),
                )
                .into());
        }
        Ok(today)
    }
}

/// Parses a user supplied day, relative phrases are resolved against `now`.
pub fn parse_day(
    value: &str,
    now: DateTime<Utc>,
    date_style: DateStyle,
    name: &str,
) -> Result<NaiveDate> {
    match parse_date_string(value, now, date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => {
            warn!("Rejected {name} {value:?}: {e}");
            Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate {name} {e}"),
                )
                .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use crate::utils::clock::MockClock;

    use super::{parse_day, DateStyle, SourceArgs};

    const NOW: NaiveDateTime = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
        NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
    );

    fn clock() -> MockClock {
        let mut clock = MockClock::new();
        clock
            .expect_time()
            .returning(|| Utc.from_utc_datetime(&NOW));
        clock
    }

    fn source_args(today: Option<&str>, date_style: DateStyle) -> SourceArgs {
        SourceArgs {
            input: PathBuf::from("contributions.json"),
            today: today.map(str::to_string),
            date_style,
        }
    }

    #[test]
    fn test_today_defaults_to_clock() {
        let today = source_args(None, DateStyle::Uk).resolve_today(&clock()).unwrap();
        assert_eq!(today, NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());
    }

    #[test]
    fn test_today_relative_to_clock() {
        let today = source_args(Some("yesterday"), DateStyle::Uk)
            .resolve_today(&clock())
            .unwrap();
        assert_eq!(today, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
    }

    #[test]
    fn test_today_at_calendar_edge_is_rejected() {
        for edge in [NaiveDate::MIN, NaiveDate::MAX] {
            let mut clock = MockClock::new();
            clock
                .expect_time()
                .returning(move || Utc.from_utc_datetime(&edge.and_time(NaiveTime::MIN)));
            let err = source_args(None, DateStyle::Uk)
                .resolve_today(&clock)
                .unwrap_err();
            assert_eq!(
                err.downcast_ref::<clap::Error>().map(clap::Error::kind),
                Some(clap::error::ErrorKind::ValueValidation)
            );
        }
    }

    #[test]
    fn test_date_styles() {
        let now = Utc.from_utc_datetime(&NOW);
        assert_eq!(
            parse_day("01/06/2024", now, DateStyle::Uk, "today").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(
            parse_day("01/06/2024", now, DateStyle::Us, "today").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()
        );
    }

    #[test]
    fn test_invalid_day_is_rejected() {
        let now = Utc.from_utc_datetime(&NOW);
        assert!(parse_day("the day after never", now, DateStyle::Uk, "today").is_err());
    }
}
