use std::fmt::Display;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::{
    grid::{build_grid, entities::GridLayout},
    source::load_contributions,
    utils::clock::Clock,
};

use super::{
    output::{render_heatmap, Palette},
    SourceArgs,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Term,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Term => write!(f, "term"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct GraphCommand {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long, default_value_t = GridLayout::DEFAULT_CELL_SIZE, help = "Size of a single cell, reported in the json output")]
    cell_size: f64,
    #[arg(long, default_value_t = GridLayout::DEFAULT_GAP, help = "Gap between cells, reported in the json output")]
    gap: f64,
    #[arg(short, long, default_value_t = OutputFormat::Term, help = "term draws the heatmap, json prints the grid for other renderers")]
    format: OutputFormat,
    #[arg(long, help = "Draw the heatmap without colors")]
    plain: bool,
}

/// Command to process `graph` command. Builds the grid ending with the week of "today" and prints
/// it in the requested format.
pub async fn process_graph_command(
    GraphCommand {
        source,
        cell_size,
        gap,
        format,
        plain,
    }: GraphCommand,
    clock: &dyn Clock,
) -> Result<()> {
    let today = source.resolve_today(clock)?;
    let document = load_contributions(&source.input).await?;
    let sized = build_grid(
        &document.contributions,
        today,
        GridLayout::new(cell_size, gap),
    );

    match format {
        OutputFormat::Term => {
            let palette = if plain {
                Palette::Plain
            } else {
                Palette::Colored
            };
            print!("{}", render_heatmap(&sized.grid, palette));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sized)?),
    }
    Ok(())
}
