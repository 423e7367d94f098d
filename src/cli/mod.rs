use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::render::{Renderer, SvgRenderer};
use crate::services::document::{DocumentSettings, HeatmapDocument};
use crate::services::{CalendarHeatmap, CellKey};
use crate::types::DateLike;

/// Calendar heatmap layout engine
#[derive(Parser)]
#[command(name = "calheat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the heatmap as an SVG document
    Svg {
        /// JSON document, or `-` for stdin
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Show the tooltip for this day
        #[arg(long, value_name = "DATE")]
        hover: Option<String>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Dump the assembled scene as JSON
    Scene {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        #[arg(long, value_name = "DATE")]
        hover: Option<String>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Interactive terminal preview
    Tui {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

/// Flags that override the document's settings
#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct LayoutArgs {
    /// Number of days ending at the end date
    #[arg(long)]
    pub num_days: Option<i64>,

    /// Last day of the window (YYYY-MM-DD or `now`)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,

    /// Space between squares
    #[arg(long)]
    pub gutter_size: Option<f64>,

    /// Weeks run top to bottom
    #[arg(long)]
    pub vertical: bool,

    /// Hide month labels
    #[arg(long)]
    pub no_month_labels: bool,

    /// Render padding days before the start and after the end
    #[arg(long)]
    pub show_out_of_range_days: bool,

    /// Enable the hover tooltip
    #[arg(long)]
    pub tooltip: bool,

    /// Text shown before the count in the tooltip
    #[arg(long)]
    pub tooltip_prefix: Option<String>,

    /// First day of each week (sunday, monday, ...)
    #[arg(long)]
    pub week_start: Option<String>,

    /// Class scale: presence or quartile
    #[arg(long)]
    pub scale: Option<String>,
}

impl LayoutArgs {
    /// Overlay the given flags onto document settings
    pub fn apply(&self, settings: &mut DocumentSettings) {
        if let Some(num_days) = self.num_days {
            settings.num_days = Some(num_days);
        }
        if let Some(end_date) = &self.end_date {
            settings.end_date = Some(DateLike::Text(end_date.clone()));
        }
        if let Some(gutter_size) = self.gutter_size {
            settings.gutter_size = Some(gutter_size);
        }
        if self.vertical {
            settings.horizontal = Some(false);
        }
        if self.no_month_labels {
            settings.show_month_labels = Some(false);
        }
        if self.show_out_of_range_days {
            settings.show_out_of_range_days = Some(true);
        }
        if self.tooltip {
            settings.tooltip_enabled = Some(true);
        }
        if let Some(prefix) = &self.tooltip_prefix {
            settings.tooltip_prefix = Some(prefix.clone());
        }
        if let Some(week_start) = &self.week_start {
            settings.week_start = Some(week_start.clone());
        }
        if let Some(scale) = &self.scale {
            settings.class_scale = Some(scale.clone());
        }
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let today = Local::now().date_naive();

        match self.command {
            Commands::Svg {
                input,
                output,
                hover,
                layout,
            } => {
                let mut heatmap = load_heatmap(&input, &layout, today)?;
                if let Some(date) = hover {
                    hover_date(&mut heatmap, &date)?;
                }
                let svg = SvgRenderer::new().render(&heatmap.scene());
                match output {
                    Some(path) => fs::write(&path, svg)
                        .with_context(|| format!("failed to write {}", path.display()))?,
                    None => print!("{svg}"),
                }
                Ok(())
            }
            Commands::Scene {
                input,
                pretty,
                hover,
                layout,
            } => {
                let mut heatmap = load_heatmap(&input, &layout, today)?;
                if let Some(date) = hover {
                    hover_date(&mut heatmap, &date)?;
                }
                let scene = heatmap.scene();
                let json = if pretty {
                    serde_json::to_string_pretty(&scene)?
                } else {
                    serde_json::to_string(&scene)?
                };
                println!("{json}");
                Ok(())
            }
            Commands::Tui { input, layout } => {
                let heatmap = load_heatmap(&input, &layout, today)?;
                crate::tui::run(heatmap)
            }
        }
    }
}

fn read_document(input: &Path) -> anyhow::Result<HeatmapDocument> {
    if input == Path::new("-") {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        return Ok(HeatmapDocument::parse(&content)?);
    }
    HeatmapDocument::load(input).with_context(|| format!("failed to load {}", input.display()))
}

/// Read a document, apply flag overrides and lay it out against `today`
pub fn load_heatmap(
    input: &Path,
    layout: &LayoutArgs,
    today: NaiveDate,
) -> anyhow::Result<CalendarHeatmap> {
    let mut document = read_document(input)?;
    layout.apply(&mut document.settings);
    let heatmap = document
        .into_heatmap(today)
        .with_context(|| format!("invalid heatmap in {}", input.display()))?;

    let index = heatmap.index();
    if index.skipped() > 0 {
        tracing::info!(skipped = index.skipped(), "values outside the window ignored");
    }
    Ok(heatmap)
}

/// Key of the rendered cell for `date`
pub fn key_for_date(heatmap: &CalendarHeatmap, date: &str) -> anyhow::Result<CellKey> {
    let day = DateLike::from(date)
        .to_local_date()
        .with_context(|| format!("invalid date {date:?}"))?;
    let offset = heatmap.range().offset_of(day);
    match CellKey::try_from(offset) {
        Ok(key) if heatmap.is_rendered(key) => Ok(key),
        _ => bail!("{date} is not shown in the heatmap"),
    }
}

fn hover_date(heatmap: &mut CalendarHeatmap, date: &str) -> anyhow::Result<()> {
    if !heatmap.options().tooltip_enabled {
        tracing::warn!("--hover has no effect without the tooltip; pass --tooltip");
    }
    let key = key_for_date(heatmap, date)?;
    heatmap.hover_enter(key);
    Ok(())
}
