/*!
plotsynth Command Line Interface

Synthesizes Vega-Lite chart specifications for CSV tables, either as plain
specs or as reproducible `vega` code cells.
*/

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use plotsynth::export::save_cell;
use plotsynth::reader::{dataframe_to_values, CsvFileReader, Reader};
use plotsynth::schema::{schema_of, FieldRole};
use plotsynth::table::{apply_table_ops, table_ops};
use plotsynth::writer::VegaLiteWriter;
use plotsynth::{ChartConfig, ChartKind, ChartRequest, DataFrame, VERSION};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "PLOTSYNTH_LOG";

#[derive(Parser)]
#[command(name = "plotsynth")]
#[command(about = "Chart specification synthesizer for tabular data")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the fields of a CSV table and the axes they can be placed on
    Fields {
        /// Path to the CSV file
        csv: PathBuf,
    },

    /// Synthesize a Vega-Lite spec
    Plot {
        #[command(flatten)]
        chart: ChartArgs,

        /// Aggregate the table and embed the rows as data.values
        #[arg(long)]
        inline: bool,
    },

    /// Print the chart as a reproducible vega code cell
    Save {
        #[command(flatten)]
        chart: ChartArgs,
    },
}

#[derive(Args)]
pub struct ChartArgs {
    /// Path to the CSV file
    csv: PathBuf,

    /// Chart kind (bar, line, xy, boxplot, or any Vega-Lite mark)
    #[arg(long)]
    kind: Option<ChartKind>,

    /// Column for the x-axis
    #[arg(long)]
    x: Option<String>,

    /// Measure for the y-axis, e.g. `mean(price)`; repeat for several series
    #[arg(long)]
    y: Vec<String>,

    /// X-axis title
    #[arg(long)]
    x_title: Option<String>,

    /// Y-axis title
    #[arg(long)]
    y_title: Option<String>,

    /// Plot title
    #[arg(long)]
    title: Option<String>,

    /// Width of the output area
    #[arg(long)]
    width: Option<u32>,

    /// Height of the output area
    #[arg(long)]
    height: Option<u32>,

    /// Data source name (defaults to the CSV file stem)
    #[arg(long)]
    name: Option<String>,

    /// JSON chart request; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Everything needed to render one chart
struct Prepared {
    df: DataFrame,
    config: ChartConfig,
    writer: VegaLiteWriter,
}

impl ChartArgs {
    fn request(&self) -> anyhow::Result<ChartRequest> {
        let base = match &self.config {
            Some(path) => ChartRequest::from_file(path)?,
            None => ChartRequest::default(),
        };
        let overrides = ChartRequest {
            kind: self.kind.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            x_title: self.x_title.clone(),
            y_title: self.y_title.clone(),
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            name: self.name.clone(),
        };
        Ok(base.merge(overrides))
    }

    fn prepare(&self) -> anyhow::Result<Prepared> {
        let request = self.request()?;
        let reader = CsvFileReader::new(&self.csv);
        let df = reader.read()?;
        let config = request
            .resolve(&schema_of(&df))
            .with_context(|| format!("Invalid chart for {}", self.csv.display()))?;
        let name = request.name.unwrap_or_else(|| reader.name().to_string());

        Ok(Prepared {
            df,
            config,
            writer: VegaLiteWriter::new(name),
        })
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn emit(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", text),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fields { csv } => {
            let schema = CsvFileReader::new(&csv).schema()?;
            for field in &schema {
                let roles: Vec<String> = [FieldRole::Dimension, FieldRole::Measure]
                    .into_iter()
                    .filter(|role| field.has_role(*role))
                    .map(|role| role.to_string())
                    .collect();
                println!("{:<24} {:<10} {}", field.name, field.data_type, roles.join(", "));
            }
        }

        Commands::Plot { chart, inline } => {
            let prepared = chart.prepare()?;
            let spec = if inline {
                let rows = apply_table_ops(&prepared.df, &table_ops(&prepared.config))?;
                let values = dataframe_to_values(&rows)?;
                prepared.writer.synthesize_with_values(&prepared.config, values)?
            } else {
                prepared.writer.synthesize(&prepared.config)?
            };
            emit(&serde_json::to_string_pretty(&spec)?, chart.output.as_deref())?;
        }

        Commands::Save { chart } => {
            let prepared = chart.prepare()?;
            let spec = prepared.writer.synthesize(&prepared.config)?;
            let cell = save_cell(&spec, &prepared.config, prepared.writer.data_name())?;
            emit(&cell.content, chart.output.as_deref())?;
        }
    }

    Ok(())
}
