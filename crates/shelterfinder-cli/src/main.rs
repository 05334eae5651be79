use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shelterfinder_lib::{AppConfig, Locale};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shelterfinder_cli::output::OutputFormat;
use shelterfinder_cli::terminal::ColorPalette;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find the nearest evacuation shelters")]
struct Cli {
    /// Dataset CSV path or http(s) URL. Defaults to SHELTERFINDER_DATASET or ./03000_1.csv.
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Language for status and list labels (en, ja).
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Disable ANSI colors.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the shelters nearest to a position.
    Nearest(NearestArgs),
    /// Load the dataset and report how many rows are usable.
    Check,
}

#[derive(Args, Debug)]
pub struct NearestArgs {
    /// Current latitude in decimal degrees.
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Current longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Number of shelters to list.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Select the entry with this 1-based rank and show its popup.
    #[arg(long)]
    pub select: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config =
        AppConfig::from_env(cli.dataset.as_deref()).context("failed to read configuration")?;
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    let palette = if cli.no_color {
        ColorPalette::plain()
    } else {
        ColorPalette::detect()
    };

    match &cli.command {
        Command::Nearest(args) => {
            commands::nearest::handle_nearest(args, config, cli.format, palette).await
        }
        Command::Check => commands::check::handle_check(&config, cli.format).await,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
