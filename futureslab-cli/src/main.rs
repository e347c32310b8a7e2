//! FuturesLab CLI — futures search, history and curve displays.
//!
//! Commands:
//! - `search` — list reference futures matching category/exchange/description
//! - `historical` — daily history of one or more tickers, charted or tabled
//! - `curve` — prices across upcoming expiries of one ticker
//! - `tickers` — categories and exchanges known to the reference table

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use env_logger::Env;

use futureslab_core::{
    Expiry, FuturesLabConfig, FuturesProvider, ReferenceTable, SearchFilter,
    YahooFuturesProvider,
};
use futureslab_view::display::default_start_date;
use futureslab_view::{
    CurveRequest, DisplayContext, FileExporter, HistoricalRequest, SearchRequest, StdoutConsole,
    Theme,
};

#[derive(Parser)]
#[command(
    name = "futureslab",
    about = "FuturesLab CLI — futures search, history and curves from Yahoo Finance"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to <config dir>/futureslab/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory export files are written to (overrides the config).
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the futures reference table.
    Search {
        /// Category, e.g. energy, metals, agriculture.
        #[arg(long, short, default_value = "")]
        category: String,

        /// Exchange code, e.g. NYM, CME.
        #[arg(long, short, default_value = "")]
        exchange: String,

        /// Text contained in the description.
        #[arg(long, short, default_value = "")]
        description: String,

        /// Export formats, comma separated: csv, json, parquet.
        #[arg(long, default_value = "")]
        export: String,
    },
    /// Display daily history of futures tickers.
    Historical {
        /// Tickers, comma separated (e.g. CL,NG).
        #[arg(required = true, value_delimiter = ',')]
        tickers: Vec<String>,

        /// Contract expiry (YYYY-MM). Defaults to the continuous front month.
        #[arg(long)]
        expiry: Option<Expiry>,

        /// Start date (YYYY-MM-DD). Defaults to `historical.lookback_days` ago.
        #[arg(long, alias = "start")]
        start_date: Option<NaiveDate>,

        /// Print a table instead of a chart.
        #[arg(long, default_value_t = false)]
        raw: bool,

        /// Export formats, comma separated: csv, json, parquet.
        #[arg(long, default_value = "")]
        export: String,
    },
    /// Display the futures curve of a ticker.
    Curve {
        /// Ticker, e.g. CL.
        ticker: String,

        /// Print a table instead of a chart.
        #[arg(long, default_value_t = false)]
        raw: bool,

        /// Export formats, comma separated: csv, json, parquet.
        #[arg(long, default_value = "")]
        export: String,
    },
    /// List categories and exchanges of the reference table.
    Tickers,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = FuturesLabConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    if let Some(dir) = cli.export_dir {
        config.export_dir = dir;
    }

    let reference = match &config.reference_csv {
        Some(path) => ReferenceTable::from_file(path)?,
        None => ReferenceTable::embedded()?,
    };
    log::debug!("reference table: {} futures", reference.len());

    let provider = YahooFuturesProvider::new(Arc::new(reference), &config.provider)?;
    let console = StdoutConsole;
    let exporter = FileExporter;
    let ctx = DisplayContext::new(&provider, &console, &exporter)
        .with_export_dir(&config.export_dir)
        .with_theme(Theme::default())
        .with_chart_settings(config.chart);

    match cli.command {
        Commands::Search {
            category,
            exchange,
            description,
            export,
        } => {
            let request = SearchRequest {
                filter: SearchFilter {
                    category,
                    exchange,
                    description,
                },
                export,
            };
            ctx.display_search(&request)?;
        }
        Commands::Historical {
            tickers,
            expiry,
            start_date,
            raw,
            export,
        } => {
            let start_date = start_date.unwrap_or_else(|| {
                let lookback = u64::try_from(config.historical.lookback_days).unwrap_or(0);
                default_start_date(chrono::Local::now().date_naive(), lookback)
            });
            let request = HistoricalRequest {
                tickers,
                expiry,
                start_date,
                raw,
                export,
            };
            ctx.display_historical(&request, None)?;
        }
        Commands::Curve {
            ticker,
            raw,
            export,
        } => {
            let request = CurveRequest {
                ticker,
                raw,
                export,
            };
            ctx.display_curve(&request, None)?;
        }
        Commands::Tickers => print_reference_summary(provider.reference()),
    }

    Ok(())
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("futureslab")
        .join("config.toml")
}

fn print_reference_summary(reference: &ReferenceTable) {
    println!("{} futures in reference table", reference.len());
    println!("Categories: {}", reference.categories().join(", "));
    println!("Exchanges:  {}", reference.exchanges().join(", "));
}
