use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stockdash::config::AppConfig;
use stockdash::export::{default_filename, export_csv};
use stockdash::models::{DataSource, PriceBar};
use stockdash::source::{LoadedSeries, MarketDataService};
use stockdash::stats::{group_thousands, SummaryStats};
use stockdash::synthetic::TICKER_OPTIONS;
use stockdash::Result;

#[derive(Parser)]
#[command(name = "stockdash", about = "Daily stock prices: live or synthetic OHLCV series")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the selectable tickers
    Tickers,
    /// Print the bars and summary stats for a ticker
    Show(SeriesArgs),
    /// Write a ticker's bars to CSV
    Export {
        #[command(flatten)]
        series: SeriesArgs,
        /// Output path (default: <TICKER>_data.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SeriesArgs {
    /// Ticker symbol (case-sensitive)
    #[arg(short, long)]
    ticker: Option<String>,
    /// Trailing window in calendar days
    #[arg(short, long, allow_negative_numbers = true)]
    days: Option<i64>,
    /// Data source: live or synthetic
    #[arg(short, long)]
    source: Option<DataSource>,
    /// Last day of the window (YYYY-MM-DD), defaults to today
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    match cli.command {
        Command::Tickers => {
            for (label, ticker) in TICKER_OPTIONS {
                println!("{:<8} {}", ticker, label);
            }
        }
        Command::Show(args) => {
            let (ticker, series) = load_series(&mut config, &args).await?;
            print_series(&ticker, &series);
        }
        Command::Export { series: args, output } => {
            let (ticker, series) = load_series(&mut config, &args).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(default_filename(&ticker)));
            export_csv(&path, &series.bars)?;
            println!("Wrote {} rows to {}", series.bars.len(), path.display());
        }
    }

    Ok(())
}

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stockdash=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_series(config: &mut AppConfig, args: &SeriesArgs) -> Result<(String, LoadedSeries)> {
    if let Some(source) = args.source {
        config.data_source = source;
    }

    let ticker = args
        .ticker
        .clone()
        .unwrap_or_else(|| config.default_ticker.clone());
    let days = args.days.unwrap_or(config.default_days);

    let service = MarketDataService::from_config(config)?;
    let series = match args.today {
        Some(today) => {
            service
                .load_at(&ticker, days, today.and_time(NaiveTime::MIN))
                .await?
        }
        None => service.load(&ticker, days).await?,
    };

    tracing::info!(
        "Updated data: {} ({} bars, {})",
        ticker,
        series.bars.len(),
        series.source_label()
    );

    Ok((ticker, series))
}

fn print_series(ticker: &str, series: &LoadedSeries) {
    println!("{}", series.source_label());
    println!("{}", series.limit_note());
    println!();

    if series.is_empty() {
        println!("Data not found");
        return;
    }

    print_bars(&series.bars);
    println!();

    match SummaryStats::from_bars(ticker, &series.bars) {
        Some(stats) => println!("{}", stats),
        None => println!("Not enough data to generate stats"),
    }
}

fn print_bars(bars: &[PriceBar]) {
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"
    );
    println!("{}", "─".repeat(82));

    for bar in bars {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14}",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.adj_close,
            group_thousands(bar.volume)
        );
    }
}
