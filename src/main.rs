use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use heikin_kdj::{
    Bar, BarSource, CandleChart, ChartSink, CsvBarSource, CsvSignalSink, JsonChartSink, KdjConfig,
    OscillatorChart, Pipeline, PipelineOutput, Settings, SignalSink,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT: &str = "Data.csv";
const DEFAULT_OUTPUT: &str = "Output.csv";

#[derive(Parser, Debug)]
#[command(
    name = "heikin-kdj",
    version,
    about = "Heikin-Ashi KDJ crossover signals for a daily OHLC series"
)]
struct Cli {
    /// Input CSV with Date, Open, High, Low, Close columns
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Output CSV for Date, J, K, D, Signal
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// TOML settings file; flags override its values
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Rolling high/low window length
    #[arg(long)]
    window: Option<usize>,

    /// EWMA span for %K
    #[arg(long)]
    smooth_k: Option<usize>,

    /// EWMA span for %D
    #[arg(long)]
    smooth_d: Option<usize>,

    /// Directory to write chart data (candles.json, kdj.json) into
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    charts: Option<PathBuf>,
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(input) = &cli.input {
        settings.input = Some(input.clone());
    }
    if let Some(output) = &cli.output {
        settings.output = Some(output.clone());
    }
    if let Some(charts) = &cli.charts {
        settings.charts = Some(charts.clone());
    }

    let kdj = settings.kdj;
    settings.kdj = KdjConfig::new(
        cli.window.unwrap_or(kdj.window()),
        cli.smooth_k.unwrap_or(kdj.smooth_k()),
        cli.smooth_d.unwrap_or(kdj.smooth_d()),
    )?;

    Ok(settings)
}

fn render_charts(dir: &Path, bars: &[Bar], output: &PipelineOutput) {
    let mut sink = JsonChartSink::new(dir);

    if let Err(err) = sink.candles(&CandleChart::new(bars, &output.signals)) {
        warn!(error = %err, "candlestick chart not written");
    }
    if let Err(err) = sink.oscillator(&OscillatorChart::new(&output.signals)) {
        warn!(error = %err, "oscillator chart not written");
    }
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    let input = settings
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output_path = settings
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let Some(bars) = CsvBarSource::new(&input)
        .load()
        .with_context(|| format!("failed to read bars from {}", input.display()))?
    else {
        bail!("no data: {} not found", input.display());
    };
    info!(bars = bars.len(), input = %input.display(), config = %settings.kdj, "loaded input");

    let output = Pipeline::new(settings.kdj)
        .run(&bars)
        .context("pipeline run failed")?;

    CsvSignalSink::new(&output_path)
        .persist(&output.signals)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    info!(
        rows = output.signals.len(),
        buys = output.buys().count(),
        sells = output.sells().count(),
        output = %output_path.display(),
        "signals written"
    );

    if let Some(dir) = &settings.charts {
        render_charts(dir, &bars, &output);
    }

    Ok(())
}
