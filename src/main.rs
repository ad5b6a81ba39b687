use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use regroup::config;
use regroup::dataset;
use regroup::display;
use regroup::errors::RegroupError;
use regroup::input;
use regroup::types::{MissingKeyPolicy, OutputFormat};

#[derive(Parser)]
#[command(name = "regroup", version, about = "Group JSON records by the value of one field")]
struct Cli {
    /// Input file (JSON array or JSON Lines). Reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Field to group by
    #[arg(short, long)]
    key: Option<String>,

    /// Fail on records that lack the grouping field instead of grouping them under "undefined"
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Shorthand for --format json; wins over --format
    #[arg(long)]
    json: bool,

    /// Group the built-in cars dataset instead of reading input
    #[arg(long)]
    demo: bool,

    /// Config file (default: <config dir>/regroup/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("regroup=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("regroup=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let cfg = config::load_config(cli.config.as_deref())?;

    if cli.demo && cli.input.is_some() {
        anyhow::bail!("--demo does not take an input file");
    }

    let key = match (cli.key, cfg.key.clone()) {
        (Some(k), _) => k,
        (None, Some(k)) => k,
        (None, None) if cli.demo => "make".to_string(),
        (None, None) => return Err(RegroupError::MissingGroupKey.into()),
    };

    let policy = if cli.strict {
        MissingKeyPolicy::Reject
    } else {
        cfg.policy()
    };

    let records = if cli.demo {
        dataset::cars()
    } else {
        input::read_records(cli.input.as_deref())?
    };

    let result = regroup::try_group_by(&key, &records, policy)?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        cli.format.or(cfg.format).unwrap_or_default()
    };

    let output = match format {
        OutputFormat::Json => display::format_json(&result),
        OutputFormat::Short => display::format_short(&result),
        OutputFormat::Default => display::format_default(&result, &key, cfg.max_line()),
    };

    print!("{}", output);

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
