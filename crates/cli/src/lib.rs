pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use recommender_core::config::{parse_seed, ConfigOverrides, LoadOptions};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "recommender",
    about = "Smart product recommender CLI",
    long_about = "Generate seeded product recommendations, inspect the catalog and dashboard metrics, and check configuration readiness.",
    after_help = "Examples:\n  recommender recommend --category Home --viewed \"Yoga Mat\"\n  recommender catalog --json\n  recommender doctor"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a recommender.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank catalog products for a recently viewed item")]
    Recommend {
        #[arg(long, help = "Category selected in the browsing history")]
        category: Option<String>,
        #[arg(long, help = "Recently viewed product to exclude")]
        viewed: Option<String>,
        #[arg(long = "top-n", help = "Number of recommendations to return")]
        top_n: Option<usize>,
        #[arg(long, value_parser = parse_seed_arg, help = "Seed for the random draws, or `off`")]
        seed: Option<SeedArg>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List catalog categories and products")]
    Catalog {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Show the static dashboard metrics")]
    Metrics {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, catalog loading and a scoring dry run")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

/// Parsed `--seed` value; `None` inside means draw from entropy.
#[derive(Clone, Copy, Debug)]
struct SeedArg(Option<u64>);

fn parse_seed_arg(value: &str) -> Result<SeedArg, String> {
    parse_seed("--seed", value).map(SeedArg).map_err(|error| error.to_string())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("RECOMMENDER_CLI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .compact()
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let options = LoadOptions { config_path: cli.config, ..LoadOptions::default() };

    let result = match cli.command {
        Command::Recommend { category, viewed, top_n, seed, json } => {
            let options = LoadOptions {
                overrides: ConfigOverrides {
                    seed: seed.map(|SeedArg(seed)| seed),
                    ..ConfigOverrides::default()
                },
                ..options
            };
            commands::recommend::run(
                options,
                commands::recommend::RecommendArgs { category, viewed, top_n, json },
            )
        }
        Command::Catalog { json } => commands::catalog::run(options, json),
        Command::Metrics { json } => commands::metrics::run(json),
        Command::Config => commands::config::run(options),
        Command::Doctor { json } => commands::doctor::run(options, json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
