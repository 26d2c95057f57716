use clap::Parser as ClapParser;
use clap::Subcommand;
use std::path::{Path, PathBuf};

use crossbench::config::{self, Credentials, EvaluationConfig, FileConfig};
use crossbench::evaluator::Evaluator;
use crossbench::provider::Provider;
use crossbench::summary;

#[derive(ClapParser)]
#[command(
    name = "crossbench",
    version,
    about = "Crossword clue benchmark for hosted LLM APIs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one or more models against the clue dataset
    Run(RunArgs),
    /// Compare the results of finished runs
    Summary {
        /// Directory holding *_results.json artifacts
        #[arg(short, long, value_name = "DIR", default_value = "results")]
        results: PathBuf,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Model to evaluate; repeat or comma-separate to run several in sequence
    #[arg(
        short,
        long = "model",
        value_name = "MODEL",
        env = "MODEL_NAME",
        value_delimiter = ',',
        default_value = "deepseek-reasoner"
    )]
    models: Vec<String>,

    /// Path to the JSON (or YAML) config file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/model_config.json"
    )]
    config: PathBuf,

    /// Clue dataset (CSV with Clue, Word and Length columns)
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "../dataset/nytcrosswords.csv"
    )]
    dataset: PathBuf,

    /// Directory for results artifacts and run logs
    #[arg(short, long, value_name = "DIR", default_value = "results")]
    output: PathBuf,

    /// Clues per request (overrides config)
    #[arg(long, value_name = "N")]
    batch_size: Option<usize>,

    /// Maximum dataset rows to evaluate (overrides config)
    #[arg(long, value_name = "N")]
    max_rows: Option<usize>,

    /// Seconds to wait between batches (overrides config)
    #[arg(long, value_name = "SECONDS")]
    rate_limit: Option<f64>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

/// Main entry point. Returns the process exit code.
pub fn run() -> i32 {
    yansi::whenever(yansi::Condition::TTY_AND_COLOR);

    // Credentials and MODEL_NAME may come from a local .env file.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run_models(args),
        Commands::Summary { results } => run_summary(&results),
    }
}

fn apply_overrides(file: &mut FileConfig, args: &RunArgs) {
    if let Some(n) = args.batch_size {
        file.batch_size = n;
    }
    if let Some(n) = args.max_rows {
        file.max_rows = Some(n);
    }
    if let Some(s) = args.rate_limit {
        file.rate_limit = s;
    }
}

/// Run every requested model in order. Configuration for all models is
/// resolved before the first request is sent.
fn run_models(args: RunArgs) -> i32 {
    let mut file_config = match config::load_config_from_path(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("crossbench: {e}");
            return 2;
        }
    };
    apply_overrides(&mut file_config, &args);

    let credentials = Credentials::from_env();
    let mut resolved: Vec<EvaluationConfig> = Vec::with_capacity(args.models.len());
    for model in args.models.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
        match EvaluationConfig::resolve(model, &file_config, &credentials) {
            Ok(c) => resolved.push(c),
            Err(e) => {
                eprintln!("crossbench: {e}");
                return 2;
            }
        }
    }
    if resolved.is_empty() {
        eprintln!("crossbench: no model given");
        return 2;
    }

    for eval_config in resolved {
        println!("\nRunning benchmark for {}...", eval_config.model);
        let provider = match Provider::from_config(&eval_config) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("crossbench: {e}");
                return 2;
            }
        };
        let evaluator = Evaluator::new(eval_config, provider).with_progress(!args.no_progress);
        match evaluator.evaluate(&args.dataset, &args.output) {
            Ok(summary) => crate::output::print_run_summary(&summary),
            Err(e) => {
                eprintln!("crossbench: {e}");
                return e.exit_code();
            }
        }
    }

    0
}

fn run_summary(results_dir: &Path) -> i32 {
    let rows = match summary::load_results(results_dir) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("crossbench: {e}");
            return 1;
        }
    };
    if rows.is_empty() {
        println!("No results found in {}", results_dir.display());
        return 0;
    }
    println!("{}", crate::output::summary_table(&rows));
    0
}
