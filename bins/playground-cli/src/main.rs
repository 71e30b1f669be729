mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use playground_common::{Config, TestCaseField};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "playground-cli")]
#[command(about = "DeepEval Playground CLI - Edit test cases and submit them for evaluation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tests.json holding one empty test case
    Init {
        /// Directory to write tests.json into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Print the test cases in a file
    Show {
        /// Test file (defaults to PLAYGROUND_TESTS_FILE or tests.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Append an empty test case
    Add {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Set one field of a test case
    Set {
        /// Zero-based test index
        #[arg(short, long)]
        index: usize,

        /// input, expected_output or actual_output
        #[arg(long)]
        field: TestCaseField,

        /// New value
        #[arg(short, long)]
        value: String,

        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Remove a test case (the last one cannot be removed)
    Remove {
        /// Zero-based test index
        #[arg(short, long)]
        index: usize,

        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Submit every test case in a file for evaluation
    Evaluate {
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Metric identifier (e.g. correctness)
        #[arg(short, long)]
        metric: Option<String>,

        /// Evaluator base URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Submit a single test case (first playground form)
    EvaluateSingle {
        #[arg(short, long)]
        input: String,

        #[arg(short, long)]
        expected: String,

        #[arg(short, long)]
        actual: String,

        /// Evaluator base URL
        #[arg(short, long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let file_or_default = |file: Option<PathBuf>| file.unwrap_or_else(|| config.tests_file.clone());

    match cli.command {
        Commands::Init { dir } => {
            commands::init_tests(&dir, &config.metric)?;
        }
        Commands::Show { file } => {
            commands::show_tests(&file_or_default(file))?;
        }
        Commands::Add { file } => {
            commands::add_test(&file_or_default(file))?;
        }
        Commands::Set {
            index,
            field,
            value,
            file,
        } => {
            commands::set_field(&file_or_default(file), index, field, &value)?;
        }
        Commands::Remove { index, file } => {
            commands::remove_test(&file_or_default(file), index)?;
        }
        Commands::Evaluate { file, metric, url } => {
            let metric = metric.unwrap_or_else(|| config.metric.clone());
            let url = url.unwrap_or_else(|| config.base_url.clone());
            commands::evaluate(&file_or_default(file), &metric, &url).await?;
        }
        Commands::EvaluateSingle {
            input,
            expected,
            actual,
            url,
        } => {
            let url = url.unwrap_or_else(|| config.base_url.clone());
            commands::evaluate_single(&input, &expected, &actual, &url).await?;
        }
    }

    Ok(())
}
