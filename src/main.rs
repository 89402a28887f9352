use clap::Parser;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use note_ingest::config::{load_config, Config};
use note_ingest::constants::{
    ENROLLMENT_INPUT_PATH, NOTES_INPUT_PATH, NOTE_STATUS_HISTORY_INPUT_PATH,
    NOT_MISLEADING_UI_LAUNCH_MILLIS, RATINGS_INPUT_PATH, SCORED_NOTES_OUTPUT_PATH,
};
use note_ingest::loader::{DataLoader, DataPaths, LoadOptions};
use note_ingest::scoring::{validate_scoring, Scorer, TallyScorer};
use note_ingest::table::TsvWriter;
use note_ingest::PipelineError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONTRACT: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_OUTPUT: i32 = 5;

#[derive(Parser, Debug)]
#[command(name = "note-ingest")]
#[command(about = "Load, filter and score note/rating datasets", long_about = None)]
#[command(version)]
struct Cli {
    /// User enrollment dataset
    #[arg(short, long)]
    enrollment: Option<PathBuf>,

    /// Note dataset
    #[arg(short, long)]
    notes_path: Option<PathBuf>,

    /// Rating dataset
    #[arg(short, long)]
    ratings_path: Option<PathBuf>,

    /// Note status history dataset
    #[arg(short = 's', long)]
    note_status_history_path: Option<PathBuf>,

    /// Where to write the scored notes
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Path to config file (defaults to ~/.config/note-ingest/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep ratings regardless of the rated note's lifecycle
    #[arg(long)]
    keep_not_misleading: bool,

    /// Skip per-filter breakdowns
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    let config = match load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            report(&format!("Config error: {:#}", e));
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring();
    if let Err(errors) = validate_scoring(&scoring) {
        report("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let (paths, output_path) = resolve_paths(&cli, &config);
    let options = load_options(&cli, &config);
    tracing::debug!("Resolved inputs: {:?}", paths);

    let data = match DataLoader::new(paths).load(&options) {
        Ok(data) => data,
        Err(e) => fail(e),
    };

    let scorer = TallyScorer::new(&scoring, options.should_log);
    let output = match scorer.score(&data.ratings, &data.note_status_history, &data.user_enrollments) {
        Ok(output) => output,
        Err(e) => fail(e),
    };

    if let Err(e) = TsvWriter::new(&output_path).and_then(|w| w.write(&output.scored_notes)) {
        fail(e);
    }

    tracing::info!(
        "Wrote {} scored notes to {}",
        output.scored_notes.len(),
        output_path.display()
    );
    tracing::info!(
        "Finished in {}",
        humantime::format_duration(round_to_millis(start_time.elapsed()))
    );
    std::process::exit(EXIT_SUCCESS);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line flag, then config file, then built-in default
fn resolve_paths(cli: &Cli, config: &Config) -> (DataPaths, PathBuf) {
    let configured = config.paths();
    let pick = |flag: &Option<PathBuf>, file: Option<PathBuf>, default: &str| {
        flag.clone()
            .or(file)
            .unwrap_or_else(|| PathBuf::from(default))
    };

    let paths = DataPaths {
        user_enrollment: pick(&cli.enrollment, configured.enrollment, ENROLLMENT_INPUT_PATH),
        notes: pick(&cli.notes_path, configured.notes, NOTES_INPUT_PATH),
        ratings: pick(&cli.ratings_path, configured.ratings, RATINGS_INPUT_PATH),
        note_status_history: pick(
            &cli.note_status_history_path,
            configured.note_status_history,
            NOTE_STATUS_HISTORY_INPUT_PATH,
        ),
    };
    let output = pick(&cli.output_path, configured.output, SCORED_NOTES_OUTPUT_PATH);
    (paths, output)
}

fn load_options(cli: &Cli, config: &Config) -> LoadOptions {
    let filters = config.filters();
    LoadOptions {
        filter_not_misleading_notes: !cli.keep_not_misleading
            && filters.filter_not_misleading_notes.unwrap_or(true),
        not_misleading_ui_launch_millis: filters
            .not_misleading_ui_launch_millis
            .unwrap_or(NOT_MISLEADING_UI_LAUNCH_MILLIS),
        should_log: !cli.quiet && filters.log_filter_stats.unwrap_or(true),
    }
}

fn exit_code(err: &PipelineError) -> i32 {
    if err.is_contract_violation() {
        EXIT_CONTRACT
    } else if err.is_output_failure() {
        EXIT_OUTPUT
    } else {
        EXIT_INPUT
    }
}

fn fail(err: PipelineError) -> ! {
    report(&err.to_string());
    std::process::exit(exit_code(&err));
}

fn report(message: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {}", "Error:".red().bold(), message);
    } else {
        eprintln!("Error: {}", message);
    }
}

fn round_to_millis(elapsed: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_millis(elapsed.as_millis() as u64)
}
