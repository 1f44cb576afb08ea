use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use category_quiz::{Config, Quiz, load_embedded_questions, load_questions_from_json};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from (defaults to the bundled bank)
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for question sampling, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of questions drawn per run
    #[arg(long)]
    sample_size: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(size) = args.sample_size {
        config.sample_size = size;
        config.normalize();
    }

    init_logging(&config.log_file);

    let questions = match args.questions.or_else(|| config.questions_path.clone()) {
        Some(path) => load_questions_from_json(&path)
            .with_context(|| format!("failed to load questions from {}", path.display()))?,
        None => load_embedded_questions().context("failed to load bundled questions")?,
    };

    let rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    tracing::info!(
        questions = questions.len(),
        sample_size = config.sample_size,
        "starting quiz"
    );

    let quiz = Quiz::with_settings(questions, config.settings(), rng);
    if let Err(e) = quiz.run() {
        tracing::error!(error = %e, "quiz exited with an error");
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to a file since the UI owns the terminal. Logging is dropped if
/// the file cannot be opened.
fn init_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("category_quiz=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}
