//! PressCheck - Command Line Entry Point
//!
//! Runs candidate batches through deduplication and the admission gate,
//! ranks source lists, and verifies admitted topics.
//!
//! Usage:
//!     presscheck --db news.db evaluate candidates.json
//!     presscheck --db news.db verify sources.json
//!     presscheck rank sources.json
//!     presscheck check --title "..." sources.json

mod sources;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use presscheck::tracing::prefix;
use presscheck_core::model::{Candidate, CandidateBuilder, RawCandidate, Topic};
use presscheck_core::pipeline::{Evaluator, VerificationRun};
use presscheck_core::{ranking_summary, CredibilityRanker, PipelineConfig};
use presscheck_sqlite::SqliteStore;
use sources::SourceFile;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "presscheck")]
#[command(about = "Newsworthiness scoring and source verification for labor news")]
#[command(version)]
struct Args {
    /// Pipeline configuration file (JSON); falls back to $PRESSCHECK_CONFIG
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database; an in-memory store is used when omitted
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deduplicate, score and admit a batch of raw candidates
    Evaluate {
        /// JSON array of raw candidate records
        candidates: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank a list of sources by credibility
    Rank {
        /// JSON array of source records
        sources: PathBuf,
    },

    /// Verify every unverified topic in the database
    Verify {
        /// JSON array of sources for every topic, or an object keyed by topic ID
        sources: PathBuf,
    },

    /// Verify a one-off story against sources without touching storage
    Check {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// JSON array of source records
        sources: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    presscheck::tracing::init_with_filter(&args.log_level);

    let config = presscheck::config::load(args.config.as_deref())?;
    let now_ms = chrono::Utc::now().timestamp_millis();

    match args.command {
        Command::Evaluate { candidates, json } => {
            evaluate(&config, args.db.as_deref(), &candidates, json, now_ms)?
        }
        Command::Rank { sources } => rank(&config, &sources)?,
        Command::Verify { sources } => verify(&config, args.db.as_deref(), &sources, now_ms)?,
        Command::Check {
            title,
            description,
            sources,
        } => check(&config, &title, &description, &sources, now_ms)?,
    }

    Ok(())
}

fn open_store(db: Option<&Path>) -> presscheck::Result<SqliteStore> {
    let store = match db {
        Some(path) => {
            info!("{} Opening {}", prefix::DB, path.display());
            SqliteStore::open(path)?
        }
        None => SqliteStore::in_memory()?,
    };
    Ok(store)
}

fn evaluate(
    config: &PipelineConfig,
    db: Option<&Path>,
    path: &Path,
    json: bool,
    now_ms: i64,
) -> presscheck::Result<()> {
    let raw: Vec<RawCandidate> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let batch: Vec<Candidate> = raw
        .into_iter()
        .map(|r| Candidate::from_raw(r, now_ms))
        .collect();
    info!("{} Evaluating {} candidates", prefix::EVALUATE, batch.len());

    let mut store = open_store(db)?;
    let mut evaluator = Evaluator::new(config)?;
    let report = evaluator.evaluate_batch(&mut store, batch, now_ms);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for candidate in &report.scored {
        let combined = candidate.scores.as_ref().map_or(0.0, |s| s.combined);
        println!(
            "{}\t{:>6.2}\t{}\t{}",
            candidate.id, combined, candidate.status, candidate.title
        );
    }
    for dropped in &report.dropped {
        println!(
            "{}\t{:>6}\tduplicate ({})\t{}",
            dropped.candidate.id, "-", dropped.reason, dropped.candidate.title
        );
    }
    for failure in &report.failures {
        println!("{}\t{:>6}\tfailed: {}", failure.id, "-", failure.error);
    }
    Ok(())
}

fn rank(config: &PipelineConfig, path: &Path) -> presscheck::Result<()> {
    let records = SourceFile::read(path)?.all_records();
    let ranker = CredibilityRanker::new(config.domains.clone())?;
    let ranked = ranker.rank(&records);

    for source in &ranked {
        println!(
            "{:>2}. [tier {}, {:>3}] {} <{}>: {}",
            source.rank,
            source.credibility_tier.number(),
            source.credibility_score,
            source.name,
            source.url,
            source.justification
        );
    }
    println!("{}", ranking_summary(&ranked, &ranker.check(&ranked)));
    Ok(())
}

fn verify(
    config: &PipelineConfig,
    db: Option<&Path>,
    path: &Path,
    now_ms: i64,
) -> presscheck::Result<()> {
    let search = SourceFile::read(path)?;
    let mut store = open_store(db)?;
    let run = VerificationRun::new(config, search)?;

    info!("{} Verifying pending topics", prefix::VERIFY);
    let report = run.verify_pending(&mut store, now_ms)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn check(
    config: &PipelineConfig,
    title: &str,
    description: &str,
    path: &Path,
    now_ms: i64,
) -> presscheck::Result<()> {
    let records = SourceFile::read(path)?.all_records();
    let candidate = CandidateBuilder::new()
        .title(title)
        .description(description)
        .discovered_at_ms(now_ms)
        .build();
    let topic = Topic::from_candidate(&candidate, now_ms);

    let run = VerificationRun::new(config, SourceFile::All(Vec::new()))?;
    let outcome = run.evaluate(&topic, &records);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
