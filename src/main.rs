use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::{info, warn};
use psyrisk::model::holdout;
use psyrisk::utils::logging::{create_main_progress_bar, finish_progress_bar};
use psyrisk::{PipelineConfig, PredictionRequest, PredictionResponse, RiskPipeline, Substance};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

/// Rows scored between progress updates
const SCORING_CHUNK: usize = 256;

/// Cannabis and psilocybin treatment risk prediction.
///
/// Artifact locations and seeds are read from the environment
/// (`CANNABIS_MODEL`, `RANDOM_STATE_PSILOCYBIN`, ...).
#[derive(Parser, Debug)]
#[command(name = "psyrisk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every respondent of a request file and print the response JSON
    Predict {
        /// Request body, `{"data_to_predict": [[...18 answers...], ...]}`
        request: PathBuf,
    },
    /// Check each classifier against a seeded stratified holdout of its corpus
    Evaluate,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_env().context("invalid configuration")?;
    info!("{config}");

    match cli.command {
        Command::Predict { request } => predict(&config, &request),
        Command::Evaluate => evaluate(&config),
    }
}

fn predict(config: &PipelineConfig, path: &Path) -> anyhow::Result<()> {
    let request: PredictionRequest = serde_json::from_reader(BufReader::new(
        File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
    ))
    .with_context(|| format!("invalid request body in {}", path.display()))?;

    let pipeline = RiskPipeline::from_config(config);
    let rows = &request.data_to_predict;
    if rows.is_empty() {
        bail!("{} contains no rows to predict", path.display());
    }
    let start = Instant::now();

    let pb = create_main_progress_bar(rows.len() as u64, Some("Scoring respondents"));
    let mut results = Vec::with_capacity(rows.len());
    for chunk in rows.chunks(SCORING_CHUNK) {
        results.extend(pipeline.predict(chunk).context("prediction failed")?);
        pb.inc(chunk.len() as u64);
    }
    finish_progress_bar(&pb, "Scoring complete");
    info!("Scored {} respondents in {:?}", results.len(), start.elapsed());

    let response = PredictionResponse::from(results);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn evaluate(config: &PipelineConfig) -> anyhow::Result<()> {
    let pipeline = RiskPipeline::from_config(config);
    let mut evaluated = 0;

    for substance in Substance::all() {
        let artifacts = match pipeline.artifacts().get(substance) {
            Ok(artifacts) => artifacts,
            Err(err) => {
                warn!("Skipping evaluation: {err}");
                continue;
            }
        };
        let Some(corpus) = artifacts.corpus() else {
            warn!("Skipping {substance} evaluation: no training corpus loaded");
            continue;
        };

        let seed = config.substance(substance).random_state;
        let held_out = holdout::stratified_split(corpus.targets(), config.holdout_fraction, seed)?;
        let pb = create_main_progress_bar(
            held_out.test.len() as u64,
            Some(&format!("Evaluating {substance}")),
        );
        let report = holdout::evaluate(
            artifacts.classifier(),
            corpus,
            config.holdout_fraction,
            seed,
            Some(&pb),
        )
        .with_context(|| format!("{substance} evaluation failed"))?;
        finish_progress_bar(&pb, "Evaluation complete");

        info!("{report}");
        evaluated += 1;
    }

    if evaluated == 0 {
        bail!("no substance could be evaluated");
    }
    Ok(())
}
