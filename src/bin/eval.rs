//! Evaluation CLI: score every eval query against the candidate universe and
//! report the mean of each configured ranking metric.

use clap::Parser;
use ragbench::{
    eval::load_queries,
    scorer::{load_candidate_embeddings, Scorer},
    CandidateUniverse, Config, Evaluator, VssScorer,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Evaluation harness: run queries and report ranking metrics.
#[derive(Parser, Debug)]
#[command(name = "eval")]
struct Args {
    /// Path to eval queries JSON (default: eval.queries_path from config).
    #[arg(long)]
    queries: Option<PathBuf>,

    /// Metrics to compute, comma-separated (default: eval.metrics from config).
    #[arg(long, value_delimiter = ',')]
    metrics: Option<Vec<String>>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::load()?;

    let metrics = args.metrics.unwrap_or_else(|| config.eval.metrics.clone());
    let queries_path = args
        .queries
        .unwrap_or_else(|| config.queries_path().to_path_buf());

    let table = load_candidate_embeddings(config.candidates_path())?;
    let universe = Arc::new(CandidateUniverse::new(table.iter().map(|c| c.id))?);

    let mut scorer = VssScorer::new(Arc::clone(&universe), table, config.embeddings.cache_capacity)?;
    if scorer.dimensions() != config.embeddings.dimensions {
        anyhow::bail!(
            "Candidate embeddings have dimension {}, config says {}",
            scorer.dimensions(),
            config.embeddings.dimensions
        );
    }
    if let Some(dir) = config.ragbench.query_cache_dir.clone() {
        scorer = scorer.with_query_cache_dir(dir);
    }

    let queries = load_queries(&queries_path)?;
    if queries.is_empty() {
        anyhow::bail!("No queries in {}", queries_path.display());
    }

    println!(
        "Running evaluation on {} queries over {} candidates\n",
        queries.len(),
        universe.num_candidates()
    );

    let evaluator = Evaluator::new(universe);
    let mut sums = vec![0.0f64; metrics.len()];

    for query in &queries {
        let scores = scorer.score(&query.query, query.query_id, None)?;
        let report = evaluator.evaluate(&scores, &query.answer_ids, &metrics)?;

        let line: Vec<String> = report
            .iter()
            .map(|(name, value)| format!("{}: {:.3}", name, value))
            .collect();
        println!("  {} ({})", query.query, line.join(", "));

        for (i, (_, value)) in report.iter().enumerate() {
            sums[i] += value;
        }
    }

    println!("\n=== Evaluation Results ===");
    let mut failed = Vec::new();
    for (metric, sum) in metrics.iter().zip(&sums) {
        let mean = sum / queries.len() as f64;
        match config.eval.thresholds.get(metric) {
            Some(&threshold) => {
                let status = if mean >= threshold { "pass" } else { "FAIL" };
                println!("{}: {:.4} (>= {:.4} {})", metric, mean, threshold, status);
                if mean < threshold {
                    failed.push(metric.clone());
                }
            }
            None => println!("{}: {:.4}", metric, mean),
        }
    }

    if failed.is_empty() {
        std::process::exit(0);
    } else {
        println!("\nMetrics below threshold: {}", failed.join(", "));
        std::process::exit(1);
    }
}
