use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use shoprec::prelude::*;
use shoprec::{default_counts, sample_test_users, snapshot, CustomerId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    User,
    Item,
    Cluster,
}

/// Retail recommender over a shopping snapshot
#[derive(Parser, Debug)]
#[command(name = "shoprec")]
#[command(about = "Recommend products and compare recommendation strategies", long_about = None)]
struct Args {
    /// Path to the shopping snapshot CSV
    #[arg(short, long)]
    data: PathBuf,

    /// Recommendation strategy
    #[arg(short, long, value_enum, default_value_t = Mode::Cluster)]
    mode: Mode,

    /// Customer to recommend for
    #[arg(short, long)]
    user_id: Option<CustomerId>,

    /// Number of recommendations
    #[arg(short, long, default_value_t = 5)]
    num_recommendations: usize,

    /// Run the evaluation sweep instead of a single recommendation
    #[arg(long)]
    evaluate: bool,

    /// Number of randomly drawn test customers
    #[arg(long, default_value_t = 100)]
    n_test_users: usize,

    /// Recommendation counts to sweep
    #[arg(long, value_delimiter = ',')]
    counts: Option<Vec<usize>>,

    /// Print cluster insights
    #[arg(long)]
    insights: bool,

    /// JSON file with `recommender` and `evaluator` settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    recommender: RecommenderConfig,
    evaluator: EvaluatorConfig,
}

fn read_config(path: Option<&Path>) -> anyhow::Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting shoprec v{}", env!("CARGO_PKG_VERSION"));
    let config = read_config(args.config.as_deref())?;

    let dataset = snapshot::load_dataset(&args.data)
        .with_context(|| format!("loading snapshot {}", args.data.display()))?;
    let dataset = Arc::new(dataset);
    info!(customers = dataset.len(), "dataset ready");

    if args.evaluate {
        let counts = args.counts.unwrap_or_else(default_counts);
        let test_users = sample_test_users(&dataset, args.n_test_users, config.recommender.seed);
        let evaluator =
            Evaluator::with_default_recommenders(dataset, &config.recommender, config.evaluator)?;
        let result = evaluator.evaluate(&test_users, &counts);
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if args.insights {
        let recommender = ClusterRecommender::new(dataset.clone(), &config.recommender)?;
        println!("{}", serde_json::to_string_pretty(&recommender.insights())?);
        if args.user_id.is_none() {
            return Ok(());
        }
    }

    let user_id = args
        .user_id
        .context("--user-id is required unless --evaluate or --insights is given")?;

    let recommender: Box<dyn Recommender> = match args.mode {
        Mode::User => Box::new(UserBasedRecommender::new(dataset, &config.recommender)?),
        Mode::Item => Box::new(ItemBasedRecommender::new(dataset, &config.recommender)?),
        Mode::Cluster => Box::new(ClusterRecommender::new(dataset, &config.recommender)?),
    };

    let outcome = recommender.recommend(user_id, args.num_recommendations);
    info!(strategy = %recommender.kind(), returned = outcome.len(), "recommendation done");
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
