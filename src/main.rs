//! kickscore: campaign feature extraction and scoring
//!
//! Main entry point for the command-line application.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kickscore::adapters::{CachedPageSource, JsonParameterFile, SqliteProjectStore};
use kickscore::application::{
    cohort_reference, BackfillService, RecommendationService, ServiceConfig,
};
use kickscore::domain::FeatureExtractor;
use kickscore::ports::ParameterSource;
use kickscore::FeatureName;

#[derive(Parser)]
#[command(
    name = "kickscore",
    about = "Score a crowdfunding campaign page against top performers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the feature vector of a saved page (reads stdin if no file)
    Extract {
        file: Option<PathBuf>,
    },

    /// Print the raw reference vector of the top-performer cohort
    Reference {
        /// Project database
        #[arg(long)]
        db: PathBuf,

        /// Success-ratio quantile for the cutoff
        #[arg(long)]
        quantile: Option<f64>,

        /// Only use projects in this currency
        #[arg(long)]
        currency: Option<String>,
    },

    /// Compare a project against the reference cohort
    Recommend {
        /// Project URL
        url: String,

        /// Project database
        #[arg(long)]
        db: PathBuf,

        /// Trained parameter file (JSON)
        #[arg(long)]
        params: PathBuf,

        /// Directory of scraped pages
        #[arg(long)]
        pages: PathBuf,

        #[arg(long)]
        quantile: Option<f64>,

        #[arg(long)]
        currency: Option<String>,

        /// Comma-separated feature names, in display order
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<String>>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract and store features for projects that lack them
    Backfill {
        #[arg(long)]
        db: PathBuf,

        #[arg(long)]
        pages: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging.
    //
    // Report output goes to stdout, so logs go to stderr unless
    // KICKSCORE_LOG_FILE points at a file.
    let (writer, _guard) = match std::env::var("KICKSCORE_LOG_FILE") {
        Ok(log_file) => {
            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
                .with_context(|| format!("Cannot open log file {log_file}"))?;
            tracing_appender::non_blocking(file)
        }
        Err(_) => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract { file } => extract(file),
        Command::Reference {
            db,
            quantile,
            currency,
        } => reference(db, config_with(quantile, currency, None)?),
        Command::Recommend {
            url,
            db,
            params,
            pages,
            quantile,
            currency,
            features,
            json,
        } => recommend(
            &url,
            db,
            params,
            pages,
            config_with(quantile, currency, features)?,
            json,
        ),
        Command::Backfill { db, pages } => backfill(db, pages),
    }
}

/// Environment config with CLI flags layered on top.
fn config_with(
    quantile: Option<f64>,
    currency: Option<String>,
    features: Option<Vec<String>>,
) -> Result<ServiceConfig> {
    let mut config = ServiceConfig::from_env_or_default();
    if let Some(q) = quantile {
        config.reference_quantile = q;
    }
    if let Some(c) = currency {
        config.currency = Some(c.trim().to_uppercase());
    }
    if let Some(names) = features {
        config.feature_subset = FeatureName::parse_all(&names)?;
    }
    Ok(config)
}

fn extract(file: Option<PathBuf>) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Cannot read {}", path.display()))?,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };

    let features = FeatureExtractor::default().extract(&raw)?;
    println!("{}", serde_json::to_string_pretty(&features)?);
    Ok(())
}

fn reference(db: PathBuf, config: ServiceConfig) -> Result<()> {
    let store = SqliteProjectStore::new(&db)?;
    let reference = cohort_reference(&store, &config)?;
    println!("{}", serde_json::to_string_pretty(&reference)?);
    Ok(())
}

fn recommend(
    url: &str,
    db: PathBuf,
    params: PathBuf,
    pages: PathBuf,
    config: ServiceConfig,
    json: bool,
) -> Result<()> {
    let params = JsonParameterFile::new(params).load()?;
    let service = RecommendationService::new(
        Arc::new(CachedPageSource::new(pages)),
        Arc::new(SqliteProjectStore::new(&db)?),
        params,
        config,
    );

    let report = service.recommend(url)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn backfill(db: PathBuf, pages: PathBuf) -> Result<()> {
    let service = BackfillService::new(
        Arc::new(CachedPageSource::new(pages)),
        Arc::new(SqliteProjectStore::new(&db)?),
    );

    let summary = service.run()?;
    println!(
        "Extracted features for {} projects ({} pages unavailable)",
        summary.extracted, summary.unavailable
    );
    Ok(())
}
