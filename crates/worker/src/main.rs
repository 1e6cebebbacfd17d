//! # timecast-worker
//!
//! Command-line worker running timecast jobs against a file-backed model
//! store. Jobs read from a demo in-memory data source; job state and
//! results are printed as JSON lines.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timecast::{
    Constraint, ConstraintType, DenseRegressorFactory, Feature, MemoryDataSource, ModelSettings,
    OutputFormat, TrainConfig,
};
use timecast_worker::{FileStore, JobRequest, ModelStore, StdoutSink, Worker};

#[derive(Parser)]
#[command(name = "timecast-worker")]
#[command(about = "Time series modeling job worker", long_about = None)]
struct Cli {
    /// Model store directory
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Number of demo buckets generated in the data source
    #[arg(long, default_value = "300")]
    buckets: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model over the full data range
    Train {
        /// Model name
        #[arg(short, long)]
        model: String,

        /// Window span, in buckets (used when the model is created)
        #[arg(long, default_value = "5")]
        span: usize,

        /// Hyperparameter search budget
        #[arg(long, default_value = "10")]
        max_evals: usize,

        /// Maximum training epochs per candidate
        #[arg(long, default_value = "100")]
        epochs: usize,
    },

    /// Predict values over a bucket range
    Predict {
        /// Model name
        #[arg(short, long)]
        model: String,

        /// Range start (epoch seconds)
        #[arg(long)]
        from_ts: i64,

        /// Range end (epoch seconds)
        #[arg(long)]
        to_ts: i64,

        /// Output format (series, buckets)
        #[arg(long, default_value = "series")]
        format: String,
    },

    /// Forecast values and check them against a threshold
    Forecast {
        /// Model name
        #[arg(short, long)]
        model: String,

        /// Range start (epoch seconds)
        #[arg(long)]
        from_ts: i64,

        /// Range end (epoch seconds)
        #[arg(long)]
        to_ts: i64,

        /// Violation threshold; values above it are reported
        #[arg(long)]
        high: Option<f64>,
    },
}

const BUCKET_INTERVAL: u64 = 10;
const FEATURE_NAME: &str = "avg_value";

fn demo_source(nb_buckets: usize) -> MemoryDataSource {
    let rows = (0..nb_buckets)
        .map(|i| vec![50.0 + 10.0 * (i as f64 / 8.0).sin()])
        .collect();
    MemoryDataSource::new(0, BUCKET_INTERVAL, rows)
}

fn demo_settings(name: &str, span: usize) -> ModelSettings {
    ModelSettings {
        name: name.to_string(),
        index: "demo".to_string(),
        bucket_interval: BUCKET_INTERVAL,
        interval: 60,
        offset: 0,
        span,
        features: vec![Feature::new(FEATURE_NAME, "avg", "value")],
    }
}

fn build_request(store: &FileStore, command: Commands) -> Result<JobRequest, String> {
    match command {
        Commands::Train {
            model,
            span,
            max_evals,
            epochs,
        } => {
            if store.load_settings(&model).is_err() {
                store
                    .save_settings(&demo_settings(&model, span))
                    .map_err(|e| e.to_string())?;
            }
            Ok(JobRequest::Train {
                model,
                from_ts: None,
                to_ts: None,
                config: TrainConfig::default().max_evals(max_evals).num_epochs(epochs),
            })
        }
        Commands::Predict {
            model,
            from_ts,
            to_ts,
            format,
        } => {
            let format: OutputFormat = format.parse().map_err(|e| format!("{}", e))?;
            Ok(JobRequest::Predict {
                model,
                from_ts,
                to_ts,
                format,
                save_prediction: false,
            })
        }
        Commands::Forecast {
            model,
            from_ts,
            to_ts,
            high,
        } => Ok(JobRequest::Forecast {
            model,
            from_ts,
            to_ts,
            format: OutputFormat::Series,
            constraint: high.map(|threshold| Constraint {
                feature: FEATURE_NAME.to_string(),
                constraint_type: ConstraintType::High,
                threshold,
            }),
            save_prediction: false,
        }),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timecast_worker=info,timecast_core=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let store = FileStore::new(&cli.data_dir);
    let source = demo_source(cli.buckets);

    let request = match build_request(&store, cli.command) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let sink = StdoutSink;
    let worker = Worker::new(&store, &source, &DenseRegressorFactory, &sink);
    let job_id = format!("{}", std::process::id());

    match worker.run(&job_id, request) {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
