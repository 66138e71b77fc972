//! `apigen` CLI: generate per-domain TypeScript API clients from an
//! OpenAPI document.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use apigen::{
    ApiDocument, GenerateError, GeneratorConfig, LocalFs, OutputLayout, Pipeline,
    ZodClientGenerator,
};

#[derive(Parser)]
#[command(
    name = "apigen",
    version,
    about = "Generate per-domain TypeScript API clients from an OpenAPI document"
)]
struct Cli {
    /// Path to the OpenAPI JSON document.
    #[arg(long)]
    spec: PathBuf,

    /// Output root directory (overrides the config file).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Optional apigen.toml configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match GeneratorConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => GeneratorConfig::default(),
    };
    if let Some(out) = cli.out {
        config.out_dir = out;
    }

    let document_json = match std::fs::read_to_string(&cli.spec) {
        Ok(json) => json,
        Err(err) => {
            error!(path = %cli.spec.display(), "Failed to read spec: {err}");
            return ExitCode::FAILURE;
        }
    };

    let doc = match ApiDocument::from_json(&document_json) {
        Ok(doc) => doc,
        Err(message) => {
            error!(path = %cli.spec.display(), "{message}");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = Pipeline::new(
        ZodClientGenerator,
        LocalFs,
        OutputLayout::new(&config.out_dir),
        config.format_options(),
    );

    match pipeline.run(&doc).await {
        Ok(report) => {
            let domains: Vec<&str> = report.generated.iter().map(|d| d.as_str()).collect();
            info!(
                out_dir = %config.out_dir.display(),
                domains = domains.join(", "),
                "Generation complete."
            );
            ExitCode::SUCCESS
        }
        Err(GenerateError::Run {
            attempted,
            failures,
        }) => {
            for failure in &failures {
                error!(domain = %failure.domain, "{}", failure.source);
            }
            error!("Generation failed for {} of {attempted} domains.", failures.len());
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    // APIGEN_LOG controls the log level: "trace", "debug", "info", "warn",
    // "error", or a full tracing filter spec.
    let filter = match std::env::var("APIGEN_LOG") {
        Ok(spec) => spec,
        Err(_) => "apigen=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}
