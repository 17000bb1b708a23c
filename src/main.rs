use anyhow::{Context, Result};
use clap::Parser;
use rl_compare::cli::{Cli, OutputFormat};
use rl_compare::comparison::{failure_message, ComparatorConfig, StatisticalComparator};
use rl_compare::sample_source::{JsonFileSource, SampleSource};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let base_config = match &args.config {
        Some(path) => ComparatorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ComparatorConfig::default(),
    };
    let config = args.apply_overrides(base_config);
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let source = JsonFileSource::new(&args.input);
    let groups = source
        .sample_groups(args.metric)
        .with_context(|| format!("Failed to load samples from {}", source.path().display()))?;

    let comparator = StatisticalComparator::new(config);
    tracing::debug!("Comparator config: {:?}", comparator.config());
    let report = match comparator.compare(&groups) {
        Ok(report) => report.with_metric(args.metric),
        Err(e) => {
            // Never render numbers for a failed comparison
            eprint!("{}", failure_message(&e));
            std::process::exit(2);
        }
    };

    match args.format {
        OutputFormat::Text => print!("{}", report.to_report_string()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    Ok(())
}
