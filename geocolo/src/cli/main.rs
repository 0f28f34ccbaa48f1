use argument::Cli;
use clap::Parser;
use tracing_futures::Instrument;
use tracing_subscriber::EnvFilter;

mod argument;

/// Send diagnostics to stderr, stdout carries the results.
fn init_tracing(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_filter);

    let config = cli.into_config()?;
    let span = tracing::info_span!("query", mode = %config.mode, endpoint = %config.endpoint);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(
        async {
            let mut stdout = std::io::stdout().lock();
            geocolo::run(&config, &mut stdout).await
        }
        .instrument(span),
    )?;

    Ok(())
}
