mod output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use graphctl_api::GraphClient;
use graphctl_engine::{InvocationContext, TracingTelemetrySink};
use graphctl_registry::{CommandRegistry, build_clap, resolve_invocation};
use graphctl_types::ArgumentBag;
use graphctl_util::{CliConfig, redact_sensitive};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, StdoutLogger};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {}", redact_sensitive(&format!("{:#}", error)));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let registry = CommandRegistry::load().context("a command definition is invalid")?;
    let matches = build_clap(&registry).get_matches();
    let (command, args) = resolve_invocation(&registry, &matches).context("expected a command")?;

    init_tracing(&args);

    let config = CliConfig::load().context("could not load configuration")?;
    let client = GraphClient::from_env(&config.graph_base_url, config.request_timeout())?;
    let resource = client.base_url();

    let cancellation = CancellationToken::new();
    install_cancellation(&cancellation, &config);

    let logger = Arc::new(StdoutLogger::new(
        OutputFormat::from_option(args.get_str("output")),
        command.default_properties().to_vec(),
    ));
    let ctx = InvocationContext::new(Arc::new(client), logger, resource)
        .with_telemetry(Arc::new(TracingTelemetrySink))
        .with_max_pages(config.max_pages)
        .with_cancellation(cancellation.clone());

    debug!(command = %command.name(), "invoking command");
    let outcome = command.execute(&ctx, &args).await;
    cancellation.cancel();

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            ctx.logger().log_to_stderr(error.message());
            Ok(ExitCode::from(1))
        }
    }
}

/// `--debug` and `--verbose` win over `RUST_LOG`; without either the
/// environment filter applies, defaulting to `warn`. Logs go to stderr.
fn init_tracing(args: &ArgumentBag) {
    let filter = if args.flag("debug") {
        EnvFilter::new("debug")
    } else if args.flag("verbose") {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Cancel the invocation on Ctrl-C and, when configured, at the deadline.
/// Both watchers stop once the token is cancelled.
fn install_cancellation(token: &CancellationToken, config: &CliConfig) {
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = on_interrupt.cancelled() => {}
            signal = tokio::signal::ctrl_c() => {
                if signal.is_ok() {
                    warn!("interrupted; cancelling");
                    on_interrupt.cancel();
                }
            }
        }
    });

    if let Some(deadline) = config.invocation_timeout() {
        let on_deadline = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = on_deadline.cancelled() => {}
                _ = tokio::time::sleep(deadline) => {
                    warn!(timeout_secs = deadline.as_secs(), "invocation deadline reached; cancelling");
                    on_deadline.cancel();
                }
            }
        });
    }
}
