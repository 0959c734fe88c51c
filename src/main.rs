//! parley - chat-bot command dispatcher, driven from the console.

use parley::config::{self, Config};
use parley::dispatch::{self, Dispatcher};
use parley::session::{ConsoleSession, Session};
use parley::store::{Store, StoreMode};
use parley::{handlers, http, metrics};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "parley.toml";

/// Inbound message queue depth between the console reader and the dispatcher.
const INBOUND_QUEUE_SIZE: usize = 64;

/// How long shutdown waits for pagination widgets to clean up.
const WIDGET_GRACE: Duration = Duration::from_secs(5);

/// How long runtime shutdown waits for blocking tasks such as a pending stdin read.
const RUNTIME_GRACE: Duration = Duration::from_millis(250);

fn main() -> anyhow::Result<()> {
    // Initialize tracing. Replies go to stdout, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run());
    // The console reader may be parked in a blocking stdin read
    runtime.shutdown_timeout(RUNTIME_GRACE);
    result
}

async fn run() -> anyhow::Result<()> {
    let config = load_config()?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "Refusing to start with {} configuration error(s)",
            errors.len()
        ));
    }

    info!(
        name = %config.bot.name,
        prefix = %config.bot.prefix,
        store = %config.store.path,
        "Starting parley"
    );

    let shutdown = CancellationToken::new();

    // Prometheus metrics are optional
    let http_task = match config.metrics.port {
        Some(port) => {
            metrics::init();
            info!("Metrics initialized");
            let token = shutdown.clone();
            Some(tokio::spawn(http::run_http_server(port, token)))
        }
        None => {
            info!("Metrics disabled");
            None
        }
    };

    let store = Store::open(StoreMode::from_path(&config.store.path))?;

    let router = handlers::router()?;
    info!(commands = router.len(), "Commands registered");

    let mut dispatcher = Dispatcher::new(router, store.clone(), config.bot.prefix.clone())
        .with_pagination(config.pagination.options());
    for observer in handlers::observers() {
        dispatcher = dispatcher.with_observer(observer);
    }
    let dispatcher = Arc::new(dispatcher);

    let console = Arc::new(ConsoleSession::new(&config.bot.name, &config.console));
    let session: Arc<dyn Session> = console.clone();
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE_SIZE);
    let mut reader = console.spawn_reader(inbound_tx);

    let runner = tokio::spawn(dispatch::run(
        Arc::clone(&dispatcher),
        session,
        inbound_rx,
        shutdown.clone(),
    ));

    info!(
        "Type commands prefixed with `{}`; `/react <id> <emoji>` reacts to a message",
        config.bot.prefix
    );

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Received Ctrl-C"),
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
            shutdown.cancel();
        }
        _ = &mut reader => info!("Console input closed"),
    }

    // Dropping the reader closes the inbound stream; queued messages still run
    reader.abort();
    if let Err(e) = runner.await {
        error!(error = %e, "Dispatch loop failed");
    }
    shutdown.cancel();
    dispatcher.widgets().shutdown(WIDGET_GRACE).await;
    if let Some(task) = http_task
        && let Err(e) = task.await
    {
        error!(error = %e, "Metrics server task failed");
    }
    store.close()?;

    info!("Bye!");
    Ok(())
}

/// Load the config named on the command line, else `parley.toml` if present,
/// else built-in defaults.
fn load_config() -> anyhow::Result<Config> {
    let explicit = std::env::args().nth(1);
    let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    if explicit.is_none() && !Path::new(&path).exists() {
        info!(path = %path, "No config file found, using defaults");
        return Ok(Config::default());
    }

    let config = Config::load(&path).map_err(|e| {
        error!(path = %path, error = %e, "Failed to load config");
        e
    })?;
    Ok(config)
}
