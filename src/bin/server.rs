use std::{
    env::{self},
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use axum::middleware;
#[cfg(debug_assertions)]
use spendwise::logging_middleware;
#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use spendwise::{
    AppState, Config, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_UPLOAD_PRESET, DEFAULT_IMAGE_UPLOAD_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TIMEZONE, build_router, graceful_shutdown,
};

/// The web server for SpendWise.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the SpendWise REST API.
    #[arg(long, env = "SPENDWISE_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Where profile images are uploaded to.
    #[arg(long, env = "SPENDWISE_IMAGE_UPLOAD_URL", default_value = DEFAULT_IMAGE_UPLOAD_URL)]
    image_upload_url: String,

    /// The unsigned upload preset for the image host.
    #[arg(long, default_value = DEFAULT_IMAGE_UPLOAD_PRESET)]
    image_upload_preset: String,

    /// The canonical name of the timezone used for "this month", e.g. "Asia/Kolkata".
    #[arg(long, env = "TZ", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Seconds to wait on the REST API and image host before giving up.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    /// The address to listen on.
    #[arg(short, long, default_value = "0.0.0.0")]
    address: IpAddr,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from((args.address, args.port));

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let mut config = Config::new(&secret);
    config.api_base_url = args.api_base_url;
    config.image_upload_url = args.image_upload_url;
    config.image_upload_preset = args.image_upload_preset;
    config.local_timezone = args.timezone;
    config.request_timeout = Duration::from_secs(args.request_timeout_secs);

    let app_state = AppState::new(&config).unwrap_or_else(|error| {
        tracing::error!("Could not start the server: {error}");
        std::process::exit(1);
    });

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(app_state));

    #[cfg(debug_assertions)]
    let router = router
        .layer(middleware::from_fn(logging_middleware))
        .layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {addr}, using the API at {}", config.api_base_url);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly");
}

#[cfg(debug_assertions)]
const DEFAULT_LOG_FILTER: &str = "spendwise=debug,tower_http=debug,axum=debug";
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_FILTER: &str = "info";

fn setup_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .with(env_filter)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
