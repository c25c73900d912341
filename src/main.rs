use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod engine;
mod engines;
mod error;
mod extraction;
mod orchestrator;
mod server;

#[derive(Parser, Debug)]
#[command(name = "fantasy-xi-ocr-server")]
#[command(about = "Extracts fantasy-cricket team selections from screenshots")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "XI_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "XI_PORT", default_value = "9393")]
    pub port: u16,

    /// Maximum upload size in bytes (default: 10MB)
    #[arg(long, env = "XI_MAX_FILE_SIZE", default_value = "10485760")]
    pub max_file_size: usize,

    /// OCR.space API key
    #[arg(long, env = "OCR_SPACE_API_KEY", hide_env_values = true)]
    pub ocr_api_key: Option<String>,

    /// OCR provider endpoint
    #[arg(
        long,
        env = "OCR_SPACE_ENDPOINT",
        default_value = "https://api.ocr.space/parse/image"
    )]
    pub ocr_endpoint: String,

    /// Provider engine ids, in the order they are tried
    #[arg(
        long,
        env = "OCR_SPACE_ENGINES",
        value_delimiter = ',',
        default_value = "2,1"
    )]
    pub ocr_engines: Vec<u8>,

    /// Stop trying engines once a result has more characters than this
    #[arg(long, env = "XI_EARLY_EXIT_CHARS", default_value = "100")]
    pub early_exit_chars: usize,

    /// Timeout for a single OCR call, in seconds
    #[arg(long, env = "OCR_TIMEOUT_SECS", default_value = "20")]
    pub ocr_timeout_secs: u64,

    /// Maximum redirect hops followed per OCR call
    #[arg(long, env = "OCR_MAX_REDIRECTS", default_value = "3")]
    pub max_redirects: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!(
        "Starting fantasy-xi-ocr-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);
    if !config.ocr.is_configured() {
        tracing::warn!("No usable OCR API key configured; /extract will answer NOT_CONFIGURED");
    }

    server::run(config).await
}
