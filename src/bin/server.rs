//! Date prediction JSON-RPC server
//!
//! Run with: date-prediction-server

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use date_prediction::config::{ParamPolicy, ServerConfig, DEFAULT_PATH, DEFAULT_PORT};
use date_prediction::error::{DatePredictionError, Result};
use date_prediction::server::RpcServer;

#[derive(Parser, Debug)]
#[command(name = "date-prediction-server")]
#[command(about = "JSON-RPC server building harvest and expiration date prompts")]
struct Args {
    /// Host to bind
    #[arg(long, env = "DATE_PREDICTION_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(long, env = "DATE_PREDICTION_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path the RPC endpoint is mounted on
    #[arg(long, env = "DATE_PREDICTION_PATH", default_value = DEFAULT_PATH)]
    path: String,

    /// Per-request deadline in seconds, body read included
    #[arg(long, env = "DATE_PREDICTION_REQUEST_TIMEOUT_SECS", default_value = "30")]
    request_timeout_secs: u64,

    /// Largest accepted request body in bytes
    #[arg(long, env = "DATE_PREDICTION_MAX_BODY_BYTES", default_value = "1048576")]
    max_body_bytes: usize,

    /// Allow cross-origin requests from any origin
    #[arg(long, env = "DATE_PREDICTION_ALLOW_CORS")]
    allow_cors: bool,

    /// Missing parameter handling (lenient or strict)
    #[arg(long, env = "DATE_PREDICTION_PARAM_POLICY", default_value = "lenient")]
    param_policy: String,

    /// Log output format (text or json)
    #[arg(long, env = "DATE_PREDICTION_LOG_FORMAT", default_value = "text")]
    log_format: String,
}

impl Args {
    fn to_config(&self) -> Result<ServerConfig> {
        let param_policy = self
            .param_policy
            .parse::<ParamPolicy>()
            .map_err(DatePredictionError::Config)?;

        let config = ServerConfig {
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
            request_timeout_secs: self.request_timeout_secs,
            max_body_bytes: self.max_body_bytes,
            allow_cors: self.allow_cors,
            param_policy,
        };
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false))
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_format);

    let config = args.to_config()?;
    tracing::debug!(?config, "Loaded configuration");

    let server = RpcServer::from_config(config);
    let bound = match server.bind().await {
        Ok(bound) => bound,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e);
        }
    };

    bound.serve_with_shutdown(shutdown_signal()).await
}
