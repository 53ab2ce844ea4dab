mod logging;
mod settings;

use clap::{Parser, Subcommand};
use rv_serve::upstream::HttpUpstream;
use settings::Settings;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "rv", version, about = "Marketplace reviews service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// TOML settings file; `REVIEWS_*` variables override it.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the OpenAPI document.
    Openapi,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config } => match run_server(config.as_deref()).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                error!("{message}");
                eprintln!("serve error: {message}");
                ExitCode::FAILURE
            }
        },
        Command::Openapi => {
            println!("{}", rv_serve::openapi::generate_spec());
            ExitCode::SUCCESS
        }
    }
}

async fn run_server(config: Option<&Path>) -> Result<(), String> {
    let settings = Settings::load(config).map_err(|err| err.to_string())?;
    logging::init_logging(&settings.log_level);

    if let Some(parent) = Path::new(&settings.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
        }
    }
    let service_config = settings.service_config().map_err(|err| err.to_string())?;
    let upstream =
        HttpUpstream::new(settings.upstream_config()).map_err(|err| err.to_string())?;

    let state = rv_serve::AppState {
        db_path: settings.db_path.clone(),
        config: service_config,
        upstream: Arc::new(upstream),
        version: settings.version.clone(),
    };
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), settings.port);
    info!(version = %settings.version, environment = %settings.environment, "starting reviews service");
    rv_serve::serve(state, addr)
        .await
        .map_err(|err| err.to_string())
}
