//! A file vault TUI client.
//!
//! The client talks to a file-storage HTTP server: it registers and
//! authenticates users (with optional TOTP MFA), browses, uploads,
//! shares, and deletes files, and shows administrators the user roster.
//! Session cookies and previously viewed file content persist on device
//! between runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pico_args::Arguments;

use file_vault::session::SessionManager;
use file_vault::store::Store;
use fv_client::api_client::ApiClient;
use fv_client::config::ClientConfig;
use fv_client::routes::Route;
use fv_client::tui_app::TuiApp;

const HELP: &str = "\
Connect to a file vault server

USAGE:
  fv_client [OPTIONS]

OPTIONS:
  --server URL          Server base URL  [default: http://localhost:8000/api]
  --route PATH          Screen to open on start (e.g. /files/shared/abc123)

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: Option<String>,
    route: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs.opt_value_from_str("--server").ok().flatten(),
        route: pargs.opt_value_from_str("--route").ok().flatten(),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::from_env(args.server_url)?;

    let mut store = match &config.data_dir {
        Some(dir) => Store::open_at(&dir.join("file_vault.db")),
        None => Store::open_default(),
    }
    .context("Failed to open local store")?;
    store.set_cache_cap(config.cache_cap_bytes);

    // Logging goes to a file; the terminal belongs to the UI.
    if let Some(data_dir) = store.path().and_then(|p| p.parent().map(PathBuf::from)) {
        init_logging(&data_dir)?;
    }
    log::info!("file vault client starting against {}", config.api_url);

    // Restore the persisted profile before any gated screen can render.
    let mut session = SessionManager::new();
    let restored = match store.load_profile() {
        Ok(Some(profile)) => {
            session.restore(profile);
            true
        }
        Ok(None) => false,
        Err(e) => {
            log::warn!("could not restore persisted session: {e}");
            false
        }
    };

    let api = ApiClient::new(&config.api_url)?;

    let start = match args.route.as_deref() {
        Some(path) => Route::parse(path).map_err(|e| anyhow::anyhow!("{e}"))?,
        None if restored => Route::Home,
        None => Route::Login,
    };

    let terminal = ratatui::init();
    let app = TuiApp::new(session, store, api, config.api_url.clone());
    let result = app.run(start, terminal).await;
    ratatui::restore();

    result
}

fn init_logging(data_dir: &std::path::Path) -> Result<()> {
    let log_path = data_dir.join("fv_client.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}
