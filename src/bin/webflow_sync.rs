//! Mirror a Webflow CMS collection into the documentation tree.

use clap::Parser;
use std::process::ExitCode;

use docs_edge::config::{Config, Credentials, DotEnv, DEFAULT_CONFIG_PATH};
use docs_edge::logger;
use docs_edge::sync::{SyncReport, SyncRunner, WebflowClient};

#[derive(Parser, Debug)]
#[command(version, about = "Sync Webflow CMS items into Markdown documents")]
struct Args {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match Config::load_from(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Webflow sync failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logger::init(&cfg.logging) {
        eprintln!("Webflow sync failed: cannot open log file: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cfg) {
        Ok(Some(report)) => {
            logger::log_info(&report.summary());
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&format!("Webflow sync failed: {e}"));
            ExitCode::FAILURE
        }
    }
}

/// Run one sync. `Ok(None)` means credentials are missing and nothing ran.
fn run(cfg: &Config) -> Result<Option<SyncReport>, String> {
    let sync = &cfg.sync;
    let env_paths: Vec<_> = sync
        .env_files
        .iter()
        .map(|f| sync.project_root.join(f))
        .collect();
    let env = DotEnv::load(&env_paths).map_err(|e| e.to_string())?;

    let Some(credentials) = Credentials::resolve(sync, &env) else {
        logger::log_info(&format!(
            "Skipping Webflow sync: missing {} or {}",
            sync.token_var, sync.collection_var
        ));
        return Ok(None);
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;

    runtime
        .block_on(async {
            let client = WebflowClient::new(sync, &credentials.api_token)?;
            SyncRunner::new(sync.clone(), client, credentials.collection_id)
                .run()
                .await
        })
        .map(Some)
        .map_err(|e| e.to_string())
}
