mod export;
mod models;
mod run;
mod store;
mod ui;

use anyhow::{Context, Result};
use env_logger::Env;

const DATA_FILE_NAME: &str = "prepaid_records.txt";

fn main() -> Result<()> {
    let (file_override, args) = run::extract_file_flag(std::env::args().collect())?;
    let interactive = args.len() < 2;

    // Log lines on stderr would tear the alternate screen, so the TUI stays quiet
    // unless RUST_LOG asks otherwise.
    let default_filter = if interactive { "off" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let path = match file_override {
        Some(path) => path,
        None => get_data_path()?,
    };
    let mut store = store::RecordStore::new(path);

    if interactive {
        run::as_tui(&mut store)
    } else {
        run::as_cli(&args, &mut store)
    }
}

fn get_data_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "prepaid-ledger", "PrepaidLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join(DATA_FILE_NAME))
}
