//! One-off setup: find or create the TwelveLabs index and record its id.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use adreel_api::services::find_or_create_index;
use adreel_api::{envfile, logging};
use adreel_twelvelabs::TwelveLabsClient;

#[derive(Parser, Debug)]
#[command(name = "create-index", about = "Create or reuse the TwelveLabs index and save TL_INDEX_ID")]
struct Args {
    /// Env file that receives TL_INDEX_ID
    #[arg(long, default_value = ".env.local")]
    env_file: PathBuf,

    /// Name for a newly created index
    #[arg(long)]
    name: Option<String>,

    /// Always create a new index, even when one exists
    #[arg(long)]
    force_new: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::from_path(&args.env_file).ok();
    dotenvy::dotenv().ok();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    logging::init_tracing();

    let client = TwelveLabsClient::from_env().context("TL_API_KEY must be set to create an index")?;

    let index = find_or_create_index(&client, args.name, args.force_new)
        .await
        .context("Failed to create index")?;
    info!(index_id = %index.id, "Index ready");

    envfile::upsert_var_in_file(&args.env_file, "TL_INDEX_ID", &index.id)
        .with_context(|| format!("Failed to update {}", args.env_file.display()))?;

    println!("TL_INDEX_ID={}", index.id);
    println!("Saved to {}", args.env_file.display());
    Ok(())
}
