use std::{fs, path::PathBuf};

use clap::Parser;
use storefront_coupons::openapi::ApiDocV1;
use utoipa::OpenApi;

/// Writes the coupon API's OpenAPI document to disk.
#[derive(Parser, Debug)]
#[command(name = "openapi-export", version)]
struct Cli {
    /// Output file
    #[arg(short, long, default_value = "openapi/storefront-coupons.v1.json")]
    out: PathBuf,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let openapi = ApiDocV1::openapi();
    let json = if cli.compact {
        serde_json::to_string(&openapi)?
    } else {
        serde_json::to_string_pretty(&openapi)?
    };

    if let Some(dir) = cli.out.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(&cli.out, json)?;

    println!("OpenAPI document written to {}", cli.out.display());
    Ok(())
}
