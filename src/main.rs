// ==========================================
// Link Marketplace - site-import CLI
// ==========================================
// Usage:
//   site-import template [current|legacy]
//   site-import parse <file> [client_id]
//   site-import preview <file> [client_id]
//   site-import import <file>
//   site-import catalog [client_id]
//
// Database: LINK_MARKETPLACE_DB_PATH, else the user data dir.
// Output: JSON on stdout, logs on stderr.
// ==========================================

use anyhow::{anyhow, bail, Context};
use link_marketplace::api::ApiError;
use link_marketplace::app::{get_default_db_path, AppState};
use link_marketplace::domain::TemplateVariant;
use serde::Serialize;
use std::path::Path;

const USAGE: &str = "usage: site-import <template [current|legacy] | parse <file> [client_id] | preview <file> [client_id] | import <file> | catalog [client_id]>";
const CLI_ACTOR: &str = "site-import-cli";

fn main() -> anyhow::Result<()> {
    link_marketplace::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    match runtime.block_on(run(&args)) {
        Ok(()) => Ok(()),
        Err(err) => {
            // API failures carry a stable code; print it as JSON for scripts
            if let Some(api_err) = err.downcast_ref::<ApiError>() {
                eprintln!(
                    "{}",
                    serde_json::json!({ "code": api_err.code(), "message": api_err.to_string() })
                );
                std::process::exit(1);
            }
            Err(err)
        }
    }
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    let command = args.first().map(String::as_str).ok_or_else(|| anyhow!(USAGE))?;

    let db_path = get_default_db_path();
    tracing::info!(db_path = %db_path, version = link_marketplace::VERSION, "site-import starting");
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match command {
        "template" => {
            let variant = match args.get(1) {
                Some(v) => Some(v.parse::<TemplateVariant>().map_err(|e| anyhow!(e))?),
                None => None,
            };
            let csv_text = state.import_api.template(variant).await?;
            print!("{}", csv_text);
        }
        "parse" => {
            let (name, bytes) = read_upload(args.get(1))?;
            let client_id = args.get(2).map(String::as_str);
            let summary = state.import_api.parse(&name, &bytes, client_id).await?;
            print_json(&summary)?;
        }
        "preview" => {
            let (name, bytes) = read_upload(args.get(1))?;
            let client_id = args.get(2).map(String::as_str);
            let summary = state.import_api.parse(&name, &bytes, client_id).await?;
            let mapping_json = serde_json::to_string(&summary.mapping)?;
            let preview = state
                .import_api
                .preview(&name, &bytes, &mapping_json, client_id)
                .await?;
            print_json(&preview)?;
        }
        "import" => {
            let (name, bytes) = read_upload(args.get(1))?;
            let summary = state.import_api.parse(&name, &bytes, None).await?;
            let mapping_json = serde_json::to_string(&summary.mapping)?;
            let preview = state.import_api.preview(&name, &bytes, &mapping_json, None).await?;

            let selected: Vec<usize> = preview
                .preview
                .iter()
                .filter(|row| row.is_valid)
                .map(|row| row.row.row_index)
                .collect();
            let result = state
                .import_api
                .save(&preview.preview, &selected, CLI_ACTOR)
                .await?;
            print_json(&result)?;
        }
        "catalog" => {
            let client_id = args.get(1).map(String::as_str);
            let catalog = state.pricing_api.catalog(client_id).await?;
            print_json(&catalog)?;
        }
        other => bail!("unknown command: {}\n{}", other, USAGE),
    }

    Ok(())
}

fn read_upload(path: Option<&String>) -> anyhow::Result<(String, Vec<u8>)> {
    let path = path.ok_or_else(|| anyhow!("missing <file>\n{}", USAGE))?;
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path))?;
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.clone());
    Ok((name, bytes))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
