use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use ragstore_core::config::Settings;
use ragstore_core::services::StorageFactory;
use ragstore_core::Metadata;

/// Handle ingest command
pub async fn handle_ingest(
    settings: &Settings,
    files: Vec<PathBuf>,
    metadata: Option<Metadata>,
) -> Result<()> {
    let adapter = StorageFactory::create_adapter(settings).await?;

    for file in &files {
        let doc_id = adapter
            .ingest_file(file, metadata.clone())
            .await
            .with_context(|| format!("Failed to ingest {}", file.display()))?;
        println!("{} {}", style("✓").green(), style(doc_id).cyan());
    }

    println!(
        "Ingested {} file(s) into workspace {}",
        files.len(),
        style(adapter.workspace_id()).bold()
    );
    Ok(())
}

/// Handle ingest-text command
pub async fn handle_ingest_text(
    settings: &Settings,
    id: String,
    text: String,
    metadata: Option<Metadata>,
) -> Result<()> {
    let adapter = StorageFactory::create_adapter(settings).await?;

    adapter
        .ingest_text(&id, &text, metadata)
        .await
        .with_context(|| format!("Failed to ingest document '{id}'"))?;

    println!("{} {}", style("✓").green(), style(&id).cyan());
    Ok(())
}

/// Handle get command
pub async fn handle_get(settings: &Settings, id: String) -> Result<()> {
    let adapter = StorageFactory::create_adapter(settings).await?;

    match adapter.fetch_by_id(&id).await? {
        Some(document) => {
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        None => anyhow::bail!("Document '{id}' not found"),
    }
}

/// Handle delete command
pub async fn handle_delete(settings: &Settings, id: String) -> Result<()> {
    let adapter = StorageFactory::create_adapter(settings).await?;

    adapter
        .delete(&id)
        .await
        .with_context(|| format!("Failed to delete document '{id}'"))?;

    println!("{} Deleted {}", style("✓").green(), style(&id).cyan());
    Ok(())
}

/// Handle count command
pub async fn handle_count(settings: &Settings) -> Result<()> {
    let adapter = StorageFactory::create_adapter(settings).await?;
    println!("{}", adapter.count().await?);
    Ok(())
}
