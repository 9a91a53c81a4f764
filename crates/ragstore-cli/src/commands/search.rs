use anyhow::Result;
use console::style;

use ragstore_core::config::Settings;
use ragstore_core::services::{RagStorageAdapter, StorageFactory};
use ragstore_core::SearchResult;

const PREVIEW_CHARS: usize = 160;

/// Handle search command
pub async fn handle_search(
    settings: &Settings,
    query: String,
    top_k: usize,
    json: bool,
) -> Result<()> {
    let adapter = open_for_search(settings).await?;
    let results = adapter.similarity_search(&query, top_k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if !adapter.has_vector_index() {
        eprintln!(
            "{}",
            style("Vector index disabled; similarity search returns no results.").yellow()
        );
        return Ok(());
    }

    if results.is_empty() {
        println!("{}", style("No matching documents.").dim());
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        print_result(rank + 1, result);
    }
    Ok(())
}

/// Handle reindex command
pub async fn handle_reindex(settings: &Settings) -> Result<()> {
    let adapter = StorageFactory::create_adapter(settings).await?;

    if !adapter.has_vector_index() {
        println!("{}", style("Vector index disabled; nothing to reindex.").dim());
        return Ok(());
    }

    let report = adapter.reindex().await?;
    println!(
        "{} Reindexed {} document(s) in workspace {}",
        style("✓").green(),
        report.reindexed,
        style(adapter.workspace_id()).bold()
    );
    if report.skipped > 0 {
        println!(
            "{} Skipped {} document(s) with unreadable embeddings",
            style("!").yellow(),
            report.skipped
        );
    }
    Ok(())
}

/// Open the adapter, filling a process-local index from the stored embeddings
async fn open_for_search(settings: &Settings) -> Result<RagStorageAdapter> {
    let adapter = StorageFactory::create_adapter(settings).await?;

    if adapter.has_vector_index() && !StorageFactory::has_persistent_index(settings) {
        let report = adapter.reindex().await?;
        tracing::debug!(
            reindexed = report.reindexed,
            skipped = report.skipped,
            "Loaded in-memory vector index"
        );
    }

    Ok(adapter)
}

fn print_result(rank: usize, result: &SearchResult) {
    println!(
        "{}. {} {}",
        rank,
        style(&result.doc_id).cyan().bold(),
        style(format!("(score {:.4})", result.score)).dim()
    );

    let preview: String = result.text.chars().take(PREVIEW_CHARS).collect();
    let ellipsis = if result.text.chars().count() > PREVIEW_CHARS {
        "…"
    } else {
        ""
    };
    println!("   {}{}", preview.replace('\n', " "), ellipsis);
}
