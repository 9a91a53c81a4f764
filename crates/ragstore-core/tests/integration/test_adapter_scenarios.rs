use ragstore_core::{RecordStore, StoredDocument, VectorIndex};
use serde_json::json;

use crate::common::{meta, Stores};

#[tokio::test]
async fn test_readme_scenario() {
    let stores = Stores::new().await;
    let adapter = stores.adapter_without_index();

    adapter
        .ingest_text("readme.md", "hello world", Some(meta(json!({"path": "readme.md"}))))
        .await
        .unwrap();

    let document = adapter.fetch_by_id("readme.md").await.unwrap().unwrap();
    assert_eq!(
        document,
        StoredDocument {
            doc_id: "readme.md".to_string(),
            text: "hello world".to_string(),
            metadata: meta(json!({"path": "readme.md", "workspace_id": "default"})),
        }
    );
}

#[tokio::test]
async fn test_workspace_tag_overrides_caller_value() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    adapter
        .ingest_text("doc", "text", Some(meta(json!({"workspace_id": "spoofed"}))))
        .await
        .unwrap();

    let document = adapter.fetch_by_id("doc").await.unwrap().unwrap();
    assert_eq!(document.metadata["workspace_id"], json!("ws1"));
    let entry = stores.index.inner.get("doc").await.unwrap();
    assert_eq!(entry.metadata["workspace_id"], json!("ws1"));
}

#[tokio::test]
async fn test_upsert_is_idempotent_and_last_write_wins() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    adapter.ingest_text("doc", "first version", None).await.unwrap();
    adapter.ingest_text("doc", "second version", None).await.unwrap();

    assert_eq!(adapter.count().await.unwrap(), 1);
    assert_eq!(stores.index.count().await.unwrap(), 1);
    let document = adapter.fetch_by_id("doc").await.unwrap().unwrap();
    assert_eq!(document.text, "second version");
    assert_eq!(stores.index.inner.get("doc").await.unwrap().text, "second version");
}

#[tokio::test]
async fn test_document_without_tokens_is_still_searchable() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    adapter.ingest_text("punct", "!!! ??? ...", None).await.unwrap();

    let results = adapter.similarity_search("!!!", 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, "punct");
    assert_eq!(results[0].score, 0.0);
}

#[tokio::test]
async fn test_search_without_index_is_empty() {
    let stores = Stores::new().await;
    let adapter = stores.adapter_without_index();
    adapter.ingest_text("doc", "searchable text", None).await.unwrap();

    assert!(!adapter.has_vector_index());
    assert!(adapter.similarity_search("searchable text", 5).await.unwrap().is_empty());
    assert!(adapter.similarity_search("", 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_ranks_and_hydrates() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    adapter
        .ingest_text("rust", "rust ownership and borrowing rules", None)
        .await
        .unwrap();
    adapter
        .ingest_text("sql", "sqlite write ahead logging", Some(meta(json!({"lang": "sql"}))))
        .await
        .unwrap();

    let results = adapter
        .similarity_search("ownership and borrowing in rust", 2)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].doc_id, "rust");
    assert_eq!(results[0].text, "rust ownership and borrowing rules");
    assert!(results[0].score > results[1].score);
    assert_eq!(results[1].metadata["lang"], json!("sql"));

    let top_one = adapter.similarity_search("ownership", 1).await.unwrap();
    assert_eq!(top_one.len(), 1);
}

#[tokio::test]
async fn test_orphaned_hit_is_dropped() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    adapter.ingest_text("kept", "shared words here", None).await.unwrap();
    adapter.ingest_text("orphan", "shared words there", None).await.unwrap();
    stores.records.delete("orphan").await.unwrap();

    let results = adapter.similarity_search("shared words", 5).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["kept"]);
}

#[tokio::test]
async fn test_delete_removes_both() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    adapter.ingest_text("doc", "to be removed", None).await.unwrap();
    adapter.delete("doc").await.unwrap();

    assert!(adapter.fetch_by_id("doc").await.unwrap().is_none());
    assert!(!stores.index.inner.contains("doc").await);
    assert!(adapter.similarity_search("to be removed", 5).await.unwrap().is_empty());

    // Deleting again is fine
    adapter.delete("doc").await.unwrap();
}

#[tokio::test]
async fn test_invalid_inputs_are_rejected() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    let err = adapter.ingest_text("", "text", None).await.unwrap_err();
    assert_eq!(err.category(), "validation");
    assert_eq!(adapter.count().await.unwrap(), 0);
    assert!(adapter.fetch_by_id("missing").await.unwrap().is_none());
}
