use std::fs;

use serde_json::json;
use tempfile::TempDir;

use crate::common::{meta, Stores};

#[tokio::test]
async fn test_ingest_file_tags_path_and_drops_invalid_utf8() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.txt");
    fs::write(&path, b"valid \xff\xfetext").unwrap();

    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");
    let doc_id = adapter
        .ingest_file(&path, Some(meta(json!({"path": "ignored", "source": "disk"}))))
        .await
        .unwrap();

    assert_eq!(doc_id, path.to_string_lossy().replace('\\', "/"));
    let document = adapter.fetch_by_id(&doc_id).await.unwrap().unwrap();
    assert_eq!(document.text, "valid text");
    assert_eq!(document.metadata["path"], json!(doc_id));
    assert_eq!(document.metadata["source"], json!("disk"));
    assert_eq!(document.metadata["workspace_id"], json!("ws1"));
}

#[tokio::test]
async fn test_ingest_file_overwrites_on_reingest() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("doc.md");
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    fs::write(&path, "draft").unwrap();
    let first = adapter.ingest_file(&path, None).await.unwrap();
    fs::write(&path, "final").unwrap();
    let second = adapter.ingest_file(&path, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(adapter.count().await.unwrap(), 1);
    assert_eq!(adapter.fetch_by_id(&first).await.unwrap().unwrap().text, "final");
}

#[tokio::test]
async fn test_ingest_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    let err = adapter
        .ingest_file(temp_dir.path().join("absent.txt"), None)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "io");
    assert_eq!(adapter.count().await.unwrap(), 0);
}
