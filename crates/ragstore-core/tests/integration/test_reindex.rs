use ragstore_core::{ReindexReport, VectorIndex};

use crate::common::Stores;

#[tokio::test]
async fn test_failed_mirror_is_surfaced_and_repaired() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    adapter.ingest_text("a", "first document", None).await.unwrap();

    stores.index.fail_writes(true);
    let err = adapter.ingest_text("b", "second document", None).await.unwrap_err();
    assert_eq!(err.category(), "vector_index");

    // The record store kept the write; the mirror is missing
    assert!(adapter.fetch_by_id("b").await.unwrap().is_some());
    assert!(!stores.index.inner.contains("b").await);

    stores.index.fail_writes(false);
    let report = adapter.reindex().await.unwrap();
    assert_eq!(
        report,
        ReindexReport {
            reindexed: 2,
            skipped: 0
        }
    );
    assert_eq!(stores.index.count().await.unwrap(), 2);

    let results = adapter.similarity_search("second document", 1).await.unwrap();
    assert_eq!(results[0].doc_id, "b");
}

#[tokio::test]
async fn test_reindexed_vectors_match_original() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");

    adapter.ingest_text("a", "vectors survive the codec", None).await.unwrap();
    let original = stores.index.inner.get("a").await.unwrap();

    stores.index.inner.delete("a").await.unwrap();
    adapter.reindex().await.unwrap();

    let restored = stores.index.inner.get("a").await.unwrap();
    assert_eq!(restored, original);
}

#[tokio::test]
async fn test_failed_vector_delete_leaves_orphan_mirror() {
    let stores = Stores::new().await;
    let adapter = stores.adapter("ws1");
    adapter.ingest_text("a", "document text", None).await.unwrap();

    stores.index.fail_writes(true);
    assert!(adapter.delete("a").await.is_err());

    assert!(adapter.fetch_by_id("a").await.unwrap().is_none());
    assert!(stores.index.inner.contains("a").await);
    // Hydration hides the orphaned mirror
    assert!(adapter.similarity_search("document text", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reindex_only_touches_own_workspace() {
    let stores = Stores::new().await;
    stores.adapter("ws1").ingest_text("a", "alpha", None).await.unwrap();
    stores.adapter("ws2").ingest_text("b", "beta", None).await.unwrap();

    let report = stores.adapter("ws1").reindex().await.unwrap();
    assert_eq!(report.reindexed, 1);

    let without_index = stores.adapter_without_index();
    assert_eq!(without_index.reindex().await.unwrap(), ReindexReport::default());
}
