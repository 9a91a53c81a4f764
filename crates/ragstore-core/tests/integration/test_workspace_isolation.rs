use crate::common::Stores;

#[tokio::test]
async fn test_search_is_scoped_to_workspace() {
    let stores = Stores::new().await;
    let ws1 = stores.adapter("ws1");
    let ws2 = stores.adapter("ws2");

    ws1.ingest_text("one", "distributed consensus protocols", None)
        .await
        .unwrap();
    ws2.ingest_text("two", "distributed consensus protocols", None)
        .await
        .unwrap();

    let results = ws1
        .similarity_search("distributed consensus", 10)
        .await
        .unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["one"]);

    assert_eq!(ws1.count().await.unwrap(), 1);
    assert_eq!(ws2.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_fetch_is_not_workspace_scoped() {
    let stores = Stores::new().await;
    stores
        .adapter("ws1")
        .ingest_text("shared-id", "visible everywhere", None)
        .await
        .unwrap();

    let document = stores
        .adapter("ws2")
        .fetch_by_id("shared-id")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(document.metadata["workspace_id"], "ws1");
}

#[tokio::test]
async fn test_reingest_moves_document_between_workspaces() {
    let stores = Stores::new().await;
    stores.adapter("ws1").ingest_text("doc", "moving text", None).await.unwrap();
    stores.adapter("ws2").ingest_text("doc", "moving text", None).await.unwrap();

    assert_eq!(stores.adapter("ws1").count().await.unwrap(), 0);
    assert!(stores
        .adapter("ws1")
        .similarity_search("moving text", 5)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(stores.adapter("ws2").similarity_search("moving text", 5).await.unwrap().len(), 1);
}
