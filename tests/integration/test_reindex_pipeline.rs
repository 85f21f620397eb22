//! Full reindex and incremental write pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mercato::{
    ActivityTracker, BulkReindexer, IndexConfig, IndexDispatcher, IndexTask, IndexWriter,
    MemoryActivityStore, ProductStore, ReindexConfig, RetryConfig,
};

use crate::support::{bulk_store, FakeIndex};

fn index_config() -> IndexConfig {
    IndexConfig {
        retry: RetryConfig {
            max_attempts: 3,
            wait_secs: 0,
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_full_reindex_covers_catalog_in_batches() {
    let backend = Arc::new(FakeIndex::new());
    let store = bulk_store(150);

    let reindexer = BulkReindexer::new(
        backend.clone(),
        store,
        &index_config(),
        &ReindexConfig { batch_size: 100 },
    );
    let report = reindexer.reindex_all().await.unwrap();

    assert_eq!(report.documents_indexed, 150);
    assert_eq!(report.batches, 2);
    assert_eq!(*backend.bulk_batches.lock(), vec![100, 50]);
    assert_eq!(backend.len(), 150);

    // Every product landed under its own id.
    assert!(backend.document("1").is_some());
    assert!(backend.document("150").is_some());
    assert!(backend.document("151").is_none());
}

#[tokio::test]
async fn test_reindex_is_idempotent() {
    let backend = Arc::new(FakeIndex::new());
    let store = bulk_store(120);

    let reindexer = BulkReindexer::new(
        backend.clone(),
        store,
        &index_config(),
        &ReindexConfig { batch_size: 100 },
    );

    reindexer.reindex_all().await.unwrap();
    let report = reindexer.reindex_all().await.unwrap();

    assert_eq!(report.documents_indexed, 120);
    assert_eq!(backend.len(), 120);
}

#[tokio::test]
async fn test_incremental_writes_follow_catalog_changes() {
    let backend = Arc::new(FakeIndex::new());
    let store = bulk_store(3);
    let writer = IndexWriter::new(backend.clone(), store.clone(), &index_config());

    for id in 1..=3 {
        let product = store.find_by_id(id).await.unwrap();
        writer.upsert(&product).await;
    }
    assert_eq!(backend.len(), 3);

    writer.delete(2).await;
    assert_eq!(backend.len(), 2);
    assert!(backend.document("2").is_none());
}

#[tokio::test]
async fn test_activity_counters_reach_the_index() {
    let backend = Arc::new(FakeIndex::new());
    let store = bulk_store(1);
    let writer = Arc::new(IndexWriter::new(backend.clone(), store.clone(), &index_config()));

    let product = store.find_by_id(1).await.unwrap();
    writer.upsert(&product).await;

    let dispatcher = IndexDispatcher::spawn(writer);
    let tracker = ActivityTracker::new(Arc::new(MemoryActivityStore::new()), dispatcher.clone());

    tracker.track_view(1, 9).await.unwrap();
    tracker.track_view(1, 9).await.unwrap();
    tracker.track_purchase(1, 9).await.unwrap();

    // The counter-only updates land in the background; the document keeps
    // everything else intact.
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let doc = backend.document("1").unwrap();
        if doc["viewCount"] == 2 && doc["purchaseCount"] == 1 {
            assert_eq!(doc["name"], "Product 1");
            break;
        }
        assert!(Instant::now() < deadline, "counter updates never arrived");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // A delete queued behind the counters also drains.
    dispatcher.enqueue(IndexTask::Delete(1));
    let deadline = Instant::now() + Duration::from_secs(2);
    while backend.document("1").is_some() {
        assert!(Instant::now() < deadline, "queued delete never drained");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
