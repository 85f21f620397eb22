//! Search, recommendation, and autocomplete read paths.

use std::sync::Arc;

use mercato::{
    ActivityRecord, ActivityStore, ActivityType, BulkReindexer, CacheConfig, CachedAutocomplete,
    FacetEntry, IndexConfig, MemoryActivityStore, MokaSuggestionCache, ReindexConfig,
    SearchConfig, SearchRequest, SearchService, SuggestionCache,
};

use crate::support::{seeded_store, FakeIndex};

async fn engine() -> (Arc<FakeIndex>, Arc<SearchService>, Arc<MemoryActivityStore>) {
    let backend = Arc::new(FakeIndex::new());
    let store = seeded_store();
    let activity = Arc::new(MemoryActivityStore::new());

    BulkReindexer::new(
        backend.clone(),
        store.clone(),
        &IndexConfig::default(),
        &ReindexConfig::default(),
    )
    .reindex_all()
    .await
    .unwrap();

    let service = Arc::new(SearchService::new(
        backend.clone(),
        store,
        activity.clone(),
        "products",
        SearchConfig::default(),
    ));
    (backend, service, activity)
}

#[tokio::test]
async fn test_keyword_search_with_price_filter() {
    let (_, service, _) = engine().await;

    let request = SearchRequest::new("phone").min_price(100.0).max_price(500.0);
    let result = service.search(&request).await.unwrap();

    // "Smart Phone" (399) and "Headphones" (149) match text and range;
    // "Phone Case" (19) fails the range.
    assert_eq!(result.total_hits, 2);
    let names: Vec<&str> = result.data.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"Smart Phone"));
    assert!(names.contains(&"Headphones"));
}

#[tokio::test]
async fn test_unfiltered_search_returns_whole_catalog_page() {
    let (_, service, _) = engine().await;

    let result = service.search(&SearchRequest::default()).await.unwrap();
    assert_eq!(result.total_hits, 5);
    assert_eq!(result.data.len(), 5);
}

#[tokio::test]
async fn test_search_returns_category_facets() {
    let (_, service, _) = engine().await;

    let result = service.search(&SearchRequest::default()).await.unwrap();
    let facets = &result.facets["categories"];

    assert!(facets.contains(&FacetEntry {
        key: "Electronics".to_string(),
        doc_count: 3
    }));
    assert!(facets.contains(&FacetEntry {
        key: "Apparel".to_string(),
        doc_count: 2
    }));
}

#[tokio::test]
async fn test_category_filter_narrows_results() {
    let (_, service, _) = engine().await;

    let request = SearchRequest::new("").category("Apparel");
    let result = service.search(&request).await.unwrap();

    assert_eq!(result.total_hits, 2);
    let names: Vec<&str> = result.data.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"Phone Case"));
    assert!(names.contains(&"Running Shoes"));
}

#[tokio::test]
async fn test_pagination_slices_results() {
    let (_, service, _) = engine().await;

    let page_one = service
        .search(&SearchRequest::new("").size(2).page(1))
        .await
        .unwrap();
    let page_three = service
        .search(&SearchRequest::new("").size(2).page(3))
        .await
        .unwrap();

    assert_eq!(page_one.data.len(), 2);
    assert_eq!(page_one.total_hits, 5);
    // Five products at two per page leaves one on the last page.
    assert_eq!(page_three.data.len(), 1);
}

#[tokio::test]
async fn test_similar_products_excludes_the_source() {
    let (_, service, _) = engine().await;

    let result = service.similar_products(1).await.unwrap();

    assert!(!result.data.is_empty());
    assert!(result.data.iter().all(|p| p.product_id != 1));
}

#[tokio::test]
async fn test_user_recommendation_from_purchase_history() {
    let (_, service, activity) = engine().await;

    for product_id in [1, 1, 3] {
        activity
            .record(ActivityRecord::now(product_id, 42, ActivityType::Purchase))
            .await
            .unwrap();
    }

    let result = service.user_recommendation(42, "PURCHASE").await.unwrap();

    // Seeds (1 and 3) are excluded; something else comes back.
    assert!(!result.data.is_empty());
    assert!(result.data.iter().all(|p| p.product_id != 1 && p.product_id != 3));
}

#[tokio::test]
async fn test_user_recommendation_rejects_unknown_activity_kind() {
    let (_, service, activity) = engine().await;
    activity
        .record(ActivityRecord::now(1, 42, ActivityType::View))
        .await
        .unwrap();

    let result = service.user_recommendation(42, "WISHLIST").await.unwrap();
    assert!(result.data.is_empty());
    assert_eq!(result.total_hits, 0);
    assert!(result.facets.is_empty());
}

#[tokio::test]
async fn test_autocomplete_cascade_over_indexed_names() {
    let (_, service, _) = engine().await;

    let prefix = service.autocomplete("pho").await;
    assert_eq!(prefix, vec!["Phone Case"]);

    let combined = service.combined_autocomplete("phone").await;
    assert!(combined.len() <= 5);
    assert!(combined.contains(&"Smart Phone".to_string()));
    let distinct: std::collections::HashSet<&String> = combined.iter().collect();
    assert_eq!(distinct.len(), combined.len());
}

#[tokio::test]
async fn test_cached_autocomplete_serves_repeat_queries_from_cache() {
    let (backend, service, _) = engine().await;

    let cache = Arc::new(MokaSuggestionCache::new(&CacheConfig::default()));
    let autocomplete = CachedAutocomplete::new(service, cache.clone());

    let first = autocomplete.combined_autocomplete("phone").await;
    let second = autocomplete.combined_autocomplete("phone").await;

    assert_eq!(first, second);
    assert!(cache.get("product:combined:suggestions:phone").await.is_some());
    // Still only the documents from reindexing; repeated autocomplete did
    // not touch the document set.
    assert_eq!(backend.len(), 5);
}
