//! Mapping raw index responses into application result shapes.
//!
//! Hits carry only the document id and score worth trusting; the full
//! product body is resolved through the product read path, which may serve
//! from a cache rather than the possibly-stale denormalized document.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::catalog::{ProductReader, ProductResponse};
use crate::error::Result;
use crate::index::SearchOutcome;
use crate::search::request::{FacetEntry, SearchResult};

/// Resolve an index response into ranked product responses with facets.
///
/// Hits without an id are silently filtered. Item order is the
/// index-returned rank order.
pub async fn map_search_outcome(
    outcome: &SearchOutcome,
    products: &dyn ProductReader,
) -> Result<SearchResult<ProductResponse>> {
    let mut data = Vec::with_capacity(outcome.hits.hits.len());

    for hit in &outcome.hits.hits {
        let Some(id) = hit.id.as_deref() else {
            continue;
        };
        let product_id = match id.parse::<u64>() {
            Ok(product_id) => product_id,
            Err(_) => {
                debug!("Skipping hit with non-numeric id {id:?}");
                continue;
            }
        };
        data.push(products.product_response(product_id).await?);
    }

    Ok(SearchResult {
        data,
        total_hits: outcome.hits.total.as_ref().map(|t| t.value).unwrap_or(0),
        facets: map_facets(outcome),
    })
}

/// Flatten the nested category aggregation into ordered facet entries.
pub fn map_facets(outcome: &SearchOutcome) -> HashMap<String, Vec<FacetEntry>> {
    let mut facets = HashMap::new();

    let buckets = outcome
        .aggregations
        .as_ref()
        .and_then(|aggs| aggs.pointer("/categories/category_names/buckets"))
        .and_then(Value::as_array);

    if let Some(buckets) = buckets {
        let entries: Vec<FacetEntry> = buckets
            .iter()
            .filter_map(|bucket| {
                let key = bucket.get("key")?.as_str()?.to_string();
                let doc_count = bucket.get("doc_count")?.as_u64()?;
                Some(FacetEntry { key, doc_count })
            })
            .collect();
        facets.insert("categories".to_string(), entries);
    }

    facets
}

/// Extract product names from hit sources, in rank order.
///
/// Used by the autocomplete strategies that match whole documents.
pub fn hit_names(outcome: &SearchOutcome) -> Vec<String> {
    outcome
        .hits
        .hits
        .iter()
        .filter_map(|hit| hit.source.as_ref())
        .filter_map(|source| source.get("name"))
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Extract completion texts for a named suggester, in returned order.
pub fn suggestion_texts(outcome: &SearchOutcome, suggester: &str) -> Vec<String> {
    outcome
        .suggest
        .get(suggester)
        .into_iter()
        .flatten()
        .flat_map(|entry| entry.options.iter())
        .map(|option| option.text.clone())
        .collect()
}
