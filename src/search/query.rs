//! Query construction for the index's native JSON DSL.
//!
//! Every read path goes through these builders. The popularity boost is a
//! function score that sums `log1p(viewCount) * 1.0` and
//! `log1p(purchaseCount) * 2.0`, then multiplies the sum into the base text
//! relevance. Multiplication is the contract: a document with zero base
//! relevance must never surface on popularity alone, so the combine mode
//! here is not interchangeable with addition.

use serde_json::{json, Map, Value};

use crate::catalog::ActivityType;
use crate::search::request::SearchRequest;

/// Build the body for a keyword search with filters, facets, and paging.
pub fn search_body(request: &SearchRequest) -> Value {
    let mut bool_query = Map::new();

    if !request.query.is_empty() {
        bool_query.insert(
            "must".to_string(),
            json!([{
                "multi_match": {
                    "query": request.query,
                    "fields": ["name", "description"]
                }
            }]),
        );
    }

    let mut filters: Vec<Value> = Vec::new();

    if let Some(category) = request.category.as_deref() {
        if !category.is_empty() {
            filters.push(json!({
                "nested": {
                    "path": "categories",
                    "query": {
                        "term": { "categories.name.keyword": category }
                    }
                }
            }));
        }
    }

    if request.min_price.is_some() || request.max_price.is_some() {
        let mut range = Map::new();
        if let Some(min) = request.min_price {
            range.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = request.max_price {
            range.insert("lte".to_string(), json!(max));
        }
        filters.push(json!({ "range": { "price": range } }));
    }

    if !filters.is_empty() {
        bool_query.insert("filter".to_string(), Value::Array(filters));
    }

    let sort_field = request.sort_by.as_str();
    let from = request.page.saturating_sub(1) * request.size;

    json!({
        "query": popularity_scored(json!({ "bool": bool_query })),
        "from": from,
        "size": request.size,
        "sort": [{ sort_field: { "order": request.sort_order.as_str() } }],
        "aggs": category_aggregation()
    })
}

/// Build the body for a similar-products query.
///
/// Seeded by the stored document's text fields, with a should-boost on
/// shared category names (average child score).
pub fn similar_body(
    index: &str,
    product_id: u64,
    category_names: &[String],
    limit: usize,
) -> Value {
    let seed = json!({
        "more_like_this": {
            "fields": ["name", "description"],
            "like": [{ "_index": index, "_id": product_id.to_string() }],
            "min_term_freq": 1,
            "max_query_terms": 12,
            "min_doc_freq": 1
        }
    });

    let category_boost = json!({
        "nested": {
            "path": "categories",
            "score_mode": "avg",
            "query": {
                "terms": { "categories.name": category_names }
            }
        }
    });

    json!({
        "query": popularity_scored(json!({
            "bool": {
                "must": [seed],
                "should": [category_boost]
            }
        })),
        "size": limit
    })
}

/// Build the body for an activity-based recommendation query.
///
/// Seeded by all of the user's top product ids at once, scored with the
/// single signal matching the activity type.
pub fn recommendation_body(product_ids: &[u64], activity_type: ActivityType, limit: usize) -> Value {
    let likes: Vec<String> = product_ids.iter().map(|id| id.to_string()).collect();
    let field = activity_type.counter_field();

    json!({
        "query": {
            "function_score": {
                "query": {
                    "more_like_this": {
                        "fields": ["name", "description"],
                        "like": likes,
                        "min_term_freq": 1,
                        "max_query_terms": 12,
                        "min_doc_freq": 1
                    }
                },
                "functions": [{
                    "field_value_factor": {
                        "field": field,
                        "factor": activity_type.score_factor(),
                        "modifier": "log1p"
                    }
                }],
                "score_mode": "sum",
                "boost_mode": "multiply"
            }
        },
        "size": limit
    })
}

/// Build the body for a prefix completion suggestion.
pub fn completion_body(prefix: &str, limit: usize) -> Value {
    json!({
        "suggest": {
            "name_suggest": {
                "prefix": prefix,
                "completion": {
                    "field": "nameSuggest",
                    "skip_duplicates": true,
                    "size": limit
                }
            }
        }
    })
}

/// Build the body for an n-gram autocomplete match.
pub fn ngram_body(query: &str, limit: usize) -> Value {
    json!({
        "query": {
            "match": {
                "nameNgram": {
                    "query": query,
                    "analyzer": "ngram_analyzer"
                }
            }
        },
        "size": limit
    })
}

/// Build the body for a fuzzy autocomplete match on the name field.
pub fn fuzzy_body(query: &str, limit: usize) -> Value {
    json!({
        "query": {
            "fuzzy": {
                "name": {
                    "value": query,
                    "fuzziness": "AUTO"
                }
            }
        },
        "size": limit
    })
}

/// Wrap a query in the dual-signal popularity score.
fn popularity_scored(query: Value) -> Value {
    json!({
        "function_score": {
            "query": query,
            "functions": [
                {
                    "field_value_factor": {
                        "field": "viewCount",
                        "factor": 1.0,
                        "modifier": "log1p"
                    }
                },
                {
                    "field_value_factor": {
                        "field": "purchaseCount",
                        "factor": 2.0,
                        "modifier": "log1p"
                    }
                }
            ],
            "score_mode": "sum",
            "boost_mode": "multiply"
        }
    })
}

/// Nested terms aggregation over category names.
fn category_aggregation() -> Value {
    json!({
        "categories": {
            "nested": { "path": "categories" },
            "aggs": {
                "category_names": {
                    "terms": { "field": "categories.name.keyword" }
                }
            }
        }
    })
}
