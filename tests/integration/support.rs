//! Shared test fixtures: an in-memory index backend and catalog seeding.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;

use mercato::{
    BulkReport, Category, Hit, HitsEnvelope, IndexBackend, MemoryProductStore, Product,
    ProductDocument, Result, SearchOutcome, SuggestEntry, SuggestOption, TotalHits,
};

/// In-memory index backend.
///
/// Stores documents keyed by id and answers the query bodies the engine
/// actually produces: keyword search with price filters and paging,
/// completion suggestions, n-gram and fuzzy name matches, and
/// more-like-this recommendation bodies.
#[derive(Default)]
pub struct FakeIndex {
    docs: Mutex<BTreeMap<String, Value>>,
    pub bulk_batches: Mutex<Vec<usize>>,
}

impl FakeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self, id: &str) -> Option<Value> {
        self.docs.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().len()
    }

    fn doc_text(doc: &Value, field: &str) -> String {
        doc.get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase()
    }

    fn matching_docs(&self, body: &Value) -> Vec<(String, Value)> {
        let docs = self.docs.lock();

        let text = body
            .pointer("/query/function_score/query/bool/must/0/multi_match/query")
            .and_then(Value::as_str)
            .map(str::to_lowercase);

        let price_range = body
            .pointer("/query/function_score/query/bool/filter")
            .and_then(Value::as_array)
            .and_then(|filters| {
                filters
                    .iter()
                    .find_map(|f| f.pointer("/range/price").cloned())
            });

        let category = body
            .pointer("/query/function_score/query/bool/filter")
            .and_then(Value::as_array)
            .and_then(|filters| {
                filters.iter().find_map(|f| {
                    f.pointer("/nested/query/term/categories.name.keyword")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
            });

        docs.iter()
            .filter(|(_, doc)| {
                if let Some(text) = &text {
                    let haystack =
                        format!("{} {}", Self::doc_text(doc, "name"), Self::doc_text(doc, "description"));
                    if !haystack.contains(text.as_str()) {
                        return false;
                    }
                }
                if let Some(range) = &price_range {
                    let price = doc.get("price").and_then(Value::as_f64).unwrap_or(0.0);
                    if let Some(min) = range.get("gte").and_then(Value::as_f64) {
                        if price < min {
                            return false;
                        }
                    }
                    if let Some(max) = range.get("lte").and_then(Value::as_f64) {
                        if price > max {
                            return false;
                        }
                    }
                }
                if let Some(category) = &category {
                    let in_category = doc
                        .get("categories")
                        .and_then(Value::as_array)
                        .is_some_and(|cats| {
                            cats.iter()
                                .any(|c| c.get("name").and_then(Value::as_str) == Some(category))
                        });
                    if !in_category {
                        return false;
                    }
                }
                true
            })
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect()
    }

    fn name_match_outcome(&self, needle: &str, size: usize) -> SearchOutcome {
        let needle = needle.to_lowercase();
        let docs = self.docs.lock();
        let hits: Vec<Hit> = docs
            .iter()
            .filter(|(_, doc)| Self::doc_text(doc, "name").contains(&needle))
            .take(size)
            .map(|(id, doc)| Hit {
                id: Some(id.clone()),
                score: Some(1.0),
                source: Some(doc.clone()),
            })
            .collect();
        hits_outcome(hits)
    }
}

fn hits_outcome(hits: Vec<Hit>) -> SearchOutcome {
    SearchOutcome {
        hits: HitsEnvelope {
            total: Some(TotalHits {
                value: hits.len() as u64,
            }),
            hits,
        },
        ..Default::default()
    }
}

#[async_trait]
impl IndexBackend for FakeIndex {
    async fn index_document(
        &self,
        _index: &str,
        id: &str,
        document: &ProductDocument,
    ) -> Result<()> {
        self.docs
            .lock()
            .insert(id.to_string(), serde_json::to_value(document)?);
        Ok(())
    }

    async fn delete_document(&self, _index: &str, id: &str) -> Result<()> {
        self.docs.lock().remove(id);
        Ok(())
    }

    async fn update_document(&self, _index: &str, id: &str, partial: &Value) -> Result<()> {
        let mut docs = self.docs.lock();
        if let Some(doc) = docs.get_mut(id) {
            if let (Some(doc), Some(partial)) = (doc.as_object_mut(), partial.as_object()) {
                for (key, value) in partial {
                    doc.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    async fn bulk_upsert(&self, _index: &str, documents: &[ProductDocument]) -> Result<BulkReport> {
        self.bulk_batches.lock().push(documents.len());
        let mut docs = self.docs.lock();
        for document in documents {
            docs.insert(document.id.clone(), serde_json::to_value(document)?);
        }
        Ok(BulkReport {
            submitted: documents.len(),
            failures: vec![],
        })
    }

    async fn search(&self, _index: &str, body: &Value) -> Result<SearchOutcome> {
        // Completion suggester.
        if let Some(prefix) = body.pointer("/suggest/name_suggest/prefix").and_then(Value::as_str) {
            let size = body
                .pointer("/suggest/name_suggest/completion/size")
                .and_then(Value::as_u64)
                .unwrap_or(3) as usize;
            let prefix = prefix.to_lowercase();
            let docs = self.docs.lock();
            let mut options: Vec<SuggestOption> = docs
                .values()
                .filter_map(|doc| doc.get("nameSuggest").and_then(Value::as_str))
                .filter(|name| name.to_lowercase().starts_with(&prefix))
                .map(|name| SuggestOption {
                    text: name.to_string(),
                })
                .collect();
            options.truncate(size);

            let mut outcome = SearchOutcome::empty();
            outcome.suggest.insert(
                "name_suggest".to_string(),
                vec![SuggestEntry {
                    text: prefix,
                    options,
                }],
            );
            return Ok(outcome);
        }

        let size = body.get("size").and_then(Value::as_u64).unwrap_or(10) as usize;

        // N-gram and fuzzy name matches.
        if let Some(needle) = body.pointer("/query/match/nameNgram/query").and_then(Value::as_str) {
            return Ok(self.name_match_outcome(needle, size));
        }
        if let Some(needle) = body.pointer("/query/fuzzy/name/value").and_then(Value::as_str) {
            return Ok(self.name_match_outcome(needle, size));
        }

        // Similar-product bodies seed more-like-this with a stored document.
        if let Some(seed_id) = body
            .pointer("/query/function_score/query/bool/must/0/more_like_this/like/0/_id")
            .and_then(Value::as_str)
        {
            let docs = self.docs.lock();
            let hits: Vec<Hit> = docs
                .keys()
                .filter(|id| id.as_str() != seed_id)
                .take(size)
                .map(|id| Hit::with_id(id.clone()))
                .collect();
            return Ok(hits_outcome(hits));
        }

        // More-like-this recommendation bodies: return everything except the
        // seed documents, capped at the requested size.
        if let Some(likes) = body
            .pointer("/query/function_score/query/more_like_this/like")
            .and_then(Value::as_array)
        {
            let seeds: Vec<&str> = likes.iter().filter_map(Value::as_str).collect();
            let docs = self.docs.lock();
            let hits: Vec<Hit> = docs
                .keys()
                .filter(|id| !seeds.contains(&id.as_str()))
                .take(size)
                .map(|id| Hit::with_id(id.clone()))
                .collect();
            return Ok(hits_outcome(hits));
        }

        // Keyword search with filters, paging, and the category facet.
        let matched = self.matching_docs(body);
        let from = body.get("from").and_then(Value::as_u64).unwrap_or(0) as usize;

        let mut category_counts: BTreeMap<String, u64> = BTreeMap::new();
        for (_, doc) in &matched {
            if let Some(categories) = doc.get("categories").and_then(Value::as_array) {
                for category in categories {
                    if let Some(name) = category.get("name").and_then(Value::as_str) {
                        *category_counts.entry(name.to_string()).or_default() += 1;
                    }
                }
            }
        }
        let buckets: Vec<Value> = category_counts
            .into_iter()
            .map(|(key, doc_count)| serde_json::json!({"key": key, "doc_count": doc_count}))
            .collect();

        let total = matched.len() as u64;
        let hits: Vec<Hit> = matched
            .into_iter()
            .skip(from)
            .take(size)
            .map(|(id, doc)| Hit {
                id: Some(id),
                score: Some(1.0),
                source: Some(doc),
            })
            .collect();

        Ok(SearchOutcome {
            hits: HitsEnvelope {
                total: Some(TotalHits { value: total }),
                hits,
            },
            aggregations: Some(serde_json::json!({
                "categories": {
                    "doc_count": total,
                    "category_names": { "buckets": buckets }
                }
            })),
            ..Default::default()
        })
    }
}

/// A catalog with recognizable products spread over two categories.
pub fn seeded_store() -> Arc<MemoryProductStore> {
    let store = Arc::new(MemoryProductStore::new());
    let electronics = Category {
        category_id: 1,
        name: "Electronics".to_string(),
    };
    let apparel = Category {
        category_id: 2,
        name: "Apparel".to_string(),
    };

    let items: [(u64, &str, &str, f64, &Category); 5] = [
        (1, "Smart Phone", "A touch-screen phone", 399.0, &electronics),
        (2, "Phone Case", "Protective case for a phone", 19.0, &apparel),
        (3, "Laptop", "Portable computer", 999.0, &electronics),
        (4, "Running Shoes", "Lightweight running shoes", 89.0, &apparel),
        (5, "Headphones", "Wireless phone headphones", 149.0, &electronics),
    ];

    for (id, name, description, price, category) in items {
        store.insert(
            Product {
                product_id: id,
                name: name.to_string(),
                description: description.to_string(),
                price,
                stock: 10,
                weight: 0.5,
                user_id: 1,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            vec![category.clone()],
        );
    }
    store
}

/// A catalog of `count` generic products, one category each.
pub fn bulk_store(count: u64) -> Arc<MemoryProductStore> {
    let store = Arc::new(MemoryProductStore::new());
    for id in 1..=count {
        store.insert(
            Product {
                product_id: id,
                name: format!("Product {id}"),
                description: "Catalog item".to_string(),
                price: id as f64,
                stock: 1,
                weight: 0.1,
                user_id: 1,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            vec![Category {
                category_id: 1 + id % 3,
                name: format!("Category {}", 1 + id % 3),
            }],
        );
    }
    store
}
