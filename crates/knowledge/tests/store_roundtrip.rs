//! End-to-end store behaviour: ingest, search, persist and reload.

use docqa_core::AppError;
use docqa_knowledge::embeddings::providers::TrigramProvider;
use docqa_knowledge::{DocumentOptions, EmbeddingProvider, VectorStore};
use std::sync::Arc;
use tempfile::TempDir;

fn embedder() -> Arc<dyn EmbeddingProvider> {
    Arc::new(TrigramProvider::new(384))
}

fn filler_document() -> String {
    "invoice ledger accounting balance quarterly revenue ".repeat(20)
}

fn physics_document() -> &'static str {
    "quantum physics describes electrons photons and wave functions in atoms"
}

#[tokio::test]
async fn second_document_is_retrievable() {
    let store = VectorStore::new(embedder());

    let first = store.add_document_default(&filler_document()).await.unwrap();
    let second = store.add_document_default(physics_document()).await.unwrap();
    assert_eq!(first, 3);
    assert_eq!(second, 1);

    let top = store
        .search_chunks("quantum electrons photons", 1)
        .await
        .unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].text, physics_document());
    assert_eq!(top[0].ordinal, first);
}

#[tokio::test]
async fn empty_store_reports_empty() {
    let store = VectorStore::new(embedder());
    assert!(matches!(
        store.search("anything", 3).await,
        Err(AppError::EmptyStore)
    ));
}

#[tokio::test]
async fn k_larger_than_store_returns_all_ranked() {
    let store = VectorStore::new(embedder());
    store
        .add_document(
            "alpha beta gamma delta epsilon",
            DocumentOptions {
                chunk_size: 16,
                overlap: 0,
            },
        )
        .await
        .unwrap();
    assert_eq!(store.len().await, 2);

    let results = store.search_chunks("alpha beta", 3).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].distance <= results[1].distance);
}

#[tokio::test]
async fn save_then_load_preserves_search_results() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("vector_store");

    let store = VectorStore::new(embedder());
    store.add_document_default(&filler_document()).await.unwrap();
    store.add_document_default(physics_document()).await.unwrap();
    store.save(&dir).await.unwrap();

    let loaded: VectorStore = VectorStore::load(&dir, embedder()).await.unwrap();
    assert_eq!(loaded.len().await, store.len().await);

    for query in ["quarterly revenue", "electrons in atoms", "ledger"] {
        assert_eq!(
            loaded.search_chunks(query, 3).await.unwrap(),
            store.search_chunks(query, 3).await.unwrap()
        );
        assert_eq!(
            loaded.search(query, 3).await.unwrap(),
            store.search(query, 3).await.unwrap()
        );
    }
}

#[tokio::test]
async fn repeated_saves_are_byte_identical() {
    let temp = TempDir::new().unwrap();
    let store = VectorStore::new(embedder());
    store.add_document_default(physics_document()).await.unwrap();

    store.save(temp.path()).await.unwrap();
    let index = std::fs::read(temp.path().join("index.bin")).unwrap();
    let texts = std::fs::read(temp.path().join("texts.json")).unwrap();

    store.save(temp.path()).await.unwrap();
    assert_eq!(std::fs::read(temp.path().join("index.bin")).unwrap(), index);
    assert_eq!(std::fs::read(temp.path().join("texts.json")).unwrap(), texts);
}
