//! End-to-end tests for the document store over the in-memory index.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{FailingEmbedder, VocabEmbedder};
use ragkit::{
    DocumentStore, InMemoryVectorStore, MetadataFilter, RagConfig, RagError, SearchResult,
};

fn test_config() -> RagConfig {
    RagConfig::builder()
        .collection_name("test_documents")
        .chunk_size(1000)
        .chunk_overlap(200)
        .default_n_results(5)
        .build()
        .unwrap()
}

async fn open_store(embedder: Arc<VocabEmbedder>) -> DocumentStore {
    let store = DocumentStore::builder()
        .config(test_config())
        .embedding_provider(embedder)
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();
    store.init().await.unwrap();
    store
}

fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn add_document_groups_chunks_under_one_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "fixture.txt", &common::fixture_text_2500());
    let store = open_store(Arc::new(VocabEmbedder::new(64))).await;

    let doc_id = store.add_document(&path, None).await.unwrap();

    let documents = store.get_all_documents().await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].document_id, doc_id);
    assert_eq!(documents[0].total_chunks, 3);
    assert!(documents[0].source.ends_with("fixture.txt"));

    // Exactly three chunks, ids derived from the document id in order.
    let results = store.search_documents(common::FIXTURE_QUERY, Some(10), None).await.unwrap();
    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(result.metadata.document_id, doc_id);
        assert_eq!(result.metadata.total_chunks, 3);
    }
}

#[tokio::test]
async fn first_sentence_query_ranks_first_chunk_on_top() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "fixture.txt", &common::fixture_text_2500());
    let store = open_store(Arc::new(VocabEmbedder::new(64))).await;

    store.add_document(&path, None).await.unwrap();
    let results = store.search_documents(common::FIXTURE_QUERY, Some(10), None).await.unwrap();

    let top = &results[0];
    assert_eq!(top.metadata.chunk_index, 0);
    assert!(top.content.starts_with("zonal quark vexed jumbo. "));
    assert!(top.score > results[1].score);

    // Consecutive chunks share the configured overlap window.
    let by_index: HashMap<usize, &SearchResult> =
        results.iter().map(|r| (r.metadata.chunk_index, r)).collect();
    let first = &by_index[&0].content;
    let second = &by_index[&1].content;
    assert_eq!(&second[..200], &first[first.len() - 200..]);
}

#[tokio::test]
async fn scores_are_sorted_and_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "fixture.txt", &common::fixture_text_2500());
    let store = open_store(Arc::new(VocabEmbedder::new(64))).await;
    store.add_document(&path, None).await.unwrap();

    let first = store.search_documents("rock sand mud", Some(2), None).await.unwrap();
    assert!(first.len() <= 2);
    for window in first.windows(2) {
        assert!(window[0].score >= window[1].score);
    }

    let second = store.search_documents("rock sand mud", Some(2), None).await.unwrap();
    let ids =
        |results: &[SearchResult]| results.iter().map(|r| r.metadata.chunk_index).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn search_on_empty_index_returns_empty() {
    let store = open_store(Arc::new(VocabEmbedder::new(64))).await;
    let results = store.search_documents("anything at all", None, None).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn delete_document_removes_all_chunks_and_repeats_as_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "fixture.txt", &common::fixture_text_2500());
    let store = open_store(Arc::new(VocabEmbedder::new(64))).await;

    let doc_id = store.add_document(&path, None).await.unwrap();
    store.delete_document(&doc_id).await.unwrap();

    assert!(store.get_all_documents().await.unwrap().is_empty());
    let results = store.search_documents(common::FIXTURE_QUERY, Some(10), None).await.unwrap();
    assert!(results.is_empty());

    // Repeat delete and unknown-id delete are no-ops, not errors.
    store.delete_document(&doc_id).await.unwrap();
    store.delete_document("never-existed").await.unwrap();
}

#[tokio::test]
async fn metadata_filter_restricts_search_and_is_conjunctive() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = write_fixture(&dir, "a.txt", "shared words about minerals and rivers.");
    let path_b = write_fixture(&dir, "b.txt", "shared words about minerals and rivers.");
    let store = open_store(Arc::new(VocabEmbedder::new(64))).await;

    let id_a = store
        .add_document(&path_a, Some(HashMap::from([("category".to_string(), "alpha".to_string())])))
        .await
        .unwrap();
    store
        .add_document(&path_b, Some(HashMap::from([("category".to_string(), "beta".to_string())])))
        .await
        .unwrap();

    let filter = MetadataFilter::new().eq("category", "alpha");
    let results = store.search_documents("minerals", Some(10), Some(&filter)).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].metadata.document_id, id_a);
    assert_eq!(results[0].metadata.extra["category"], "alpha");

    // Both conditions must hold.
    let impossible = MetadataFilter::new().eq("category", "alpha").eq("document_id", "other");
    let results = store.search_documents("minerals", Some(10), Some(&impossible)).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn empty_file_gets_an_id_but_no_index_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "empty.txt", "");
    let embedder = Arc::new(VocabEmbedder::new(64));
    let store = open_store(embedder.clone()).await;

    let doc_id = store.add_document(&path, None).await.unwrap();
    assert!(!doc_id.is_empty());
    assert!(store.get_all_documents().await.unwrap().is_empty());
    // No chunks means no embedding round-trips either.
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn unsupported_extension_fails_the_whole_add() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "notes.md", "# markdown");
    let store = open_store(Arc::new(VocabEmbedder::new(64))).await;

    let err = store.add_document(&path, None).await.unwrap_err();
    assert!(matches!(err, RagError::UnsupportedFormat(_)));
    assert!(store.get_all_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn embedding_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "doc.txt", "some perfectly fine text.");

    let index = Arc::new(InMemoryVectorStore::new());
    let store = DocumentStore::builder()
        .config(test_config())
        .embedding_provider(Arc::new(FailingEmbedder))
        .vector_store(index)
        .build()
        .unwrap();
    store.init().await.unwrap();

    let err = store.add_document(&path, None).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingError { .. }));
    assert!(store.get_all_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn caller_metadata_is_merged_into_every_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "fixture.txt", &common::fixture_text_2500());
    let store = open_store(Arc::new(VocabEmbedder::new(64))).await;

    let extra = HashMap::from([
        ("category".to_string(), "geology".to_string()),
        ("lang".to_string(), "en".to_string()),
    ]);
    store.add_document(&path, Some(extra)).await.unwrap();

    let results = store.search_documents("rock sand", Some(10), None).await.unwrap();
    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(result.metadata.extra["category"], "geology");
        assert_eq!(result.metadata.extra["lang"], "en");
        assert!(result.metadata.preview.len() <= 103);
    }
}
