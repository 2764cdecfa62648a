// src/retrieval.rs

//! Retrieval store adapter.
//!
//! Converts a persisted review batch into embedded documents and serves
//! top-k similarity queries over them. Embeddings come from an Ollama
//! endpoint; each hotel gets one index artifact under the database
//! directory, and an existing artifact is reused instead of re-embedding.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::config::RetrievalConfig;
use crate::error::{AppError, Result};
use crate::models::ReviewRecord;

/// A retrievable document derived from one review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDocument {
    pub id: String,
    pub page_content: String,
    pub metadata: DocumentMetadata,
}

/// Metadata carried alongside each indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub rating: String,
    pub reviewed_date: String,
    pub helpful_count: String,
    pub room_type: String,
}

impl ReviewDocument {
    /// Build the indexable document for the `index`-th record of a batch.
    pub fn from_record(index: usize, record: &ReviewRecord) -> Self {
        let (positive, negative, helpful) = match &record.comments {
            Some(comments) => (
                comments.positive_text.as_str(),
                comments.negative_text.as_str(),
                comments.helpful_count.as_str(),
            ),
            None => ("", "", ""),
        };

        Self {
            id: index.to_string(),
            page_content: format!("positive: {positive}\n\nnegative: {negative}"),
            metadata: DocumentMetadata {
                title: record.title.clone(),
                rating: record.score_value.clone(),
                reviewed_date: record.reviewed_date.clone(),
                helpful_count: helpful.to_string(),
                room_type: record.room_type.clone(),
            },
        }
    }
}

/// Text embedding capability.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Embedder backed by an Ollama `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    host: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.host))
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await?
            .error_for_status()?
            .json::<EmbeddingResponse>()
            .await?;

        Ok(response.embedding)
    }
}

/// A document together with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedDocument {
    document: ReviewDocument,
    embedding: Vec<f32>,
}

/// One embedded collection, persisted as a JSON artifact per hotel.
pub struct VectorStore {
    collection: String,
    entries: Vec<IndexedDocument>,
}

impl VectorStore {
    fn index_path(db_dir: &Path, collection: &str) -> PathBuf {
        db_dir.join(format!("{collection}.json"))
    }

    /// Load the persisted collection, or embed `records` and persist it.
    ///
    /// An existing index artifact wins, mirroring the batch-level
    /// idempotence check one stage earlier.
    pub async fn open_or_build(
        records: &[ReviewRecord],
        embedder: &dyn Embedder,
        config: &RetrievalConfig,
        collection: &str,
    ) -> Result<Self> {
        let db_dir = PathBuf::from(&config.db_dir);
        let path = Self::index_path(&db_dir, collection);

        if let Some(entries) = Self::load(&path).await? {
            info!(
                "loaded {} indexed documents from {}",
                entries.len(),
                path.display()
            );
            return Ok(Self {
                collection: collection.to_string(),
                entries,
            });
        }

        let documents: Vec<ReviewDocument> = records
            .iter()
            .enumerate()
            .map(|(index, record)| ReviewDocument::from_record(index, record))
            .collect();

        // Bounded-concurrency embedding; document order is kept.
        let entries: Vec<IndexedDocument> = stream::iter(documents)
            .map(|document| async move {
                let embedding = embedder.embed(&document.page_content).await?;
                Ok::<_, AppError>(IndexedDocument {
                    document,
                    embedding,
                })
            })
            .buffered(config.embed_concurrency.max(1))
            .try_collect()
            .await?;

        Self::persist(&path, &entries).await?;
        info!(
            "indexed {} documents into collection {collection}",
            entries.len()
        );

        Ok(Self {
            collection: collection.to_string(),
            entries,
        })
    }

    async fn load(path: &Path) -> Result<Option<Vec<IndexedDocument>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn persist(path: &Path, entries: &[IndexedDocument]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec(entries)?;
        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Rank the collection against `text` and return the top `k` documents.
    pub async fn query(
        &self,
        embedder: &dyn Embedder,
        text: &str,
        k: usize,
    ) -> Result<Vec<ReviewDocument>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let needle = embedder.embed(text).await?;

        let mut scored: Vec<(f32, &IndexedDocument)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(&needle, &entry.embedding), entry))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, entry)| entry.document.clone())
            .collect())
    }

    /// Collection name this store was opened for.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity; zero when either vector has no magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::models::CommentBlock;

    /// Deterministic embedder: counts a few keywords per axis.
    struct FakeEmbedder {
        calls: AtomicUsize,
    }

    impl FakeEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let count = |needle: &str| text.matches(needle).count() as f32;
            Ok(vec![count("location"), count("breakfast"), count("noise")])
        }
    }

    fn record(positive: &str, negative: &str) -> ReviewRecord {
        ReviewRecord {
            reviewer_name: "Jane".to_string(),
            country: "USA".to_string(),
            room_type: "Double Room".to_string(),
            stay_duration: "3 nights".to_string(),
            trip_type: "Couple".to_string(),
            reviewed_date: "March 2024".to_string(),
            title: "Stay".to_string(),
            score_text: "Scored 9.0".to_string(),
            score_value: "9.0".to_string(),
            comments: Some(CommentBlock {
                positive_text: positive.to_string(),
                negative_text: negative.to_string(),
                helpful_count: "1".to_string(),
            }),
        }
    }

    fn test_retrieval_config(db_dir: &std::path::Path) -> RetrievalConfig {
        RetrievalConfig {
            db_dir: db_dir.to_string_lossy().into_owned(),
            ..RetrievalConfig::default()
        }
    }

    #[test]
    fn test_document_metadata_from_record() {
        let document = ReviewDocument::from_record(7, &record("Great location", "Thin walls"));

        assert_eq!(document.id, "7");
        assert_eq!(
            document.page_content,
            "positive: Great location\n\nnegative: Thin walls"
        );
        assert_eq!(document.metadata.rating, "9.0");
        assert_eq!(document.metadata.room_type, "Double Room");
        assert_eq!(document.metadata.helpful_count, "1");
    }

    #[test]
    fn test_document_without_comments_is_blank() {
        let mut bare = record("", "");
        bare.comments = None;
        let document = ReviewDocument::from_record(0, &bare);

        assert_eq!(document.page_content, "positive: \n\nnegative: ");
        assert_eq!(document.metadata.helpful_count, "");
    }

    #[test]
    fn test_cosine_similarity_guards_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_query_ranks_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_retrieval_config(dir.path());
        let embedder = FakeEmbedder::new();

        let records = vec![
            record("great breakfast every morning", "nothing"),
            record("perfect location near the tram", "street noise at night"),
        ];
        let store = VectorStore::open_or_build(&records, &embedder, &config, "sample-stay")
            .await
            .unwrap();

        let top = store
            .query(&embedder, "how is the location?", 1)
            .await
            .unwrap();
        assert_eq!(top.len(), 1);
        assert!(top[0].page_content.contains("location"));
    }

    #[tokio::test]
    async fn test_existing_index_skips_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_retrieval_config(dir.path());
        let records = vec![record("location", "noise")];

        let first = FakeEmbedder::new();
        VectorStore::open_or_build(&records, &first, &config, "sample-stay")
            .await
            .unwrap();
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);

        let second = FakeEmbedder::new();
        let reopened = VectorStore::open_or_build(&records, &second, &config, "sample-stay")
            .await
            .unwrap();
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
        assert_eq!(reopened.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_collection_query_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_retrieval_config(dir.path());
        let embedder = FakeEmbedder::new();

        let store = VectorStore::open_or_build(&[], &embedder, &config, "empty-stay")
            .await
            .unwrap();
        assert!(store.is_empty());
        assert!(
            store
                .query(&embedder, "anything", 5)
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }
}
