// src/storage.rs

//! Persisted review batch artifacts.
//!
//! One JSON artifact per hotel, `hotel_booking_{hotel_id}.json`, holding
//! the ordered batch of records for that hotel. The artifact's existence
//! is the idempotence check that prevents re-scraping.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ReviewRecord;

/// Filesystem store for review batches.
#[derive(Debug, Clone)]
pub struct BatchStore {
    root_dir: PathBuf,
}

impl BatchStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Deterministic artifact path for a hotel.
    pub fn artifact_path(&self, hotel_id: &str) -> PathBuf {
        self.root_dir.join(format!("hotel_booking_{hotel_id}.json"))
    }

    /// Whether a batch artifact already exists for `hotel_id`.
    pub async fn exists(&self, hotel_id: &str) -> bool {
        tokio::fs::try_exists(self.artifact_path(hotel_id))
            .await
            .unwrap_or(false)
    }

    /// Write the full batch for a hotel in one shot.
    ///
    /// Writes to a temp file and renames so readers never see a torn
    /// artifact.
    pub async fn write_batch(
        &self,
        hotel_id: &str,
        records: &[ReviewRecord],
    ) -> Result<PathBuf> {
        let path = self.artifact_path(hotel_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Read a hotel's batch back, or `None` if no artifact exists.
    pub async fn read_batch(&self, hotel_id: &str) -> Result<Option<Vec<ReviewRecord>>> {
        let path = self.artifact_path(hotel_id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommentBlock;

    fn record(name: &str, comments: Option<CommentBlock>) -> ReviewRecord {
        ReviewRecord {
            reviewer_name: name.to_string(),
            country: "USA".to_string(),
            room_type: "Double Room".to_string(),
            stay_duration: "3 nights".to_string(),
            trip_type: "Couple".to_string(),
            reviewed_date: "March 2024".to_string(),
            title: "Lovely stay".to_string(),
            score_text: "Scored 9.0".to_string(),
            score_value: "9.0".to_string(),
            comments,
        }
    }

    #[test]
    fn test_artifact_path_is_keyed_by_hotel() {
        let store = BatchStore::new("/tmp/bookings");
        assert!(
            store
                .artifact_path("fellinglisbon-fado")
                .ends_with("hotel_booking_fellinglisbon-fado.json")
        );
    }

    #[tokio::test]
    async fn test_batch_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = BatchStore::new(dir.path());

        let batch = vec![
            record("Jane", None),
            record(
                "Jane Doe",
                Some(CommentBlock {
                    positive_text: "Great location".to_string(),
                    negative_text: "Thin walls".to_string(),
                    helpful_count: "3 people found this helpful".to_string(),
                }),
            ),
        ];

        store.write_batch("sample-stay", &batch).await.unwrap();
        assert!(store.exists("sample-stay").await);

        let back = store.read_batch("sample-stay").await.unwrap().unwrap();
        assert_eq!(back, batch);
    }

    #[tokio::test]
    async fn test_missing_batch_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = BatchStore::new(dir.path());
        assert!(!store.exists("nowhere").await);
        assert!(store.read_batch("nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_batch_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = BatchStore::new(dir.path());
        store.write_batch("empty-stay", &[]).await.unwrap();
        assert_eq!(
            store.read_batch("empty-stay").await.unwrap().unwrap(),
            Vec::<ReviewRecord>::new()
        );
    }
}
