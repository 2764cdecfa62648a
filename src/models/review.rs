// src/models/review.rs

//! Normalized review record.

use serde::{Deserialize, Serialize};

/// Free-text comment fields of a review.
///
/// Present as a unit or absent as a unit; a card either carries all three
/// lines or the no-comments sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBlock {
    pub positive_text: String,
    pub negative_text: String,
    pub helpful_count: String,
}

/// One normalized hotel review, decoded from a rendered card.
///
/// Immutable after construction; serialized flat as one element of a
/// persisted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub reviewer_name: String,
    pub country: String,
    pub room_type: String,
    pub stay_duration: String,
    pub trip_type: String,
    pub reviewed_date: String,
    pub title: String,
    /// Raw score line, e.g. "Scored 6.0"
    pub score_text: String,
    pub score_value: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub comments: Option<CommentBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(comments: Option<CommentBlock>) -> ReviewRecord {
        ReviewRecord {
            reviewer_name: "Jane".to_string(),
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
    fn test_serializes_flat_without_comments() {
        let json = serde_json::to_value(sample_record(None)).unwrap();
        assert_eq!(json["reviewer_name"], "Jane");
        assert!(json.get("positive_text").is_none());
        assert!(json.get("comments").is_none());
    }

    #[test]
    fn test_serializes_flat_with_comments() {
        let record = sample_record(Some(CommentBlock {
            positive_text: "Great location".to_string(),
            negative_text: "Thin walls".to_string(),
            helpful_count: "3 people found this helpful".to_string(),
        }));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["positive_text"], "Great location");
        assert!(json.get("comments").is_none());

        let back: ReviewRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
