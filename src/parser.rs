// src/parser.rs

//! Positional field parser for rendered review cards.
//!
//! A card's text has no delimiters or tags; the only stable anchor is the
//! literal `"Reviewed: "` prefix on the date line. Its line index decides
//! whether the reviewer name occupies one line or two, and every other
//! field offset follows from that.

use crate::error::{AppError, Result};
use crate::models::{CommentBlock, ReviewRecord};

/// Prefix of the reviewed-date line.
pub const REVIEWED_MARKER: &str = "Reviewed: ";

/// Literal line shown in place of the comment fields.
pub const NO_COMMENTS_SENTINEL: &str = "There are no comments available for this review";

/// Layout variant of a card, decided by where the date marker sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameLayout {
    /// Reviewer name on one line; marker at line 5
    Single,
    /// First and last name on separate lines; marker at line 6
    Split,
}

/// Decode one card's text into a [`ReviewRecord`].
///
/// Fails with [`AppError::MalformedRecord`] when the marker is at neither
/// candidate line, when the title/score triple is truncated, or when the
/// comment tail is not exactly the sentinel or three lines.
pub fn parse_review(raw: &str) -> Result<ReviewRecord> {
    let lines: Vec<&str> = raw.trim().split('\n').collect();

    let probe = |index: usize| {
        lines
            .get(index)
            .and_then(|line| line.strip_prefix(REVIEWED_MARKER))
    };

    let (layout, date_index, reviewed_date) = if let Some(date) = probe(5) {
        (NameLayout::Single, 5, date)
    } else if let Some(date) = probe(6) {
        (NameLayout::Split, 6, date)
    } else {
        return Err(AppError::malformed(format!(
            "date marker '{}' not found at line 5 or 6",
            REVIEWED_MARKER.trim_end()
        )));
    };

    // The marker position guarantees lines[..=date_index] exist.
    let (reviewer_name, header) = match layout {
        NameLayout::Single => (lines[0].to_string(), &lines[1..5]),
        NameLayout::Split => (format!("{} {}", lines[0], lines[1]), &lines[2..6]),
    };

    let triple_end = date_index + 4;
    if lines.len() < triple_end {
        return Err(AppError::malformed(format!(
            "expected title and score fields, card ends after {} lines",
            lines.len()
        )));
    }

    let comments = match &lines[triple_end..] {
        [first, ..] if *first == NO_COMMENTS_SENTINEL => None,
        [positive, negative, helpful] => Some(CommentBlock {
            positive_text: positive.to_string(),
            negative_text: negative.to_string(),
            helpful_count: helpful.to_string(),
        }),
        tail => {
            return Err(AppError::malformed(format!(
                "expected 3 comment fields, found {}",
                tail.len()
            )));
        }
    };

    Ok(ReviewRecord {
        reviewer_name,
        country: header[0].to_string(),
        room_type: header[1].to_string(),
        stay_duration: header[2].to_string(),
        trip_type: header[3].to_string(),
        reviewed_date: reviewed_date.to_string(),
        title: lines[date_index + 1].to_string(),
        score_text: lines[date_index + 2].to_string(),
        score_value: lines[date_index + 3].to_string(),
        comments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lines: &[&str]) -> String {
        lines.join("\n")
    }

    fn single_name_lines() -> Vec<&'static str> {
        vec![
            "Jane",
            "USA",
            "Double Room",
            "3 nights",
            "Couple",
            "Reviewed: March 2024",
            "Lovely stay",
            "Scored 9.0",
            "9.0",
            NO_COMMENTS_SENTINEL,
        ]
    }

    #[test]
    fn test_single_line_name() {
        let record = parse_review(&block(&single_name_lines())).unwrap();

        assert_eq!(record.reviewer_name, "Jane");
        assert_eq!(record.country, "USA");
        assert_eq!(record.room_type, "Double Room");
        assert_eq!(record.stay_duration, "3 nights");
        assert_eq!(record.trip_type, "Couple");
        assert_eq!(record.reviewed_date, "March 2024");
        assert_eq!(record.title, "Lovely stay");
        assert_eq!(record.score_text, "Scored 9.0");
        assert_eq!(record.score_value, "9.0");
        assert!(record.comments.is_none());
    }

    #[test]
    fn test_two_line_name_shifts_header() {
        let record = parse_review(&block(&[
            "Jane",
            "Doe",
            "USA",
            "Double Room",
            "3 nights",
            "Couple",
            "Reviewed: March 2024",
            "Lovely stay",
            "Scored 9.0",
            "9.0",
            NO_COMMENTS_SENTINEL,
        ]))
        .unwrap();

        assert_eq!(record.reviewer_name, "Jane Doe");
        assert_eq!(record.country, "USA");
        assert_eq!(record.reviewed_date, "March 2024");
        assert!(record.comments.is_none());
    }

    #[test]
    fn test_comment_triple_consumed_exactly() {
        let mut lines = single_name_lines();
        lines.truncate(9);
        lines.extend(["Great location", "Thin walls", "3 people found this helpful"]);

        let record = parse_review(&block(&lines)).unwrap();
        let comments = record.comments.unwrap();
        assert_eq!(comments.positive_text, "Great location");
        assert_eq!(comments.negative_text, "Thin walls");
        assert_eq!(comments.helpful_count, "3 people found this helpful");
    }

    #[test]
    fn test_marker_absent_fails() {
        let err = parse_review(&block(&[
            "Jane", "USA", "Double Room", "3 nights", "Couple", "March 2024",
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord(_)));
    }

    #[test]
    fn test_marker_must_be_line_prefix() {
        let mut lines = single_name_lines();
        lines[5] = "Stay Reviewed: March 2024";
        assert!(parse_review(&block(&lines)).is_err());
    }

    #[test]
    fn test_truncated_title_triple_fails() {
        let err = parse_review(&block(&[
            "Jane",
            "USA",
            "Double Room",
            "3 nights",
            "Couple",
            "Reviewed: March 2024",
            "Lovely stay",
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord(_)));
    }

    #[test]
    fn test_missing_comment_tail_fails() {
        let mut lines = single_name_lines();
        lines.truncate(9);
        assert!(parse_review(&block(&lines)).is_err());
    }

    #[test]
    fn test_comment_surplus_fails() {
        let mut lines = single_name_lines();
        lines.truncate(9);
        lines.extend(["Great", "Bad", "3 helpful", "unexpected trailing line"]);
        assert!(parse_review(&block(&lines)).is_err());
    }

    #[test]
    fn test_comment_shortfall_fails() {
        let mut lines = single_name_lines();
        lines.truncate(9);
        lines.extend(["Great", "Bad"]);
        assert!(parse_review(&block(&lines)).is_err());
    }

    #[test]
    fn test_sentinel_ignores_trailing_lines() {
        let mut lines = single_name_lines();
        lines.push("Stayed in June 2024");
        let record = parse_review(&block(&lines)).unwrap();
        assert!(record.comments.is_none());
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(parse_review("").is_err());
        assert!(parse_review("\n\n").is_err());
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let raw = format!("\n{}\n\n", block(&single_name_lines()));
        assert!(parse_review(&raw).is_ok());
    }
}
