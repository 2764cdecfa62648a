// src/models/mod.rs

//! Domain models for the review pipeline.

mod crawl;
mod review;

pub use crawl::{CrawlOutcome, DrainReason, RawBlock};
pub use review::{CommentBlock, ReviewRecord};
