// src/pipeline/mod.rs

//! Pipeline entry points for review ingestion.

pub mod ingest;

pub use ingest::{IngestReport, hotel_id_from_url, ingest, ingest_with};
