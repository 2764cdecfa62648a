// src/lib.rs

//! Hotel review scraping and retrieval QA.
//!
//! Pipeline: listing URL -> page crawler (raw card texts) -> field parser
//! (structured records) -> persisted batch -> vector index -> interactive
//! question answering.

pub mod answer;
pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod retrieval;
pub mod session;
pub mod storage;
