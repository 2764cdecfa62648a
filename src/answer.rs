// src/answer.rs

//! Interactive question answering over retrieved reviews.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::retrieval::{Embedder, ReviewDocument, VectorStore};

/// Prompt fed to the answering model.
const PROMPT_TEMPLATE: &str = "\
You are an expert in answering questions about a hotel or an apartment listing.
Here are some relevant reviews: {reviews}

Here is the question to answer: {question}
";

/// Answer generation capability.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce an answer to `question` given the retrieved `reviews` text.
    async fn answer(&self, reviews: &str, question: &str) -> Result<String>;
}

/// Generator backed by an Ollama `/api/generate` endpoint.
pub struct OllamaGenerator {
    client: reqwest::Client,
    host: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn answer(&self, reviews: &str, question: &str) -> Result<String> {
        let prompt = PROMPT_TEMPLATE
            .replace("{reviews}", reviews)
            .replace("{question}", question);

        let response = self
            .client
            .post(format!("{}/api/generate", self.host))
            .json(&GenerateRequest {
                model: &self.model,
                prompt: &prompt,
                stream: false,
            })
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        Ok(response.response)
    }
}

/// Render retrieved documents into the prompt's review context.
fn format_context(documents: &[ReviewDocument]) -> String {
    documents
        .iter()
        .map(|document| {
            format!(
                "{} ({}, {})\n{}",
                document.metadata.title,
                document.metadata.rating,
                document.metadata.reviewed_date,
                document.page_content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Read questions from stdin until `q` or end of input.
pub async fn run_qa_loop(
    store: &VectorStore,
    embedder: &dyn Embedder,
    generator: &dyn Generator,
    top_k: usize,
) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout
            .write_all(b"\nAsk your question (q to quit): ")
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("q") {
            break;
        }

        let documents = store.query(embedder, question, top_k).await?;
        let context = format_context(&documents);
        let answer = generator.answer(&context, question).await?;

        stdout.write_all(answer.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}
