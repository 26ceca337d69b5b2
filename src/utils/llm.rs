//! # LLM endpoint
//!
//! A model consumes a complete prompt and produces text. The text arrives as a stream of chunks
//! ([TextChunks]) that can be consumed once; [Generate::generate] folds it into one string and removes
//! the [SENTINEL] end marker.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use log::debug;
use thiserror::Error;

use crate::templates::SENTINEL;

pub mod openai;

/// Lazily generated text chunks. Consumed once, in order.
pub type TextChunks = BoxStream<'static, Result<String, InferenceError>>;

/// Failures of a generation call. None of them is retried.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Credentials or endpoint are missing, or the endpoint rejected them.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// The request could not be built from the configured parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Transport, quota or server side failure.
    #[error("endpoint failure: {0}")]
    Endpoint(String),
}

impl InferenceError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, InferenceError::Unauthenticated(_))
    }
}

/// A hosted text-generation model.
#[async_trait]
pub trait Generate: Send + Sync {
    /// Start generating a reply to `prompt`.
    async fn generate_stream(&self, prompt: &str) -> Result<TextChunks, InferenceError>;

    /// Generate the whole reply, with the sentinel removed.
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        self.generate_with(prompt, |_| {}).await
    }

    /// Like [Generate::generate] but hands every raw chunk to `on_chunk` as it arrives.
    async fn generate_with<F>(&self, prompt: &str, on_chunk: F) -> Result<String, InferenceError>
        where F: FnMut(&str) + Send
    {
        debug!("generating for prompt of {} bytes", prompt.len());
        let chunks = self.generate_stream(prompt).await?;
        let text = collect_text(chunks, on_chunk).await?;
        debug!("generated {} bytes", text.len());
        Ok(strip_sentinel(&text))
    }
}

/// Folds a chunk stream into one string, stopping at the first failed chunk.
pub async fn collect_text(mut chunks: TextChunks, mut on_chunk: impl FnMut(&str) + Send) -> Result<String, InferenceError> {
    let mut text = String::new();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        on_chunk(&chunk);
        text.push_str(&chunk);
    }
    Ok(text)
}

/// Removes every occurrence of the sentinel end marker.
pub fn strip_sentinel(text: &str) -> String {
    text.replace(SENTINEL, "")
}
