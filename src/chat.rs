//! # Chat demo
//!
//! A single transition: the user says something, the model answers.

use log::info;

use crate::session::Transcript;
use crate::templates::{chat_prompt, DEFAULT_CHAT_INSTRUCTION};
use crate::utils::llm::{Generate, InferenceError};

pub struct ChatSession<M> {
    model: M,
    instruction: String,
}

impl<M: Generate> ChatSession<M> {
    pub fn new(model: M) -> Self {
        Self::with_instruction(model, DEFAULT_CHAT_INSTRUCTION)
    }

    pub fn with_instruction(model: M, instruction: impl Into<String>) -> Self {
        Self { model, instruction: instruction.into() }
    }

    /// Appends the message and the model's reply to a copy of `transcript`.
    pub async fn user_message(&self, transcript: &Transcript, message: &str) -> Result<Transcript, InferenceError> {
        self.user_message_with(transcript, message, |_| {}).await
    }

    /// Same as [ChatSession::user_message], handing reply chunks to `on_chunk` as they arrive.
    pub async fn user_message_with(&self,
                                   transcript: &Transcript,
                                   message: &str,
                                   on_chunk: impl FnMut(&str) + Send) -> Result<Transcript, InferenceError> {
        info!("chat message of {} chars", message.chars().count());
        let mut next = transcript.clone();
        next.push_user(message);
        let reply = self.model.generate_with(&chat_prompt(&self.instruction, message), on_chunk).await?;
        next.push_agent(reply);
        Ok(next)
    }
}
