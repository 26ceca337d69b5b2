//! Runtime configuration, read once at startup from the environment.
//!
//! Absent credentials are kept as `None`; they only surface when the first prompt is sent.

use std::env;

use crate::assistant::WorkflowOptions;
use crate::templates::{DEFAULT_CHAT_INSTRUCTION, SENTINEL};

pub const DEFAULT_MODEL: &str = "meta-llama/llama-2-70b-chat";
pub const DEFAULT_CHAT_API_BASE: &str = "https://us-south.ml.cloud.ibm.com";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodingMethod {
    Greedy,
    Sample { temperature: f32 },
}

/// Decoding parameters sent with every prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    pub decoding: DecodingMethod,
    pub max_new_tokens: u16,
    pub top_p: f32,
    pub stop_sequences: Vec<String>,
}

impl GenerateParams {
    /// Long greedy outputs that stop at the sentinel.
    pub fn form_defaults() -> Self {
        Self {
            decoding: DecodingMethod::Greedy,
            max_new_tokens: 3000,
            top_p: 1.0,
            stop_sequences: vec![SENTINEL.to_string()],
        }
    }

    /// Short sampled replies that stop before the model starts a new turn.
    pub fn chat_defaults() -> Self {
        Self {
            decoding: DecodingMethod::Sample { temperature: 0.7 },
            max_new_tokens: 200,
            top_p: 1.0,
            stop_sequences: vec!["Human:".to_string(), "AI:".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub model: String,
    pub params: GenerateParams,
}

#[derive(Debug, Clone)]
pub struct FormConfig {
    pub model: ModelConfig,
    pub options: WorkflowOptions,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub model: ModelConfig,
    pub instruction: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn flag(value: Option<String>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

/// Form assistant settings from `GENAI_KEY`, `GENAI_API`, `FORM_MODEL` and the workflow flags.
pub fn form_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> FormConfig {
    FormConfig {
        model: ModelConfig {
            api_base: non_empty(lookup("GENAI_API")),
            api_key: non_empty(lookup("GENAI_KEY")),
            project_id: None,
            model: non_empty(lookup("FORM_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            params: GenerateParams::form_defaults(),
        },
        options: WorkflowOptions {
            fresh_schema_for_form: flag(lookup("FORM_FRESH_SCHEMA")),
            ordered_question_args: flag(lookup("FORM_ORDERED_QUESTION_ARGS")),
        },
    }
}

/// Chat demo settings from `API_KEY`, `PROJECT_ID`, `CHAT_API_BASE`, `CHAT_MODEL` and `CHAT_INSTRUCTION`.
pub fn chat_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ChatConfig {
    ChatConfig {
        model: ModelConfig {
            api_base: Some(non_empty(lookup("CHAT_API_BASE")).unwrap_or_else(|| DEFAULT_CHAT_API_BASE.to_string())),
            api_key: non_empty(lookup("API_KEY")),
            project_id: non_empty(lookup("PROJECT_ID")),
            model: non_empty(lookup("CHAT_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            params: GenerateParams::chat_defaults(),
        },
        instruction: non_empty(lookup("CHAT_INSTRUCTION")).unwrap_or_else(|| DEFAULT_CHAT_INSTRUCTION.to_string()),
    }
}

pub fn form_from_env() -> FormConfig {
    form_from_lookup(|key| env::var(key).ok())
}

pub fn chat_from_env() -> ChatConfig {
    chat_from_lookup(|key| env::var(key).ok())
}
