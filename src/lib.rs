//! # form-assistant
//!
//! Prompt-driven front-ends over a hosted LLM: a tax form assistant that builds an HTML form from a
//! free-text requirement and fills it from a conversation, and a minimal chat demo.
//!
//! ## Concepts
//!
//! ### Prompt Template and Placeholder
//!
//! Every model call starts from a fixed instruction template such as
//!
//! ```text
//! [INST]
//! 建立一個json結構，用來存放需求提到所需要的訊息。
//! 最後加上 <EOS>
//! <<SYS>>需求: {[requirement]}
//! <<SYS>>
//! [/INST]json格式:
//! ```
//!
//! `{[requirement]}` is a placeholder named `"requirement"`. Templates live in [prompt], the instruction
//! texts of both front-ends in [templates].
//!
//! ### Session state and events
//!
//! A session is an explicit [SessionState](session::SessionState) value. Handlers read the current state and
//! return the next one ([FormAssistant::handle](assistant::FormAssistant::handle),
//! [ChatSession::user_message](chat::ChatSession::user_message)), so a failing model call never leaves half an
//! update behind.
//!
//! ### Endpoint or LLM
//!
//! Anything implementing [Generate](utils::llm::Generate) can serve the workflows. The bundled
//! [CompletionModel](utils::llm::openai::CompletionModel) talks to an OpenAI-compatible completion endpoint and
//! streams the reply; the caller folds the chunks and drops the `<EOS>` sentinel.
//!
//! ## Logging
//!
//! The crate logs through the `log` facade. Binaries pick the logger.


pub mod assistant;
pub mod chat;
pub mod config;
pub mod filler;
pub mod prompt;
pub mod session;
pub mod templates;
pub mod utils;
