//! Gemini generation client shared by the chat pipeline.
//!
//! - [`config`]: model/endpoint/key configuration read from the environment.
//! - [`chat_content`]: wire shapes of a Gemini conversation (`role` + `parts`).
//! - [`services::gemini_service`]: non-streaming `generateContent` client.
//! - [`health_service`]: startup probe for key and model.
//! - [`telemetry`]: `tracing-subscriber` layer and filter used by the binary.
//!
//! Construct [`GeminiService`] once, wrap it in `Arc`, and hand it to
//! dependents through the [`ReplyGenerator`] trait.

pub mod chat_content;
pub mod config;
pub mod error_handler;
pub mod generator;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use chat_content::{Content, ContentRole, Part};
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, ConfigError, HealthError, ProviderError};
pub use generator::ReplyGenerator;
pub use services::gemini_service::GeminiService;
