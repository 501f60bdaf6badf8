//! Error types and result aliases for the Logis service.
//!
//! This module defines the core error type [`LogisError`] and the [`Result`] type alias
//! used throughout the crate. Catalog failures (`NotFoundError`, `ParseError`) are fatal
//! for a page load; completion failures (`ApiError`, `TransportError`, ...) are recovered
//! at the chat-turn level and shown to the visitor as an assistant message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogisError {
    #[error("Catalog not found: {0}")]
    NotFoundError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("API error: {status} - {body}")]
    ApiError { status: u16, body: String },

    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Unknown lodging: {0}")]
    UnknownLodging(String),

    #[error("Turn interrupted before a reply was received")]
    TurnInterrupted,

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),
}

pub type Result<T> = std::result::Result<T, LogisError>;
