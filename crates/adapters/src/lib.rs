//! postforge adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `scrape`: web content extraction clients (Firecrawl, stub)
//! - `llm`: LLM provider adapters (OpenAI, Anthropic, Ollama, stub)
//! - `export`: markdown post sink

pub mod export;
pub mod llm;
pub mod scrape;
