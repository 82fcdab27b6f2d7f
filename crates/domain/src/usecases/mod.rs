//! Application use cases / business logic

pub mod generate;
pub mod pipeline;

pub use generate::{DraftError, GenerateUseCase};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError};
