//! postforge domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `adapt`: The platform adapter - limit enforcement, hashtags, truncation
//! - `ports`: Trait definitions for external collaborators (adapters)
//! - `usecases`: Application use cases / business logic

pub mod adapt;
pub mod model;
pub mod ports;
pub mod usecases;

pub use adapt::{AdaptError, PlatformAdapter, ValidationResult, Violation};
pub use model::*;
pub use ports::*;
