//! Shared types and models for the EekoAI platform
//!
//! This crate contains the insight engine and the types shared between the
//! backend, the browser (via WASM), and other components of the system.

pub mod error;
pub mod insights;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use insights::*;
pub use models::*;
pub use types::*;
pub use validation::*;
