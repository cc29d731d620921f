//! Shared types and models for the Smart Irrigation Dashboard
//!
//! This crate contains the domain types shared between the backend, the
//! browser dashboard (via WASM), and the irrigation alert evaluator.

pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
