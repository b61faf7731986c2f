//! Data Transfer Objects for API responses.
//!
//! Resource bodies are the model types themselves; only the error
//! payload needs a dedicated DTO.

mod error;

pub use error::ErrorResponse;
