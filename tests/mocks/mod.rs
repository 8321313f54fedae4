//! Mock infrastructure for external services
//!
//! Wiremock servers standing in for:
//! - the OpenAI-compatible text-generation API
//! - the stock-image redirector

pub mod openai;

pub use images::*;
pub use openai::*;
