// Guidance: request building, resilient invocation, normalization, fallback
// and share formatting.
// All model calls go through llm_client; no direct Gemini calls here.

pub mod defaults;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod request_builder;
pub mod share;
