// Career analysis: prompt building, the Gemini call, reply normalization,
// and the downloadable report.
// All Gemini calls go through llm_client.

pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod report;
pub mod service;
