// Resume generation: content synthesis, job-detail extraction and the pipeline
// that renders, stores and records the result.
// All model calls go through llm_client.

pub mod content;
pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod synthesizer;
