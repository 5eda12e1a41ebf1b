// Adapters layer: concrete implementations of the domain ports (AI service, workshop data file).

pub mod file_store;
pub mod gemini;
