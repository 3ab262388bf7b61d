//! AI adapters for the text-extraction capability.

mod openai_extractor;

pub use openai_extractor::OpenAiExtractor;
