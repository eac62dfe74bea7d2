//! Topic classification
//!
//! This module handles:
//! - The topic tables that turn a topic key into a description
//! - Building the classification prompt
//! - The Gemini client that implements the pipeline's `Classifier` trait

mod gemini;
mod profiles;
mod prompt;
mod topics;

pub use gemini::{parse_reply, GeminiClassifier};
pub use prompt::build_prompt;
pub use topics::{Topic, TopicSet, TopicTable};
