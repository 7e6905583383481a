//! Context classification engine
//!
//! Deterministic, rule-based text processing behind the prompt workflow:
//! style suggestions from product context, feature motifs, and prompt records.

pub mod classifier;
pub mod features;
pub mod prompt;

pub use classifier::{ContextClassifier, StyleRule, STYLE_RULES};
pub use features::{FeatureVisualMapper, DEFAULT_MOTIF, MOTIF_RULES};
pub use prompt::PromptAssembler;
