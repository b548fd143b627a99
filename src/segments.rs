use serde::{Deserialize, Serialize};

/// A single recognized span of speech.
///
/// Segments are immutable once produced and ordered by their position in the
/// audio timeline. Timing is in seconds; engines that report other units
/// convert before constructing one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_seconds: f32,
    pub end_seconds: f32,
    pub text: String,

    /// Token-level detail. Populated only when token timestamps or token
    /// probabilities were requested; empty otherwise and omitted from the
    /// serialized form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<Token>,
}

/// A single token within a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub start_seconds: f32,
    pub end_seconds: f32,
    pub text: String,
    /// Probability assigned to this token by the engine.
    pub probability: f32,
}
