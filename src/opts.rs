use std::time::Duration;

use crate::error::UsageError;
use crate::runtime::RuntimeBackend;

/// The parsed command parameters for one transcription run.
///
/// Every tunable is an `Option`: `None` means the flag never appeared on the
/// command line and the engine's own default stays in effect — no
/// configuration call is issued for it. `Some(v)` means the user provided the
/// value explicitly. The two states are never conflated; downstream code
/// branches on presence before reading a value.
///
/// Presence-only flags (e.g. `--translate`) are still `Option<bool>` rather
/// than plain `bool` so "absent" and "provided" stay distinguishable in one
/// uniform shape; the parser only ever sets them to `Some(true)`. The one
/// value-bearing boolean, `--suppressBlank`, carries whatever the user typed.
#[derive(Debug, Clone, Default)]
pub struct Opts {
    /// Path to the audio file to transcribe. Mandatory.
    pub audio_file: String,
    /// Path to the speech-recognition model file. Mandatory.
    pub model_file: String,
    /// Path the aggregated result document is written to. Mandatory.
    pub output_file: String,

    /// Preferred acceleration-backend order, applied before model load.
    pub runtime_order: Option<Vec<RuntimeBackend>>,

    pub threads: Option<i32>,
    pub max_last_text_tokens: Option<i32>,
    pub offset: Option<Duration>,
    pub duration: Option<Duration>,
    pub translate: Option<bool>,
    pub no_context: Option<bool>,
    pub single_segment: Option<bool>,
    pub print_special_tokens: Option<bool>,
    pub print_progress: Option<bool>,
    pub print_results: Option<bool>,
    pub print_timestamps: Option<bool>,
    pub token_timestamps: Option<bool>,
    pub token_timestamps_threshold: Option<f32>,
    pub token_timestamps_sum_threshold: Option<f32>,
    pub max_segment_length: Option<i32>,
    pub split_on_word: Option<bool>,
    pub max_tokens_per_segment: Option<i32>,
    pub audio_context_size: Option<i32>,
    pub suppress_regex: Option<String>,
    pub prompt: Option<String>,
    pub language: Option<String>,
    pub suppress_blank: Option<bool>,
    pub temperature: Option<f32>,
    pub max_initial_ts: Option<f32>,
    pub length_penalty: Option<f32>,
    pub temperature_inc: Option<f32>,
    pub entropy_threshold: Option<f32>,
    pub log_prob_threshold: Option<f32>,
    pub no_speech_threshold: Option<f32>,
    pub sampling_strategy: Option<String>,
    pub compute_probabilities: Option<bool>,
    pub openvino_encoder_path: Option<String>,
    pub openvino_device: Option<String>,
    pub openvino_cache_dir: Option<String>,
}

impl Opts {
    /// Check that the three mandatory paths were provided.
    ///
    /// Called after parsing and before any engine interaction; a missing
    /// mandatory field is a hard error, never a silent default.
    pub fn validate(&self) -> Result<(), UsageError> {
        if self.audio_file.is_empty() {
            return Err(UsageError::MissingFlag("--audioFile"));
        }
        if self.model_file.is_empty() {
            return Err(UsageError::MissingFlag("--modelFile"));
        }
        if self.output_file.is_empty() {
            return Err(UsageError::MissingFlag("--outputFile"));
        }
        Ok(())
    }
}
