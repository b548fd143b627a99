use std::time::Duration;

use anyhow::Result;

use crate::segments::Segment;

/// Configuration surface of a transcription engine.
///
/// The option-mapping layer ([`crate::configure`]) issues exactly one call per
/// provided command parameter; parameters the user never set issue no call at
/// all, so the engine's own defaults stay untouched. Every method is fallible:
/// an engine rejecting a value (out of range, unsupported on this build) is a
/// fatal configuration error and transcription is never attempted.
///
/// `build` consumes the builder, loads the model, and returns the runnable
/// [`Engine`].
pub trait EngineBuilder {
    type Engine: Engine;

    fn threads(&mut self, count: i32) -> Result<()>;
    fn max_last_text_tokens(&mut self, count: i32) -> Result<()>;
    fn offset(&mut self, offset: Duration) -> Result<()>;
    fn duration(&mut self, duration: Duration) -> Result<()>;
    fn translate(&mut self) -> Result<()>;
    fn no_context(&mut self) -> Result<()>;
    fn single_segment(&mut self) -> Result<()>;
    fn print_special_tokens(&mut self) -> Result<()>;
    fn print_progress(&mut self) -> Result<()>;
    fn print_results(&mut self) -> Result<()>;
    fn print_timestamps(&mut self) -> Result<()>;
    fn token_timestamps(&mut self) -> Result<()>;
    fn token_timestamps_threshold(&mut self, threshold: f32) -> Result<()>;
    fn token_timestamps_sum_threshold(&mut self, threshold: f32) -> Result<()>;
    fn max_segment_length(&mut self, length: i32) -> Result<()>;
    fn split_on_word(&mut self) -> Result<()>;
    fn max_tokens_per_segment(&mut self, count: i32) -> Result<()>;
    fn audio_context_size(&mut self, size: i32) -> Result<()>;
    fn suppress_regex(&mut self, regex: &str) -> Result<()>;
    fn prompt(&mut self, prompt: &str) -> Result<()>;

    /// Transcribe in the given language.
    ///
    /// Mutually exclusive with [`EngineBuilder::language_detection`]; the
    /// option-mapping layer issues exactly one of the two.
    fn language(&mut self, language: &str) -> Result<()>;

    /// Detect the spoken language automatically.
    fn language_detection(&mut self) -> Result<()>;

    fn suppress_blank(&mut self, enabled: bool) -> Result<()>;
    fn temperature(&mut self, value: f32) -> Result<()>;
    fn max_initial_ts(&mut self, value: f32) -> Result<()>;
    fn length_penalty(&mut self, value: f32) -> Result<()>;
    fn temperature_inc(&mut self, value: f32) -> Result<()>;
    fn entropy_threshold(&mut self, value: f32) -> Result<()>;
    fn log_prob_threshold(&mut self, value: f32) -> Result<()>;
    fn no_speech_threshold(&mut self, value: f32) -> Result<()>;
    fn greedy_sampling(&mut self) -> Result<()>;
    fn beam_search_sampling(&mut self) -> Result<()>;
    fn compute_probabilities(&mut self) -> Result<()>;

    /// Configure the alternate OpenVINO encoder as one composite call.
    ///
    /// Issued at most once, and only when at least one of the three fields was
    /// provided; the unprovided fields arrive as `None` so the encoder is
    /// never half-initialized from unrelated defaults.
    fn openvino_encoder(
        &mut self,
        encoder_path: Option<&str>,
        device: Option<&str>,
        cache_dir: Option<&str>,
    ) -> Result<()>;

    /// Load the model and produce a runnable engine.
    fn build(self) -> Result<Self::Engine>;
}

/// A configured engine ready to transcribe one audio buffer.
pub trait Engine {
    /// Run transcription over mono 16 kHz samples.
    ///
    /// `on_segment` is invoked once per recognized segment, in audio timeline
    /// order; the call for segment *n* returns before segment *n+1* is
    /// delivered. Returning `Ok(())` signals the engine reached end of input.
    /// An error from the callback aborts the run and is surfaced unchanged.
    fn transcribe(
        &mut self,
        samples: &[f32],
        on_segment: &mut dyn FnMut(&Segment) -> Result<()>,
    ) -> Result<()>;
}
