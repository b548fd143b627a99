use whisper_rs::{FullParams, SamplingStrategy};

/// Decoding strategy selection carried from configuration to `FullParams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum Sampling {
    #[default]
    Greedy,
    BeamSearch,
}

/// Owned parameter values collected by the builder.
///
/// Valued parameters are `Option`s: `None` issues no setter, leaving
/// whisper.cpp's compiled-in default untouched. Presence flags are plain
/// bools that only ever flip a setting on. `language` of `None` means
/// automatic detection (whisper.cpp auto-detects when no language is set).
#[derive(Debug, Clone, Default)]
pub(super) struct ParamSpec {
    pub threads: Option<i32>,
    pub max_text_ctx: Option<i32>,
    pub offset_ms: Option<i32>,
    pub duration_ms: Option<i32>,
    pub translate: bool,
    pub no_context: bool,
    pub single_segment: bool,
    pub print_special: bool,
    pub print_progress: bool,
    pub print_realtime: bool,
    pub print_timestamps: bool,
    pub token_timestamps: bool,
    pub thold_pt: Option<f32>,
    pub thold_ptsum: Option<f32>,
    pub max_len: Option<i32>,
    pub split_on_word: bool,
    pub max_tokens: Option<i32>,
    pub audio_ctx: Option<i32>,
    pub suppress_regex: Option<String>,
    pub initial_prompt: Option<String>,
    pub language: Option<String>,
    pub suppress_blank: Option<bool>,
    pub temperature: Option<f32>,
    pub max_initial_ts: Option<f32>,
    pub length_penalty: Option<f32>,
    pub temperature_inc: Option<f32>,
    pub entropy_thold: Option<f32>,
    pub logprob_thold: Option<f32>,
    pub no_speech_thold: Option<f32>,
    pub sampling: Sampling,
    pub with_probabilities: bool,
}

impl ParamSpec {
    /// Whether emitted segments should carry token-level detail.
    pub(super) fn emit_token_detail(&self) -> bool {
        self.token_timestamps || self.with_probabilities
    }

    /// Build the `FullParams` for one transcription run.
    ///
    /// Token timestamps are also enabled when probabilities were requested so
    /// the emitted token detail is complete.
    pub(super) fn full_params(&self) -> FullParams<'_, '_> {
        let strategy = match self.sampling {
            Sampling::Greedy => SamplingStrategy::Greedy { best_of: 1 },
            Sampling::BeamSearch => SamplingStrategy::BeamSearch {
                beam_size: 5,
                patience: 1.0,
            },
        };
        let mut params = FullParams::new(strategy);

        match self.threads {
            Some(count) => params.set_n_threads(count),
            None => params.set_n_threads(num_cpus::get() as i32),
        }
        if let Some(count) = self.max_text_ctx {
            params.set_n_max_text_ctx(count);
        }
        if let Some(ms) = self.offset_ms {
            params.set_offset_ms(ms);
        }
        if let Some(ms) = self.duration_ms {
            params.set_duration_ms(ms);
        }
        if self.translate {
            params.set_translate(true);
        }
        if self.no_context {
            params.set_no_context(true);
        }
        if self.single_segment {
            params.set_single_segment(true);
        }
        if self.print_special {
            params.set_print_special(true);
        }
        if self.print_progress {
            params.set_print_progress(true);
        }
        if self.print_realtime {
            params.set_print_realtime(true);
        }
        if self.print_timestamps {
            params.set_print_timestamps(true);
        }
        if self.emit_token_detail() {
            params.set_token_timestamps(true);
        }
        if let Some(threshold) = self.thold_pt {
            params.set_thold_pt(threshold);
        }
        if let Some(threshold) = self.thold_ptsum {
            params.set_thold_ptsum(threshold);
        }
        if let Some(length) = self.max_len {
            params.set_max_len(length);
        }
        if self.split_on_word {
            params.set_split_on_word(true);
        }
        if let Some(count) = self.max_tokens {
            params.set_max_tokens(count);
        }
        if let Some(size) = self.audio_ctx {
            params.set_audio_ctx(size);
        }
        if let Some(regex) = self.suppress_regex.as_deref() {
            params.set_suppress_regex(regex);
        }
        if let Some(prompt) = self.initial_prompt.as_deref() {
            params.set_initial_prompt(prompt);
        }
        params.set_language(self.language.as_deref());
        if let Some(enabled) = self.suppress_blank {
            params.set_suppress_blank(enabled);
        }
        if let Some(value) = self.temperature {
            params.set_temperature(value);
        }
        if let Some(value) = self.max_initial_ts {
            params.set_max_initial_ts(value);
        }
        if let Some(value) = self.length_penalty {
            params.set_length_penalty(value);
        }
        if let Some(value) = self.temperature_inc {
            params.set_temperature_inc(value);
        }
        if let Some(value) = self.entropy_thold {
            params.set_entropy_thold(value);
        }
        if let Some(value) = self.logprob_thold {
            params.set_logprob_thold(value);
        }
        if let Some(value) = self.no_speech_thold {
            params.set_no_speech_thold(value);
        }

        params
    }
}
