//! Built-in engine powered by `whisper-rs` / `whisper.cpp`.

use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use whisper_rs::WhisperContext;

use crate::engine::{Engine, EngineBuilder};
use crate::runtime::RuntimeBackend;
use crate::segments::Segment;

mod ctx;
mod params;
mod segments;

use params::{ParamSpec, Sampling};

/// Collects configuration for a whisper.cpp run; the model is loaded at
/// `build` time, after every value has been accepted.
///
/// whisper-rs fixes acceleration backends when the crate is compiled, so the
/// runtime-backend order degrades to a GPU on/off choice here: any GPU-class
/// backend in the order enables GPU, a pure-CPU order disables it, and an
/// empty order leaves the library default in place.
pub struct WhisperEngineBuilder {
    model_file: String,
    use_gpu: Option<bool>,
    spec: ParamSpec,
}

impl WhisperEngineBuilder {
    pub fn new(model_file: impl Into<String>, runtime_order: &[RuntimeBackend]) -> Self {
        let use_gpu = if runtime_order.is_empty() {
            None
        } else {
            Some(runtime_order.iter().any(|backend| backend.uses_gpu()))
        };

        Self {
            model_file: model_file.into(),
            use_gpu,
            spec: ParamSpec::default(),
        }
    }
}

impl EngineBuilder for WhisperEngineBuilder {
    type Engine = WhisperEngine;

    fn threads(&mut self, count: i32) -> Result<()> {
        ensure!(count >= 1, "thread count must be at least 1, got {count}");
        self.spec.threads = Some(count);
        Ok(())
    }

    fn max_last_text_tokens(&mut self, count: i32) -> Result<()> {
        ensure!(count >= 0, "max last text tokens must not be negative, got {count}");
        self.spec.max_text_ctx = Some(count);
        Ok(())
    }

    fn offset(&mut self, offset: Duration) -> Result<()> {
        self.spec.offset_ms = Some(duration_to_ms(offset)?);
        Ok(())
    }

    fn duration(&mut self, duration: Duration) -> Result<()> {
        self.spec.duration_ms = Some(duration_to_ms(duration)?);
        Ok(())
    }

    fn translate(&mut self) -> Result<()> {
        self.spec.translate = true;
        Ok(())
    }

    fn no_context(&mut self) -> Result<()> {
        self.spec.no_context = true;
        Ok(())
    }

    fn single_segment(&mut self) -> Result<()> {
        self.spec.single_segment = true;
        Ok(())
    }

    fn print_special_tokens(&mut self) -> Result<()> {
        self.spec.print_special = true;
        Ok(())
    }

    fn print_progress(&mut self) -> Result<()> {
        self.spec.print_progress = true;
        Ok(())
    }

    fn print_results(&mut self) -> Result<()> {
        // whisper.cpp's name for per-segment console output.
        self.spec.print_realtime = true;
        Ok(())
    }

    fn print_timestamps(&mut self) -> Result<()> {
        self.spec.print_timestamps = true;
        Ok(())
    }

    fn token_timestamps(&mut self) -> Result<()> {
        self.spec.token_timestamps = true;
        Ok(())
    }

    fn token_timestamps_threshold(&mut self, threshold: f32) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&threshold),
            "token timestamps threshold must be between 0 and 1, got {threshold}"
        );
        self.spec.thold_pt = Some(threshold);
        Ok(())
    }

    fn token_timestamps_sum_threshold(&mut self, threshold: f32) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&threshold),
            "token timestamps sum threshold must be between 0 and 1, got {threshold}"
        );
        self.spec.thold_ptsum = Some(threshold);
        Ok(())
    }

    fn max_segment_length(&mut self, length: i32) -> Result<()> {
        ensure!(length >= 0, "max segment length must not be negative, got {length}");
        self.spec.max_len = Some(length);
        Ok(())
    }

    fn split_on_word(&mut self) -> Result<()> {
        self.spec.split_on_word = true;
        Ok(())
    }

    fn max_tokens_per_segment(&mut self, count: i32) -> Result<()> {
        ensure!(count >= 0, "max tokens per segment must not be negative, got {count}");
        self.spec.max_tokens = Some(count);
        Ok(())
    }

    fn audio_context_size(&mut self, size: i32) -> Result<()> {
        ensure!(size >= 0, "audio context size must not be negative, got {size}");
        self.spec.audio_ctx = Some(size);
        Ok(())
    }

    fn suppress_regex(&mut self, regex: &str) -> Result<()> {
        self.spec.suppress_regex = Some(regex.to_owned());
        Ok(())
    }

    fn prompt(&mut self, prompt: &str) -> Result<()> {
        self.spec.initial_prompt = Some(prompt.to_owned());
        Ok(())
    }

    fn language(&mut self, language: &str) -> Result<()> {
        self.spec.language = Some(language.to_owned());
        Ok(())
    }

    fn language_detection(&mut self) -> Result<()> {
        // whisper.cpp auto-detects when no language is pinned.
        self.spec.language = None;
        Ok(())
    }

    fn suppress_blank(&mut self, enabled: bool) -> Result<()> {
        self.spec.suppress_blank = Some(enabled);
        Ok(())
    }

    fn temperature(&mut self, value: f32) -> Result<()> {
        ensure!(value >= 0.0, "temperature must not be negative, got {value}");
        self.spec.temperature = Some(value);
        Ok(())
    }

    fn max_initial_ts(&mut self, value: f32) -> Result<()> {
        ensure!(value >= 0.0, "max initial timestamp must not be negative, got {value}");
        self.spec.max_initial_ts = Some(value);
        Ok(())
    }

    fn length_penalty(&mut self, value: f32) -> Result<()> {
        self.spec.length_penalty = Some(value);
        Ok(())
    }

    fn temperature_inc(&mut self, value: f32) -> Result<()> {
        ensure!(value >= 0.0, "temperature increment must not be negative, got {value}");
        self.spec.temperature_inc = Some(value);
        Ok(())
    }

    fn entropy_threshold(&mut self, value: f32) -> Result<()> {
        self.spec.entropy_thold = Some(value);
        Ok(())
    }

    fn log_prob_threshold(&mut self, value: f32) -> Result<()> {
        self.spec.logprob_thold = Some(value);
        Ok(())
    }

    fn no_speech_threshold(&mut self, value: f32) -> Result<()> {
        self.spec.no_speech_thold = Some(value);
        Ok(())
    }

    fn greedy_sampling(&mut self) -> Result<()> {
        self.spec.sampling = Sampling::Greedy;
        Ok(())
    }

    fn beam_search_sampling(&mut self) -> Result<()> {
        self.spec.sampling = Sampling::BeamSearch;
        Ok(())
    }

    fn compute_probabilities(&mut self) -> Result<()> {
        self.spec.with_probabilities = true;
        Ok(())
    }

    fn openvino_encoder(
        &mut self,
        _encoder_path: Option<&str>,
        _device: Option<&str>,
        _cache_dir: Option<&str>,
    ) -> Result<()> {
        bail!("the OpenVINO encoder is not supported by this whisper.cpp build")
    }

    fn build(self) -> Result<WhisperEngine> {
        let ctx = ctx::load_context(&self.model_file, self.use_gpu)?;
        Ok(WhisperEngine {
            ctx,
            spec: self.spec,
        })
    }
}

/// A loaded model plus the accepted parameter values.
pub struct WhisperEngine {
    ctx: WhisperContext,
    spec: ParamSpec,
}

impl Engine for WhisperEngine {
    fn transcribe(
        &mut self,
        samples: &[f32],
        on_segment: &mut dyn FnMut(&Segment) -> Result<()>,
    ) -> Result<()> {
        let params = self.spec.full_params();

        let mut state = self
            .ctx
            .create_state()
            .context("failed to create whisper state")?;

        state
            .full(params, samples)
            .context("failed to run whisper full()")?;

        let with_tokens = self.spec.emit_token_detail();
        for whisper_segment in state.as_iter() {
            let segment = segments::to_segment(whisper_segment, with_tokens)?;
            on_segment(&segment)?;
        }

        Ok(())
    }
}

fn duration_to_ms(value: Duration) -> Result<i32> {
    i32::try_from(value.as_millis())
        .map_err(|_| anyhow::anyhow!("duration of {}s exceeds the supported range", value.as_secs()))
}
