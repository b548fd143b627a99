use anyhow::Result;

use crate::engine::EngineBuilder;
use crate::opts::Opts;

/// Translate the option store into engine configuration calls.
///
/// The walk visits parameters in one fixed order (the order of the help text)
/// so identical input always produces the identical call sequence. Every
/// provided parameter issues exactly one call; absent parameters issue none.
/// Three spots deviate from that one-to-one rule:
///
/// - language: an explicit language and automatic detection are mutually
///   exclusive, with detection as the fallback when no (non-empty) language
///   was given;
/// - sampling strategy: only `greedy` and `beam` are recognized (ignoring
///   case), anything else is dropped without a call and without an error;
/// - the OpenVINO encoder: its three fields travel as one composite call,
///   issued only when at least one of them was provided.
pub fn apply_options<B: EngineBuilder>(opts: &Opts, builder: &mut B) -> Result<()> {
    if let Some(count) = opts.threads {
        builder.threads(count)?;
    }
    if let Some(count) = opts.max_last_text_tokens {
        builder.max_last_text_tokens(count)?;
    }
    if let Some(offset) = opts.offset {
        builder.offset(offset)?;
    }
    if let Some(duration) = opts.duration {
        builder.duration(duration)?;
    }
    if opts.translate == Some(true) {
        builder.translate()?;
    }
    if opts.no_context == Some(true) {
        builder.no_context()?;
    }
    if opts.single_segment == Some(true) {
        builder.single_segment()?;
    }
    if opts.print_special_tokens == Some(true) {
        builder.print_special_tokens()?;
    }
    if opts.print_progress == Some(true) {
        builder.print_progress()?;
    }
    if opts.print_results == Some(true) {
        builder.print_results()?;
    }
    if opts.print_timestamps == Some(true) {
        builder.print_timestamps()?;
    }
    if opts.token_timestamps == Some(true) {
        builder.token_timestamps()?;
    }
    if let Some(threshold) = opts.token_timestamps_threshold {
        builder.token_timestamps_threshold(threshold)?;
    }
    if let Some(threshold) = opts.token_timestamps_sum_threshold {
        builder.token_timestamps_sum_threshold(threshold)?;
    }
    if let Some(length) = opts.max_segment_length {
        builder.max_segment_length(length)?;
    }
    if opts.split_on_word == Some(true) {
        builder.split_on_word()?;
    }
    if let Some(count) = opts.max_tokens_per_segment {
        builder.max_tokens_per_segment(count)?;
    }
    if let Some(size) = opts.audio_context_size {
        builder.audio_context_size(size)?;
    }
    if let Some(regex) = opts.suppress_regex.as_deref() {
        builder.suppress_regex(regex)?;
    }
    if let Some(prompt) = opts.prompt.as_deref() {
        builder.prompt(prompt)?;
    }

    match opts.language.as_deref() {
        Some(language) if !language.is_empty() => builder.language(language)?,
        _ => builder.language_detection()?,
    }

    if let Some(enabled) = opts.suppress_blank {
        builder.suppress_blank(enabled)?;
    }
    if let Some(value) = opts.temperature {
        builder.temperature(value)?;
    }
    if let Some(value) = opts.max_initial_ts {
        builder.max_initial_ts(value)?;
    }
    if let Some(value) = opts.length_penalty {
        builder.length_penalty(value)?;
    }
    if let Some(value) = opts.temperature_inc {
        builder.temperature_inc(value)?;
    }
    if let Some(value) = opts.entropy_threshold {
        builder.entropy_threshold(value)?;
    }
    if let Some(value) = opts.log_prob_threshold {
        builder.log_prob_threshold(value)?;
    }
    if let Some(value) = opts.no_speech_threshold {
        builder.no_speech_threshold(value)?;
    }

    if let Some(strategy) = opts.sampling_strategy.as_deref() {
        if strategy.eq_ignore_ascii_case("greedy") {
            builder.greedy_sampling()?;
        } else if strategy.eq_ignore_ascii_case("beam") {
            builder.beam_search_sampling()?;
        } else {
            tracing::warn!(strategy, "ignoring unknown sampling strategy");
        }
    }

    if opts.compute_probabilities == Some(true) {
        builder.compute_probabilities()?;
    }

    if opts.openvino_encoder_path.is_some()
        || opts.openvino_device.is_some()
        || opts.openvino_cache_dir.is_some()
    {
        builder.openvino_encoder(
            opts.openvino_encoder_path.as_deref(),
            opts.openvino_device.as_deref(),
            opts.openvino_cache_dir.as_deref(),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::{Result, bail};

    use super::*;
    use crate::engine::{Engine, EngineBuilder};
    use crate::segments::Segment;

    /// Records every configuration call as a readable string.
    #[derive(Default)]
    struct RecordingBuilder {
        calls: Vec<String>,
        reject_threads: bool,
    }

    struct NullEngine;

    impl Engine for NullEngine {
        fn transcribe(
            &mut self,
            _samples: &[f32],
            _on_segment: &mut dyn FnMut(&Segment) -> Result<()>,
        ) -> Result<()> {
            Ok(())
        }
    }

    impl RecordingBuilder {
        fn record(&mut self, call: String) -> Result<()> {
            self.calls.push(call);
            Ok(())
        }
    }

    impl EngineBuilder for RecordingBuilder {
        type Engine = NullEngine;

        fn threads(&mut self, count: i32) -> Result<()> {
            if self.reject_threads {
                bail!("thread count rejected");
            }
            self.record(format!("threads({count})"))
        }
        fn max_last_text_tokens(&mut self, count: i32) -> Result<()> {
            self.record(format!("max_last_text_tokens({count})"))
        }
        fn offset(&mut self, offset: Duration) -> Result<()> {
            self.record(format!("offset({}ms)", offset.as_millis()))
        }
        fn duration(&mut self, duration: Duration) -> Result<()> {
            self.record(format!("duration({}ms)", duration.as_millis()))
        }
        fn translate(&mut self) -> Result<()> {
            self.record("translate()".into())
        }
        fn no_context(&mut self) -> Result<()> {
            self.record("no_context()".into())
        }
        fn single_segment(&mut self) -> Result<()> {
            self.record("single_segment()".into())
        }
        fn print_special_tokens(&mut self) -> Result<()> {
            self.record("print_special_tokens()".into())
        }
        fn print_progress(&mut self) -> Result<()> {
            self.record("print_progress()".into())
        }
        fn print_results(&mut self) -> Result<()> {
            self.record("print_results()".into())
        }
        fn print_timestamps(&mut self) -> Result<()> {
            self.record("print_timestamps()".into())
        }
        fn token_timestamps(&mut self) -> Result<()> {
            self.record("token_timestamps()".into())
        }
        fn token_timestamps_threshold(&mut self, threshold: f32) -> Result<()> {
            self.record(format!("token_timestamps_threshold({threshold})"))
        }
        fn token_timestamps_sum_threshold(&mut self, threshold: f32) -> Result<()> {
            self.record(format!("token_timestamps_sum_threshold({threshold})"))
        }
        fn max_segment_length(&mut self, length: i32) -> Result<()> {
            self.record(format!("max_segment_length({length})"))
        }
        fn split_on_word(&mut self) -> Result<()> {
            self.record("split_on_word()".into())
        }
        fn max_tokens_per_segment(&mut self, count: i32) -> Result<()> {
            self.record(format!("max_tokens_per_segment({count})"))
        }
        fn audio_context_size(&mut self, size: i32) -> Result<()> {
            self.record(format!("audio_context_size({size})"))
        }
        fn suppress_regex(&mut self, regex: &str) -> Result<()> {
            self.record(format!("suppress_regex({regex})"))
        }
        fn prompt(&mut self, prompt: &str) -> Result<()> {
            self.record(format!("prompt({prompt})"))
        }
        fn language(&mut self, language: &str) -> Result<()> {
            self.record(format!("language({language})"))
        }
        fn language_detection(&mut self) -> Result<()> {
            self.record("language_detection()".into())
        }
        fn suppress_blank(&mut self, enabled: bool) -> Result<()> {
            self.record(format!("suppress_blank({enabled})"))
        }
        fn temperature(&mut self, value: f32) -> Result<()> {
            self.record(format!("temperature({value})"))
        }
        fn max_initial_ts(&mut self, value: f32) -> Result<()> {
            self.record(format!("max_initial_ts({value})"))
        }
        fn length_penalty(&mut self, value: f32) -> Result<()> {
            self.record(format!("length_penalty({value})"))
        }
        fn temperature_inc(&mut self, value: f32) -> Result<()> {
            self.record(format!("temperature_inc({value})"))
        }
        fn entropy_threshold(&mut self, value: f32) -> Result<()> {
            self.record(format!("entropy_threshold({value})"))
        }
        fn log_prob_threshold(&mut self, value: f32) -> Result<()> {
            self.record(format!("log_prob_threshold({value})"))
        }
        fn no_speech_threshold(&mut self, value: f32) -> Result<()> {
            self.record(format!("no_speech_threshold({value})"))
        }
        fn greedy_sampling(&mut self) -> Result<()> {
            self.record("greedy_sampling()".into())
        }
        fn beam_search_sampling(&mut self) -> Result<()> {
            self.record("beam_search_sampling()".into())
        }
        fn compute_probabilities(&mut self) -> Result<()> {
            self.record("compute_probabilities()".into())
        }
        fn openvino_encoder(
            &mut self,
            encoder_path: Option<&str>,
            device: Option<&str>,
            cache_dir: Option<&str>,
        ) -> Result<()> {
            self.record(format!(
                "openvino_encoder({encoder_path:?}, {device:?}, {cache_dir:?})"
            ))
        }
        fn build(self) -> Result<NullEngine> {
            Ok(NullEngine)
        }
    }

    fn calls_for(opts: &Opts) -> Vec<String> {
        let mut builder = RecordingBuilder::default();
        apply_options(opts, &mut builder).expect("configuration should succeed");
        builder.calls
    }

    #[test]
    fn all_absent_issues_only_language_detection() {
        assert_eq!(calls_for(&Opts::default()), vec!["language_detection()"]);
    }

    #[test]
    fn each_provided_option_issues_exactly_one_call() {
        let opts = Opts {
            threads: Some(4),
            temperature: Some(0.2),
            suppress_blank: Some(false),
            ..Opts::default()
        };
        let calls = calls_for(&opts);
        assert_eq!(
            calls,
            vec![
                "threads(4)",
                "language_detection()",
                "suppress_blank(false)",
                "temperature(0.2)",
            ]
        );
    }

    #[test]
    fn explicit_language_suppresses_detection() {
        let opts = Opts {
            language: Some("en".to_string()),
            ..Opts::default()
        };
        let calls = calls_for(&opts);
        assert!(calls.contains(&"language(en)".to_string()));
        assert!(!calls.contains(&"language_detection()".to_string()));
    }

    #[test]
    fn empty_language_falls_back_to_detection() {
        let opts = Opts {
            language: Some(String::new()),
            ..Opts::default()
        };
        let calls = calls_for(&opts);
        assert!(calls.contains(&"language_detection()".to_string()));
        assert!(!calls.iter().any(|call| call.starts_with("language(")));
    }

    #[test]
    fn sampling_strategy_matches_case_insensitively() {
        for strategy in ["greedy", "GrEeDy", "GREEDY"] {
            let opts = Opts {
                sampling_strategy: Some(strategy.to_string()),
                ..Opts::default()
            };
            assert!(
                calls_for(&opts).contains(&"greedy_sampling()".to_string()),
                "strategy {strategy:?} should select greedy sampling"
            );
        }

        let opts = Opts {
            sampling_strategy: Some("Beam".to_string()),
            ..Opts::default()
        };
        assert!(calls_for(&opts).contains(&"beam_search_sampling()".to_string()));
    }

    #[test]
    fn unknown_sampling_strategy_is_silently_dropped() {
        let opts = Opts {
            sampling_strategy: Some("foo".to_string()),
            ..Opts::default()
        };
        let calls = calls_for(&opts);
        assert!(!calls.iter().any(|call| call.contains("sampling")));
    }

    #[test]
    fn openvino_fields_travel_as_one_composite_call() {
        let opts = Opts {
            openvino_device: Some("cpu".to_string()),
            ..Opts::default()
        };
        let calls = calls_for(&opts);
        assert!(
            calls.contains(&"openvino_encoder(None, Some(\"cpu\"), None)".to_string()),
            "unexpected calls: {calls:?}"
        );
    }

    #[test]
    fn no_openvino_fields_means_no_composite_call() {
        let calls = calls_for(&Opts::default());
        assert!(!calls.iter().any(|call| call.starts_with("openvino")));
    }

    #[test]
    fn walk_order_is_deterministic() {
        let opts = Opts {
            threads: Some(2),
            offset: Some(Duration::from_secs(1)),
            translate: Some(true),
            token_timestamps: Some(true),
            language: Some("nl".to_string()),
            temperature: Some(0.5),
            sampling_strategy: Some("beam".to_string()),
            compute_probabilities: Some(true),
            openvino_device: Some("gpu".to_string()),
            ..Opts::default()
        };
        assert_eq!(
            calls_for(&opts),
            vec![
                "threads(2)",
                "offset(1000ms)",
                "translate()",
                "token_timestamps()",
                "language(nl)",
                "temperature(0.5)",
                "beam_search_sampling()",
                "compute_probabilities()",
                "openvino_encoder(None, Some(\"gpu\"), None)",
            ]
        );
    }

    #[test]
    fn a_rejected_value_aborts_the_walk() {
        let opts = Opts {
            threads: Some(0),
            temperature: Some(0.5),
            ..Opts::default()
        };
        let mut builder = RecordingBuilder {
            reject_threads: true,
            ..RecordingBuilder::default()
        };
        let err = apply_options(&opts, &mut builder).unwrap_err();
        assert!(err.to_string().contains("rejected"));
        assert!(builder.calls.is_empty(), "no call should follow a rejection");
    }
}
