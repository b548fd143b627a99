use std::time::Duration;

use crate::error::UsageError;
use crate::opts::Opts;
use crate::runtime::parse_backend_order;

/// What the command line asked for.
#[derive(Debug)]
pub enum Command {
    /// Print the usage text and exit successfully.
    Help,
    /// Run a transcription with the parsed options.
    Run(Opts),
}

/// Parse the raw argument list (without the program name).
///
/// `--help` anywhere, or an empty argument list, short-circuits to
/// [`Command::Help`] before any other token is interpreted. Otherwise tokens
/// are consumed strictly left to right: each flag pulls its value (if any)
/// from the iterator, so a value-bearing flag at the end of the line is a
/// missing-value error rather than an out-of-bounds read. Flag names match
/// case-insensitively; a repeated flag keeps its last occurrence.
pub fn parse(args: &[String]) -> Result<Command, UsageError> {
    if args.is_empty() || args.iter().any(|arg| arg.eq_ignore_ascii_case("--help")) {
        return Ok(Command::Help);
    }

    let mut opts = Opts::default();
    let mut tokens = args.iter();

    while let Some(flag) = tokens.next() {
        match flag.to_ascii_lowercase().as_str() {
            "--audiofile" => opts.audio_file = value_for(flag, &mut tokens)?.to_owned(),
            "--modelfile" => opts.model_file = value_for(flag, &mut tokens)?.to_owned(),
            "--outputfile" => opts.output_file = value_for(flag, &mut tokens)?.to_owned(),

            "--threads" => opts.threads = Some(int_value(flag, &mut tokens)?),
            "--maxlasttexttokens" => opts.max_last_text_tokens = Some(int_value(flag, &mut tokens)?),
            "--offset" => opts.offset = Some(duration_value(flag, &mut tokens)?),
            "--duration" => opts.duration = Some(duration_value(flag, &mut tokens)?),

            "--translate" => opts.translate = Some(true),
            "--nocontext" => opts.no_context = Some(true),
            "--singlesegment" => opts.single_segment = Some(true),
            "--printspecialtokens" => opts.print_special_tokens = Some(true),
            "--printprogress" => opts.print_progress = Some(true),
            "--printresults" => opts.print_results = Some(true),
            "--printtimestamps" => opts.print_timestamps = Some(true),
            "--tokentimestamps" => opts.token_timestamps = Some(true),

            "--tokentimestampsthreshold" => {
                opts.token_timestamps_threshold = Some(float_value(flag, &mut tokens)?)
            }
            "--tokentimestampssumthreshold" => {
                opts.token_timestamps_sum_threshold = Some(float_value(flag, &mut tokens)?)
            }
            "--maxsegmentlength" => opts.max_segment_length = Some(int_value(flag, &mut tokens)?),
            "--splitonword" => opts.split_on_word = Some(true),
            "--maxtokenspersegment" => {
                opts.max_tokens_per_segment = Some(int_value(flag, &mut tokens)?)
            }
            "--audiocontextsize" => opts.audio_context_size = Some(int_value(flag, &mut tokens)?),

            "--suppressregex" => opts.suppress_regex = Some(value_for(flag, &mut tokens)?.to_owned()),
            "--prompt" => opts.prompt = Some(value_for(flag, &mut tokens)?.to_owned()),
            "--language" => opts.language = Some(value_for(flag, &mut tokens)?.to_owned()),

            // The one boolean that carries an explicit value token.
            "--suppressblank" => opts.suppress_blank = Some(bool_value(flag, &mut tokens)?),

            "--temperature" => opts.temperature = Some(float_value(flag, &mut tokens)?),
            "--maxinitialts" => opts.max_initial_ts = Some(float_value(flag, &mut tokens)?),
            "--lengthpenalty" => opts.length_penalty = Some(float_value(flag, &mut tokens)?),
            "--temperatureinc" => opts.temperature_inc = Some(float_value(flag, &mut tokens)?),
            "--entropythreshold" => opts.entropy_threshold = Some(float_value(flag, &mut tokens)?),
            "--logprobthreshold" => opts.log_prob_threshold = Some(float_value(flag, &mut tokens)?),
            "--nospeechthreshold" => {
                opts.no_speech_threshold = Some(float_value(flag, &mut tokens)?)
            }

            "--samplingstrategy" => {
                opts.sampling_strategy = Some(value_for(flag, &mut tokens)?.to_owned())
            }
            "--computeprobabilities" => opts.compute_probabilities = Some(true),

            "--openvinoencoderpath" => {
                opts.openvino_encoder_path = Some(value_for(flag, &mut tokens)?.to_owned())
            }
            "--openvinodevice" => {
                opts.openvino_device = Some(value_for(flag, &mut tokens)?.to_owned())
            }
            "--openvinocachedir" => {
                opts.openvino_cache_dir = Some(value_for(flag, &mut tokens)?.to_owned())
            }

            "--runtimeorder" => {
                opts.runtime_order = Some(parse_backend_order(value_for(flag, &mut tokens)?))
            }

            _ => return Err(UsageError::Unrecognized(flag.clone())),
        }
    }

    Ok(Command::Run(opts))
}

/// The usage text printed for `--help` or an empty command line.
pub fn usage() -> &'static str {
    "\
Usage: murmur --audioFile <path> --modelFile <path> --outputFile <path> [options]

Options:
  --audioFile                    Path to audio file.
  --modelFile                    Path to Whisper model file.
  --outputFile                   Path for output file.
  --threads                      Number of threads.
  --maxLastTextTokens            Maximum last text tokens.
  --offset                       Start offset (SS, MM:SS, or HH:MM:SS).
  --duration                     Duration (SS, MM:SS, or HH:MM:SS).
  --translate                    Translate flag.
  --noContext                    No context flag.
  --singleSegment                Single segment flag.
  --printSpecialTokens           Print special tokens flag.
  --printProgress                Print progress flag.
  --printResults                 Print results flag.
  --printTimestamps              Print timestamps flag.
  --tokenTimestamps              Token timestamps flag.
  --tokenTimestampsThreshold     Value for token timestamps threshold.
  --tokenTimestampsSumThreshold  Value for token timestamps sum threshold.
  --maxSegmentLength             Maximum segment length.
  --splitOnWord                  Split on word flag.
  --maxTokensPerSegment          Maximum tokens per segment.
  --audioContextSize             Audio context size.
  --suppressRegex                Regex to suppress.
  --prompt                       Prompt.
  --language                     Language. (If omitted, language detection is enabled)
  --suppressBlank                Suppress blank (true or false).
  --temperature                  Temperature.
  --maxInitialTs                 Max initial Ts.
  --lengthPenalty                Length penalty.
  --temperatureInc               Temperature increment.
  --entropyThreshold             Entropy threshold.
  --logProbThreshold             Log probability threshold.
  --noSpeechThreshold            No speech threshold.
  --samplingStrategy             Sampling strategy (\"greedy\" or \"beam\").
  --computeProbabilities         Compute probabilities flag.
  --openVinoEncoderPath          OpenVino encoder path.
  --openVinoDevice               OpenVino device.
  --openVinoCacheDir             OpenVino cache directory.
  --runtimeOrder                 Comma separated list of runtime libraries (e.g. Cpu,Cuda,Vulkan,CoreML,OpenVino,CpuNoAvx).
  --help                         Display this help message.
"
}

/// Pull the value token for a value-bearing flag.
fn value_for<'a, I>(flag: &str, tokens: &mut I) -> Result<&'a str, UsageError>
where
    I: Iterator<Item = &'a String>,
{
    tokens
        .next()
        .map(String::as_str)
        .ok_or_else(|| UsageError::MissingValue(flag.to_owned()))
}

fn int_value<'a, I>(flag: &str, tokens: &mut I) -> Result<i32, UsageError>
where
    I: Iterator<Item = &'a String>,
{
    let value = value_for(flag, tokens)?;
    value
        .parse()
        .map_err(|_| invalid(flag, value, "expected an integer"))
}

fn float_value<'a, I>(flag: &str, tokens: &mut I) -> Result<f32, UsageError>
where
    I: Iterator<Item = &'a String>,
{
    let value = value_for(flag, tokens)?;
    let parsed: f32 = value
        .parse()
        .map_err(|_| invalid(flag, value, "expected a number"))?;
    if !parsed.is_finite() {
        return Err(invalid(flag, value, "expected a finite number"));
    }
    Ok(parsed)
}

fn bool_value<'a, I>(flag: &str, tokens: &mut I) -> Result<bool, UsageError>
where
    I: Iterator<Item = &'a String>,
{
    let value = value_for(flag, tokens)?;
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(flag, value, "expected true or false")),
    }
}

/// Parse a duration given as `SS[.fff]`, `MM:SS[.fff]`, or `HH:MM:SS[.fff]`.
fn duration_value<'a, I>(flag: &str, tokens: &mut I) -> Result<Duration, UsageError>
where
    I: Iterator<Item = &'a String>,
{
    let value = value_for(flag, tokens)?;
    parse_duration(flag, value)
}

fn parse_duration(flag: &str, value: &str) -> Result<Duration, UsageError> {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() > 3 {
        return Err(invalid(flag, value, "expected SS, MM:SS, or HH:MM:SS"));
    }

    let seconds: f64 = parts[parts.len() - 1]
        .parse()
        .map_err(|_| invalid(flag, value, "seconds must be a number"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid(flag, value, "seconds must be non-negative"));
    }
    if parts.len() > 1 && seconds >= 60.0 {
        return Err(invalid(flag, value, "seconds must be below 60"));
    }

    let mut total = seconds;

    if parts.len() >= 2 {
        let minutes: u64 = parts[parts.len() - 2]
            .parse()
            .map_err(|_| invalid(flag, value, "minutes must be an integer"))?;
        if parts.len() == 3 && minutes >= 60 {
            return Err(invalid(flag, value, "minutes must be below 60"));
        }
        total += minutes as f64 * 60.0;
    }

    if parts.len() == 3 {
        let hours: u64 = parts[0]
            .parse()
            .map_err(|_| invalid(flag, value, "hours must be an integer"))?;
        total += hours as f64 * 3600.0;
    }

    Ok(Duration::from_secs_f64(total))
}

fn invalid(flag: &str, value: &str, reason: &str) -> UsageError {
    UsageError::InvalidValue {
        flag: flag.to_owned(),
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeBackend;

    fn parse_run(args: &[&str]) -> Opts {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        match parse(&args).expect("expected successful parse") {
            Command::Run(opts) => opts,
            Command::Help => panic!("expected Run, got Help"),
        }
    }

    fn parse_err(args: &[&str]) -> UsageError {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        match parse(&args) {
            Err(err) => err,
            Ok(command) => panic!("expected an error, got {command:?}"),
        }
    }

    #[test]
    fn empty_command_line_is_help() {
        assert!(matches!(parse(&[]), Ok(Command::Help)));
    }

    #[test]
    fn help_anywhere_preempts_everything_else() {
        let args = vec![
            "--audioFile".to_string(),
            "in.wav".to_string(),
            "--HELP".to_string(),
            "--bogus".to_string(),
        ];
        assert!(matches!(parse(&args), Ok(Command::Help)));
    }

    #[test]
    fn mandatory_paths_are_parsed() {
        let opts = parse_run(&[
            "--audioFile",
            "in.wav",
            "--modelFile",
            "model.bin",
            "--outputFile",
            "out.json",
        ]);
        assert_eq!(opts.audio_file, "in.wav");
        assert_eq!(opts.model_file, "model.bin");
        assert_eq!(opts.output_file, "out.json");
    }

    #[test]
    fn flag_names_match_case_insensitively() {
        let opts = parse_run(&["--AUDIOFILE", "in.wav", "--Threads", "4"]);
        assert_eq!(opts.audio_file, "in.wav");
        assert_eq!(opts.threads, Some(4));
    }

    #[test]
    fn unseen_flags_stay_absent() {
        let opts = parse_run(&["--audioFile", "in.wav"]);
        assert!(opts.threads.is_none());
        assert!(opts.translate.is_none());
        assert!(opts.language.is_none());
        assert!(opts.suppress_blank.is_none());
        assert!(opts.runtime_order.is_none());
    }

    #[test]
    fn presence_flags_become_provided_true() {
        let opts = parse_run(&[
            "--translate",
            "--noContext",
            "--splitOnWord",
            "--computeProbabilities",
        ]);
        assert_eq!(opts.translate, Some(true));
        assert_eq!(opts.no_context, Some(true));
        assert_eq!(opts.split_on_word, Some(true));
        assert_eq!(opts.compute_probabilities, Some(true));
    }

    #[test]
    fn suppress_blank_takes_an_explicit_value() {
        assert_eq!(
            parse_run(&["--suppressBlank", "true"]).suppress_blank,
            Some(true)
        );
        assert_eq!(
            parse_run(&["--suppressBlank", "FALSE"]).suppress_blank,
            Some(false)
        );
        let err = parse_err(&["--suppressBlank", "maybe"]);
        assert!(matches!(err, UsageError::InvalidValue { .. }));
    }

    #[test]
    fn numeric_values_are_parsed() {
        let opts = parse_run(&[
            "--threads",
            "8",
            "--temperature",
            "0.4",
            "--maxSegmentLength",
            "30",
        ]);
        assert_eq!(opts.threads, Some(8));
        assert_eq!(opts.temperature, Some(0.4));
        assert_eq!(opts.max_segment_length, Some(30));
    }

    #[test]
    fn malformed_numbers_are_fatal() {
        assert!(matches!(
            parse_err(&["--threads", "lots"]),
            UsageError::InvalidValue { .. }
        ));
        assert!(matches!(
            parse_err(&["--temperature", "warm"]),
            UsageError::InvalidValue { .. }
        ));
        assert!(matches!(
            parse_err(&["--temperature", "NaN"]),
            UsageError::InvalidValue { .. }
        ));
    }

    #[test]
    fn value_flag_at_end_of_line_is_missing_value() {
        let err = parse_err(&["--audioFile", "in.wav", "--threads"]);
        match err {
            UsageError::MissingValue(flag) => assert_eq!(flag, "--threads"),
            other => panic!("expected MissingValue, got {other}"),
        }
    }

    #[test]
    fn unrecognized_flag_names_the_offending_token() {
        let err = parse_err(&["--audioFile", "in.wav", "--warp", "9"]);
        match err {
            UsageError::Unrecognized(token) => assert_eq!(token, "--warp"),
            other => panic!("expected Unrecognized, got {other}"),
        }
    }

    #[test]
    fn durations_accept_all_three_layouts() {
        assert_eq!(
            parse_run(&["--offset", "5"]).offset,
            Some(Duration::from_secs(5))
        );
        assert_eq!(
            parse_run(&["--offset", "01:30"]).offset,
            Some(Duration::from_secs(90))
        );
        assert_eq!(
            parse_run(&["--offset", "1:02:03"]).offset,
            Some(Duration::from_secs(3723))
        );
        assert_eq!(
            parse_run(&["--duration", "2.5"]).duration,
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn malformed_durations_are_fatal() {
        for bad in ["abc", "1:2:3:4", "-5", "01:75", "2:60:00"] {
            assert!(
                matches!(
                    parse_err(&["--offset", bad]),
                    UsageError::InvalidValue { .. }
                ),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn runtime_order_drops_unknown_names() {
        let opts = parse_run(&["--runtimeOrder", "cpu,bogus,cuda"]);
        assert_eq!(
            opts.runtime_order,
            Some(vec![RuntimeBackend::Cpu, RuntimeBackend::Cuda])
        );
    }

    #[test]
    fn fully_unknown_runtime_order_is_provided_but_empty() {
        let opts = parse_run(&["--runtimeOrder", "tpu"]);
        assert_eq!(opts.runtime_order, Some(Vec::new()));
    }

    #[test]
    fn repeated_flags_keep_the_last_occurrence() {
        let opts = parse_run(&["--threads", "2", "--threads", "6"]);
        assert_eq!(opts.threads, Some(6));
    }

    #[test]
    fn usage_text_names_every_flag() {
        let text = usage();
        for flag in [
            "--audioFile",
            "--modelFile",
            "--outputFile",
            "--suppressBlank",
            "--samplingStrategy",
            "--runtimeOrder",
            "--help",
        ] {
            assert!(text.contains(flag), "usage text is missing {flag}");
        }
    }
}
