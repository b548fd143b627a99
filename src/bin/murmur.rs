use std::io::{self, BufWriter};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use murmur::aggregator::SegmentAggregator;
use murmur::args::{self, Command};
use murmur::backends::whisper::WhisperEngineBuilder;
use murmur::configure;
use murmur::engine::EngineBuilder;
use murmur::logging;
use murmur::sink::JsonLinesWriter;
use murmur::wav;

fn main() -> ExitCode {
    logging::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    match run(&argv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(argv: &[String]) -> Result<()> {
    let opts = match args::parse(argv)? {
        Command::Help => {
            print!("{}", args::usage());
            return Ok(());
        }
        Command::Run(opts) => opts,
    };
    opts.validate()?;

    // Configure first, then load the model: a rejected value must abort
    // before any expensive engine work.
    let order = opts.runtime_order.as_deref().unwrap_or(&[]);
    let mut builder = WhisperEngineBuilder::new(&opts.model_file, order);
    configure::apply_options(&opts, &mut builder)?;
    let mut engine = builder.build()?;

    let samples = wav::read_samples(&opts.audio_file)?;

    let stdout = io::stdout();
    let live = JsonLinesWriter::new(BufWriter::new(stdout.lock()));
    let mut aggregator = SegmentAggregator::new(live);
    aggregator.run(&mut engine, &samples, Path::new(&opts.output_file))
}
