use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::engine::Engine;
use crate::segments::Segment;
use crate::sink::SegmentSink;

/// Routes each produced segment to two places: the live sink right away, and
/// an in-memory buffer that becomes the aggregated result document.
///
/// The run is strictly sequential: the live-sink write for a segment completes
/// before the engine is resumed for the next one, so the live channel, the
/// buffer, and the final document all carry the same order. The output file is
/// touched only after the engine signals end of input, and is published with a
/// tempfile rename so a failing run never leaves a half-written document
/// behind. Live output already emitted is never retracted.
pub struct SegmentAggregator<S: SegmentSink> {
    live: S,
    collected: Vec<Segment>,
}

impl<S: SegmentSink> SegmentAggregator<S> {
    pub fn new(live: S) -> Self {
        Self {
            live,
            collected: Vec::new(),
        }
    }

    /// Drive the engine over `samples` and write the aggregated document to
    /// `output_path` once the stream completes.
    pub fn run<E: Engine>(
        &mut self,
        engine: &mut E,
        samples: &[f32],
        output_path: &Path,
    ) -> Result<()> {
        let live = &mut self.live;
        let collected = &mut self.collected;

        engine.transcribe(samples, &mut |segment| {
            live.accept(segment)?;
            collected.push(segment.clone());
            Ok(())
        })?;

        self.live.finish()?;
        write_document(&self.collected, output_path)
    }

    /// The segments collected so far, in arrival order.
    pub fn segments(&self) -> &[Segment] {
        &self.collected
    }
}

/// Serialize the full segment sequence as one JSON array and publish it
/// atomically at `path`.
fn write_document(segments: &[Segment], path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in '{}'", dir.display()))?;

    serde_json::to_writer(&mut file, segments)
        .with_context(|| format!("failed to serialize result for '{}'", path.display()))?;

    file.persist(path)
        .with_context(|| format!("failed to write output file '{}'", path.display()))?;

    Ok(())
}
