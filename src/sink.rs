use std::io::Write;

use anyhow::Result;

use crate::segments::Segment;

/// Destination for segments as they are produced.
pub trait SegmentSink {
    fn accept(&mut self, segment: &Segment) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

/// The live progress channel: one JSON object per line, in production order.
///
/// Each segment is flushed as soon as it is written so pipes and terminals see
/// output promptly, even while the engine is still working on the next
/// segment.
pub struct JsonLinesWriter<W: Write> {
    w: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }
}

impl<W: Write> SegmentSink for JsonLinesWriter<W> {
    fn accept(&mut self, segment: &Segment) -> Result<()> {
        serde_json::to_writer(&mut self.w, segment)?;
        self.w.write_all(b"\n")?;
        self.w.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }
}
