use anyhow::{Context, Result};
use whisper_rs::WhisperSegment;

use crate::segments::{Segment, Token};

/// Convert one whisper.cpp segment into our segment shape.
///
/// Token detail is extracted only when requested; segments stay lean
/// otherwise.
pub(super) fn to_segment(segment: WhisperSegment, with_tokens: bool) -> Result<Segment> {
    let text = segment
        .to_str()
        .context("failed to get segment text")?
        .to_owned();

    let tokens = if with_tokens {
        tokens_from_segment(&segment)?
    } else {
        Vec::new()
    };

    Ok(Segment {
        start_seconds: centiseconds_to_seconds(segment.start_timestamp()),
        end_seconds: centiseconds_to_seconds(segment.end_timestamp()),
        text,
        tokens,
    })
}

fn tokens_from_segment(segment: &WhisperSegment) -> Result<Vec<Token>> {
    let token_count = segment.n_tokens();
    let token_count_usize = usize::try_from(token_count)
        .with_context(|| format!("segment reported negative token count: {token_count}"))?;
    let mut tokens = Vec::with_capacity(token_count_usize);

    for token_idx in 0..token_count_usize {
        let token = segment
            .get_token(token_idx as i32)
            .context("failed to get token from segment")?;

        let data = token.token_data();
        let text = token
            .to_str()
            .with_context(|| format!("failed to get token text at index {token_idx}"))?
            .to_owned();

        tokens.push(Token {
            // whisper uses -1 for unknown; clamp to 0 so consumers don't see -0.01s
            start_seconds: centiseconds_to_seconds(data.t0),
            end_seconds: centiseconds_to_seconds(data.t1),
            text,
            probability: data.p,
        });
    }

    Ok(tokens)
}

pub(super) fn centiseconds_to_seconds(value: i64) -> f32 {
    if value < 0 { 0.0 } else { value as f32 / 100.0 }
}
