//! Engine implementations.

pub mod whisper;
