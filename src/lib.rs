//! `murmur` — a batch transcription CLI built on top of Whisper.
//!
//! This crate provides:
//! - A typed option store that keeps "provided" and "absent" parameters distinct
//! - A table-driven command-line parser for the full Whisper tuning surface
//! - A deterministic mapping from options onto an engine configuration builder
//! - A streaming aggregator that emits segments live and writes one final document
//!
//! The engine itself sits behind the [`engine::EngineBuilder`] and
//! [`engine::Engine`] traits; the built-in implementation wraps whisper.cpp via
//! `whisper-rs`.

// Command-line surface.
pub mod args;
pub mod error;
pub mod opts;

// Engine configuration and the capability seam.
pub mod configure;
pub mod engine;
pub mod runtime;

// Segment data structures and result handling.
pub mod aggregator;
pub mod segments;
pub mod sink;

// Audio input.
pub mod wav;

// Logging configuration and control.
pub mod logging;

// Engine implementations.
pub mod backends;
