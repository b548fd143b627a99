use thiserror::Error;

/// Errors produced while interpreting the command line.
///
/// These are always fatal, always reported before any engine work starts, and
/// always map to exit code 1. Everything past the command-line surface uses
/// `anyhow` instead; this enum exists so the parser and validation code have a
/// typed vocabulary for the handful of ways user input can be wrong.
#[derive(Debug, Error)]
pub enum UsageError {
    /// A token that is not a recognized flag name.
    #[error("unrecognized argument: {0}. Use --help for a list of flags.")]
    Unrecognized(String),

    /// A value-bearing flag appeared as the last token.
    #[error("missing value for {0}")]
    MissingValue(String),

    /// A value token that does not parse as the flag's declared type.
    #[error("invalid value '{value}' for {flag}: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    /// One of the mandatory flags was never provided (or was empty).
    #[error("missing required flag {0}")]
    MissingFlag(&'static str),
}
