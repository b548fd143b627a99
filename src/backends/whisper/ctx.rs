use std::os::raw::{c_char, c_void};
use std::sync::Once;

use anyhow::{Context, Result};
use whisper_rs::{WhisperContext, WhisperContextParameters};

/// Load a Whisper model and return an initialized `WhisperContext`.
///
/// `use_gpu` of `None` keeps the library's own default; `Some` pins the
/// choice derived from the user's runtime-backend order.
pub(super) fn load_context(model_file: &str, use_gpu: Option<bool>) -> Result<WhisperContext> {
    silence_whisper_logs();

    let mut ctx_params = WhisperContextParameters::default();
    if let Some(use_gpu) = use_gpu {
        ctx_params.use_gpu(use_gpu);
    }

    WhisperContext::new_with_params(model_file, ctx_params)
        .with_context(|| format!("failed to load model from path: {model_file}"))
}

/// A no-op log callback used to silence logs emitted by whisper.cpp.
unsafe extern "C" fn whisper_log_callback(
    _level: u32,
    _c_msg: *const c_char,
    _user_data: *mut c_void,
) {
    // Intentionally left empty.
}

/// Ensure whisper logging is configured exactly once for the lifetime of the
/// process. whisper.cpp writes straight to stderr otherwise, which would
/// interleave with our own diagnostics.
fn silence_whisper_logs() {
    static INIT: Once = Once::new();

    INIT.call_once(|| unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    });
}
