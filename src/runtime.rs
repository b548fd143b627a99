use std::fmt;

/// A named acceleration backend the engine may load at runtime.
///
/// The variant set mirrors the loader names whisper.cpp builds ship under.
/// Users supply these as a comma-separated preference list via
/// `--runtimeOrder`; the list is plain data handed to the engine builder
/// before model load, never process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeBackend {
    Cpu,
    CpuNoAvx,
    Cuda,
    Vulkan,
    CoreMl,
    OpenVino,
}

impl RuntimeBackend {
    /// Parse a single backend name, case-insensitively.
    ///
    /// Returns `None` for unknown names; the caller decides whether that is
    /// an error (here it never is, see [`parse_backend_order`]).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "cpu" => Some(Self::Cpu),
            "cpunoavx" => Some(Self::CpuNoAvx),
            "cuda" => Some(Self::Cuda),
            "vulkan" => Some(Self::Vulkan),
            "coreml" => Some(Self::CoreMl),
            "openvino" => Some(Self::OpenVino),
            _ => None,
        }
    }

    /// Whether this backend runs inference on a GPU-class device.
    pub fn uses_gpu(self) -> bool {
        matches!(
            self,
            Self::Cuda | Self::Vulkan | Self::CoreMl | Self::OpenVino
        )
    }
}

impl fmt::Display for RuntimeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cpu => "Cpu",
            Self::CpuNoAvx => "CpuNoAvx",
            Self::Cuda => "Cuda",
            Self::Vulkan => "Vulkan",
            Self::CoreMl => "CoreML",
            Self::OpenVino => "OpenVino",
        };
        f.write_str(name)
    }
}

/// Parse a comma-separated backend preference list.
///
/// Unknown names are dropped, not rejected: the result keeps the recognized
/// backends in their given order, and an empty result simply means "use the
/// engine's own default order". We log each dropped token so the lenience is
/// visible without turning it into an error.
pub fn parse_backend_order(list: &str) -> Vec<RuntimeBackend> {
    let mut order = Vec::new();
    for token in list.split(',') {
        match RuntimeBackend::from_token(token) {
            Some(backend) => order.push(backend),
            None => tracing::warn!(token, "ignoring unknown runtime backend"),
        }
    }
    order
}
