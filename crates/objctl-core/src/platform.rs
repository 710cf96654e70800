const SUPPORTED_OS: &[&str] = &[
    "linux",
    "macos",
    "windows",
    "freebsd",
    "netbsd",
    "openbsd",
    "dragonfly",
    "solaris",
    "illumos",
];

const SUPPORTED_ARCH: &[&str] = &[
    "x86",
    "x86_64",
    "arm",
    "aarch64",
    "powerpc64",
    "s390x",
    "riscv64",
    "loongarch64",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("unsupported operating system '{os}'")]
    UnsupportedOs { os: String },

    #[error("unsupported architecture '{arch}' on {os}")]
    UnsupportedArch { os: String, arch: String },

    #[error("unsupported pointer width {bits}-bit on {os}/{arch}")]
    UnsupportedPointerWidth { os: String, arch: String, bits: u32 },
}

/// Facts about the executing environment that decide whether objctl can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub os: String,
    pub arch: String,
    pub pointer_width: u32,
}

impl RuntimeInfo {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            pointer_width: usize::BITS,
        }
    }
}

/// Reject platforms objctl is not built and tested for.
///
/// This check has to pass before the config folder is touched: on an
/// unsupported platform there may be no sane config path at all.
pub fn verify_runtime_compatibility(info: &RuntimeInfo) -> Result<(), PlatformError> {
    if !SUPPORTED_OS.contains(&info.os.as_str()) {
        return Err(PlatformError::UnsupportedOs {
            os: info.os.clone(),
        });
    }

    if !SUPPORTED_ARCH.contains(&info.arch.as_str()) {
        return Err(PlatformError::UnsupportedArch {
            os: info.os.clone(),
            arch: info.arch.clone(),
        });
    }

    if !matches!(info.pointer_width, 32 | 64) {
        return Err(PlatformError::UnsupportedPointerWidth {
            os: info.os.clone(),
            arch: info.arch.clone(),
            bits: info.pointer_width,
        });
    }

    Ok(())
}
