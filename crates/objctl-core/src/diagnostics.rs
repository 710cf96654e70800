use crate::build_info;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError {
    #[error("hostname lookup failed: {0}")]
    Hostname(#[source] io::Error),
}

/// Point-in-time facts about the host and this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub platform: String,
    pub runtime: String,
    pub memory: String,
}

impl DiagnosticsSnapshot {
    /// Key/value pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("PLATFORM", self.platform.as_str()),
            ("RUNTIME", self.runtime.as_str()),
            ("MEM", self.memory.as_str()),
        ]
    }
}

/// Collect a fresh snapshot. Nothing is cached between calls.
pub fn collect() -> Result<DiagnosticsSnapshot, DiagnosticsError> {
    let host = hostname().map_err(DiagnosticsError::Hostname)?;

    let platform = format!(
        "Host: {} | OS: {} | Arch: {}",
        host,
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let runtime = format!(
        "Version: {} | Rust: {} | CPUs: {}",
        build_info::PKG_VERSION,
        build_info::RUSTC_VERSION,
        cpus
    );

    Ok(DiagnosticsSnapshot {
        platform,
        runtime,
        memory: memory_summary(),
    })
}

#[cfg(unix)]
fn hostname() -> io::Result<String> {
    let mut buf = [0u8; 256];
    // SAFETY: the buffer is valid for `buf.len()` bytes for the whole call.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let name = String::from_utf8_lossy(&buf[..len]).into_owned();
    if name.is_empty() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "empty hostname"));
    }
    Ok(name)
}

#[cfg(not(unix))]
fn hostname() -> io::Result<String> {
    std::env::var("COMPUTERNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "COMPUTERNAME is not set"))
}

#[cfg(target_os = "linux")]
fn memory_summary() -> String {
    match std::fs::read_to_string("/proc/self/status") {
        Ok(status) => format_proc_status(&status),
        Err(err) => format!("Unavailable ({})", err),
    }
}

#[cfg(not(target_os = "linux"))]
fn memory_summary() -> String {
    format!("Unavailable on {}", std::env::consts::OS)
}

/// Build the memory line from the `Vm*` fields of `/proc/<pid>/status`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn format_proc_status(status: &str) -> String {
    let field = |name: &str| -> Option<u64> {
        status.lines().find_map(|line| {
            let rest = line.strip_prefix(name)?.strip_prefix(':')?;
            let kib = rest.trim().strip_suffix("kB")?.trim();
            kib.parse::<u64>().ok().map(|v| v * 1024)
        })
    };
    let show = |value: Option<u64>| value.map(format_bytes).unwrap_or_else(|| "n/a".to_string());

    format!(
        "Resident: {} | PeakResident: {} | Virtual: {} | PeakVirtual: {}",
        show(field("VmRSS")),
        show(field("VmHWM")),
        show(field("VmSize")),
        show(field("VmPeak")),
    )
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
