use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=OBJCTL_RELEASE_TAG");
    println!("cargo:rerun-if-env-changed=RUSTC");

    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".into());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=OBJCTL_RUSTC_VERSION={version}");

    if let Ok(tag) = env::var("OBJCTL_RELEASE_TAG") {
        println!("cargo:rustc-env=OBJCTL_RELEASE_TAG={tag}");
    }
}
