//! Stamps the binary with the source revision and build time.
//!
//! Emits `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE`, read back by
//! `cinefuse_ingest::build_info`. Builds outside a git checkout get
//! `unknown` as the revision.

use std::path::Path;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    let revision = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!revision.is_empty()).then_some(revision)
}

fn main() {
    let revision = git_revision().unwrap_or_else(|| UNKNOWN.to_string());
    let built_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string());

    println!("cargo:rustc-env=GIT_HASH={}", revision);
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", built_at);
    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);

    println!("cargo:rerun-if-changed=build.rs");
    let head = Path::new("../.git/HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }
}
