use std::process::Command;

const VERSION_ENV: &str = "AI_ASSISTANT_VERSION";

/// Strips a leading `v` from tags like `v1.2.3`, leaving names like `vnext` untouched.
fn strip_tag_prefix(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix('v') {
        Some(rest) if rest.starts_with(|ch: char| ch.is_ascii_digit()) => rest.to_string(),
        _ => trimmed.to_string(),
    }
}

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn resolve_version() -> String {
    let from_env = std::env::var(VERSION_ENV).ok();
    let from_git = || git_output(&["describe", "--tags", "--always", "--dirty"]);

    from_env
        .map(|value| strip_tag_prefix(&value))
        .filter(|value| !value.is_empty())
        .or_else(|| from_git().map(|value| strip_tag_prefix(&value)))
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
}

fn main() {
    println!("cargo:rerun-if-env-changed={VERSION_ENV}");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/packed-refs");

    println!(
        "cargo:rustc-env=AI_ASSISTANT_BUILD_VERSION={}",
        resolve_version()
    );
}
