//! Structural tests for layer boundaries.
//!
//! These scan source files so a stray import fails the build's tests rather
//! than a code review.

use std::path::{Path, PathBuf};

fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Non-comment lines before the first `#[cfg(test)]`.
fn production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .take_while(|l| !l.contains("#[cfg(test)]"))
        .filter(|l| {
            let t = l.trim();
            !t.starts_with("//") && !t.starts_with("/*") && !t.starts_with('*')
        })
        .map(String::from)
        .collect()
}

fn src(sub: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(sub)
}

fn violations(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (i, line) in production_lines(&file).iter().enumerate() {
            for needle in forbidden {
                if line.contains(needle) {
                    found.push(format!("{rel}:{}: {line}", i + 1));
                }
            }
        }
    }
    found
}

#[test]
fn domain_is_pure() {
    let found = violations(
        &src("domain"),
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::fs",
            "std::process",
            "reqwest",
        ],
    );
    assert!(found.is_empty(), "domain/ reaches outside itself:\n{}", found.join("\n"));
}

#[test]
fn application_does_not_depend_on_adapters() {
    let found = violations(
        &src("application"),
        &["crate::infra", "crate::commands", "crate::output", "reqwest", "std::process::Command"],
    );
    assert!(
        found.is_empty(),
        "application/ must go through ports:\n{}",
        found.join("\n")
    );
}

#[test]
fn processes_are_spawned_only_by_infra() {
    let mut found = Vec::new();
    for dir in ["commands", "application", "output", "domain"] {
        found.extend(violations(
            &src(dir),
            &["TokioCommandRunner::new", "Command::new(", "reqwest::Client"],
        ));
    }
    assert!(
        found.is_empty(),
        "process and HTTP clients are built in infra/ or app.rs only:\n{}",
        found.join("\n")
    );
}

#[test]
fn commands_do_not_take_json_flags() {
    let found = violations(&src("commands"), &["json: bool", "if json", "if !json"]);
    assert!(
        found.is_empty(),
        "use app.is_json() and the renderer instead:\n{}",
        found.join("\n")
    );
}
