#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "jpar-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn jpar(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jpar"))
        .current_dir(dir)
        .args(["--log-level", "error"])
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("jpar should run")
}

fn noise(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state as u8
        })
        .collect()
}

fn build_archive(dir: &Path) -> PathBuf {
    std::fs::write(dir.join("empty.txt"), b"").expect("write empty file");
    std::fs::write(dir.join("large.bin"), noise(70_000)).expect("write large file");

    let output = jpar(dir, &["-o", "out.jpg", "empty.txt", "large.bin"]);
    assert!(
        output.status.success(),
        "create failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    dir.join("out.jpg")
}

#[test]
fn create_then_dump_json() {
    let dir = unique_temp_dir("json");
    let archive = build_archive(&dir);

    let bytes = std::fs::read(&archive).expect("archive should exist");
    assert_eq!(&bytes[..4], &[0xFF, 0xD8, 0xFF, 0xE0]);

    let output = jpar(&dir, &["--format", "json", "dump", "out.jpg"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let entries: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be json"))
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "empty.txt");
    assert_eq!(entries[0]["size"], 0);
    assert_eq!(entries[1]["name"], "large.bin");
    assert_eq!(entries[1]["size"], 70_000);
    assert_eq!(entries[1]["kind"], "file");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn create_to_stdout_then_dump_pretty() {
    let dir = unique_temp_dir("pretty");
    std::fs::write(dir.join("hello.txt"), b"hello world").expect("write file");

    let output = jpar(&dir, &["hello.txt"]);
    assert!(output.status.success());
    std::fs::write(dir.join("piped.jpg"), &output.stdout).expect("write archive");

    let output = jpar(&dir, &["dump", "piped.jpg", "--format", "pretty"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let fields: Vec<&str> = stdout.trim_end().split('\t').collect();
    assert_eq!(fields.len(), 7);
    assert!(fields[0].starts_with('-'));
    assert_eq!(fields[1], "0");
    assert_eq!(fields[4], "11");
    assert_eq!(fields[6], "hello.txt");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_rejects_plain_file() {
    let dir = unique_temp_dir("plain");
    std::fs::write(dir.join("notes.txt"), b"just some text").expect("write file");

    let output = jpar(&dir, &["dump", "notes.txt"]);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dump_missing_archive_fails() {
    let dir = unique_temp_dir("missing");
    let output = jpar(&dir, &["dump", "absent.jpg"]);
    assert_eq!(output.status.code(), Some(1));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn no_input_files_is_usage_error() {
    let dir = unique_temp_dir("usage");
    let output = jpar(&dir, &[]);
    assert_eq!(output.status.code(), Some(64));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_package_version() {
    let dir = unique_temp_dir("version");
    let output = jpar(&dir, &["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("jpar {}", env!("CARGO_PKG_VERSION"))
    );

    let output = jpar(&dir, &["version", "--extended"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("framing_version: 1"));
    assert!(stdout.contains("segment_signature: JPAR"));
    let _ = std::fs::remove_dir_all(&dir);
}
