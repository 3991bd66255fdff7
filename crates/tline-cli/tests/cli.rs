//! Runs the `tline` binary in an isolated config home

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs the binary with an isolated config directory
struct TestContext {
    temp_dir: TempDir,
    config_home: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config_home = temp_dir.path().join(".config");
        std::fs::create_dir_all(&config_home).expect("failed to create config home");
        Self {
            temp_dir,
            config_home,
        }
    }

    fn tline_cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tline"));
        cmd.env("HOME", self.temp_dir.path());
        cmd.env("XDG_CONFIG_HOME", &self.config_home);
        cmd.env_remove("TLINE_FPS");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn write_default_config(&self, contents: &str) {
        let dir = self.config_home.join("tline");
        std::fs::create_dir_all(&dir).expect("failed to create tline config dir");
        std::fs::write(dir.join("config.toml"), contents).expect("failed to write config");
    }

    fn run(&self, args: &[&str]) -> Output {
        self.tline_cmd()
            .args(args)
            .output()
            .expect("failed to run tline")
    }
}

const QUICK_DEMO: &[&str] = &["demo", "--steps", "3", "--delay-ms", "0"];

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("demo"));
}

#[test]
fn test_version_command() {
    let ctx = TestContext::new();
    assert!(ctx.run(&["--version"]).status.success());
}

#[test]
fn test_redirected_demo_prints_final_line() {
    let ctx = TestContext::new();
    let output = ctx.run(&["demo", "--steps", "3", "--delay-ms", "0", "--label", "copying"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    // Piped stdout never animates, so exactly one line comes out
    assert_eq!(stdout.lines().count(), 1, "stdout: {stdout:?}");
    assert!(stdout.contains("finished"));
    assert!(stdout.contains("Done - 00:00:0"));
    assert!(stdout.contains("3/3"));
    assert!(!stdout.contains('\u{1b}'), "no escape codes when redirected");
}

#[test]
fn test_demo_rejects_zero_steps() {
    let ctx = TestContext::new();
    let output = ctx.run(&["demo", "--steps", "0"]);
    assert!(!output.status.success());
}

#[test]
fn test_explicit_config_file() {
    let ctx = TestContext::new();
    let path = ctx.temp_dir.path().join("fast.toml");
    std::fs::write(&path, "fps = 60.0\nhide_cursor = false\n").unwrap();

    let mut args = vec!["--config", path.to_str().unwrap()];
    args.extend_from_slice(QUICK_DEMO);
    let output = ctx.run(&args);
    assert!(output.status.success());
}

#[test]
fn test_default_config_location_is_read() {
    let ctx = TestContext::new();
    ctx.write_default_config("fps = -1.0\n");

    let output = ctx.run(QUICK_DEMO);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load config"), "stderr: {stderr}");
}

#[test]
fn test_malformed_config_reports_path() {
    let ctx = TestContext::new();
    let path = ctx.temp_dir.path().join("broken.toml");
    std::fs::write(&path, "fps = \"fast\"\n").unwrap();

    let mut args = vec!["--config", path.to_str().unwrap()];
    args.extend_from_slice(QUICK_DEMO);
    let output = ctx.run(&args);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.toml"), "stderr: {stderr}");
}

#[test]
fn test_fps_env_override_is_validated() {
    let ctx = TestContext::new();
    let output = ctx.tline_cmd().env("TLINE_FPS", "0").args(QUICK_DEMO).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--fps"), "stderr: {stderr}");
}

#[test]
fn test_out_of_range_fps_rejected() {
    let ctx = TestContext::new();
    for fps in ["1e-30", "1e12"] {
        let mut args = vec!["--fps", fps];
        args.extend_from_slice(QUICK_DEMO);
        let output = ctx.run(&args);
        assert!(!output.status.success(), "fps {fps} accepted");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("--fps"), "stderr: {stderr}");
        assert!(!stderr.contains("panicked"), "stderr: {stderr}");
    }
}

#[test]
fn test_completions_for_bash() {
    let ctx = TestContext::new();
    let output = ctx.run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("tline"));
}
