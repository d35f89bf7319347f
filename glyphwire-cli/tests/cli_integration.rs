use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestDir {
    path: PathBuf,
}

impl TestDir {
    fn new(tag: &str) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let path = std::env::temp_dir().join(format!(
            "glyphwire_cli_{tag}_{}_{}",
            std::process::id(),
            ts
        ));
        fs::create_dir_all(&path).expect("create temp test dir");
        Self { path }
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_glyphwire(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_glyphwire"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("run glyphwire")
}

#[test]
fn renders_svg_from_font_file() {
    let dir = TestDir::new("render");
    let font_path = dir.path.join("micro.ttf");
    fs::write(&font_path, glyphwire_testfonts::micro()).expect("write fixture font");

    let output = run_glyphwire(&["micro.ttf", "Ao", "-o", "preview.svg"], &dir.path);
    assert!(output.status.success(), "process failed: {output:?}");

    let svg_path = dir.path.join("preview.svg");
    assert!(svg_path.is_file(), "expected output at {svg_path:?}");
    let svg = fs::read_to_string(svg_path).expect("read svg output");
    assert!(svg.contains("<svg"), "expected svg root element");
    assert!(svg.contains("path"), "expected rendered path element");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Wrote"), "expected summary, got: {stderr}");
}

#[test]
fn reports_parse_failures_and_exits_nonzero() {
    let dir = TestDir::new("badfont");
    let font_path = dir.path.join("junk.ttf");
    fs::write(&font_path, b"not a font").expect("write junk");

    let output = run_glyphwire(&["junk.ttf", "A"], &dir.path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error parsing"), "stderr: {stderr}");
}

#[test]
fn truncated_font_reports_truncation() {
    let dir = TestDir::new("truncated");
    let full = glyphwire_testfonts::micro();
    let font_path = dir.path.join("cut.ttf");
    fs::write(&font_path, &full[..full.len() / 2]).expect("write cut font");

    let output = run_glyphwire(&["cut.ttf", "A"], &dir.path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("past end of font data"),
        "stderr: {stderr}"
    );
}

#[test]
fn missing_arguments_prints_usage() {
    let dir = TestDir::new("usage");
    let output = run_glyphwire(&[], &dir.path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage:"), "stderr: {stderr}");
}
