use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn cmdargs() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cmdargs"))
}

fn run(args: &[&str]) -> Output {
    cmdargs()
        .args(args)
        .output()
        .expect("failed to run cmdargs")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = cmdargs()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn cmdargs");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait on cmdargs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Minimal parse profile YAML for testing.
fn write_profile(dir: &Path) -> PathBuf {
    let yaml = r#"
contexts:
  attack: "-d 1d6 -b 2"
defaults:
  level: "1"
  name: null
ignore:
  - debug
"#;
    let path = dir.join("profile.yaml");
    fs::write(&path, yaml).expect("failed to write profile");
    path
}

// ---------------------------------------------------------------------------
// split
// ---------------------------------------------------------------------------

#[test]
fn split_prints_json_words() {
    let out = run(&["split", "--", r#"-name "Bob the Bold" don't"#]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let words: Vec<String> = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(words, vec!["-name", "Bob the Bold", "don't"]);
}

#[test]
fn split_reads_stdin_and_requotes() {
    let out = run_with_stdin(&["split", "--format", "shell"], r#"a «b c» "d \"e\"""#);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).trim(), r#"a "b c" "d \"e\"""#);
}

#[test]
fn split_reports_unterminated_quote() {
    let out = run(&["split", r#""never closed"#]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("expected closing quote"));
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_prints_flag_mapping() {
    let out = run(&["parse", "--", "-a 1 -a 2 -v"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["a"], serde_json::json!(["1", "2"]));
    assert_eq!(json["v"], serde_json::json!([true]));
    assert_eq!(json["1"], serde_json::json!([true]));
}

#[test]
fn parse_applies_profile_and_context() {
    let dir = tempfile::tempdir().unwrap();
    let profile = write_profile(dir.path());

    let out = run(&[
        "parse",
        "--profile",
        profile.to_str().unwrap(),
        "--context",
        "attack",
        "--",
        "-b 1 -debug",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["b"], serde_json::json!(["1", "2"]));
    assert_eq!(json["d"], serde_json::json!(["1d6"]));
    assert_eq!(json["level"], serde_json::json!(["1"]));
    assert!(json.get("debug").is_none());
    assert!(json.get("name").is_none());
}

#[test]
fn parse_rejects_unknown_context() {
    let out = run(&["parse", "--context", "nope", "--", "-b 1"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Unknown context 'nope'"));
}

#[test]
fn parse_reports_missing_profile() {
    let out = run(&["parse", "--profile", "/nonexistent/profile.yaml", "--", "-b 1"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Failed to load profile"));
}

// ---------------------------------------------------------------------------
// query
// ---------------------------------------------------------------------------

#[test]
fn query_reads_typed_values() {
    let out = run(&["query", "level", "--type", "int", "--", "-level 3 -level 5"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "[3,5]");

    let out = run(&["query", "level", "--type", "int", "--last", "--", "-level 3 -level 5"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "5");
}

#[test]
fn query_reports_invalid_argument() {
    let out = run(&["query", "level", "--type", "int", "--last", "--", "-level high"]);
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("`high`"), "stderr: {err}");
    assert!(err.contains("`level`"), "stderr: {err}");
}

#[test]
fn query_falls_back_to_default() {
    let out = run(&["query", "name", "--default", "Anonymous", "--", "-level 3"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "Anonymous");

    let out = run(&["query", "name", "--", "-level 3"]);
    assert!(!out.status.success());
}

#[test]
fn query_reads_boolean_flags() {
    let out = run(&["query", "verbose", "--type", "bool", "--last", "--", "-verbose"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "true");
}

// ---------------------------------------------------------------------------
// repl
// ---------------------------------------------------------------------------

#[test]
fn repl_splits_each_line_and_survives_errors() {
    let out = run_with_stdin(&["repl"], "a \"b c\"\n\"open\nd\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], r#"["a", "b c"]"#);
    assert!(lines[1].contains("expected closing quote"));
    assert_eq!(lines[2], r#"["d"]"#);
}
