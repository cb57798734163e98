use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_toastr(script: &str, config_dir: &std::path::Path) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_toastr"))
        .arg("run")
        .env("XDG_CONFIG_HOME", config_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn toastr");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for output")
}

fn write_config(config_dir: &std::path::Path, content: &str) {
    let config_path = config_dir.join("toastr").join("config.toml");
    std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    std::fs::write(config_path, content).unwrap();
}

fn parse_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap()
}

#[test]
fn single_toast_becomes_active_after_tick() {
    let config_dir = tempfile::tempdir().unwrap();

    let script = r#"
{"op":"success","message":"Saved","title":"Profile"}
{"op":"tick"}
"#;
    let output = run_toastr(script, config_dir.path());
    assert!(output.status.success());

    let result = parse_stdout(&output);
    assert_eq!(result["success"], true);
    assert_eq!(result["outcomes"][0]["result"], "created");
    assert_eq!(result["outcomes"][0]["toastId"], 0);
    assert_eq!(result["currentlyActive"], 1);

    let pane = &result["panes"][0];
    assert_eq!(pane["positionClass"], "toast-top-right");
    assert_eq!(pane["toasts"][0]["title"], "Profile");
    assert_eq!(pane["toasts"][0]["toastType"], "toast-success");
    assert_eq!(pane["toasts"][0]["state"], "active");
}

#[test]
fn max_opened_from_config_queues_third_toast() {
    let config_dir = tempfile::tempdir().unwrap();
    write_config(
        config_dir.path(),
        r#"
[toastr]
max_opened = 2
"#,
    );

    let script = r#"
{"op":"info","message":"A"}
{"op":"tick"}
{"op":"info","message":"B"}
{"op":"tick"}
{"op":"info","message":"C"}
{"op":"tick"}
"#;
    let output = run_toastr(script, config_dir.path());
    assert!(output.status.success());

    let result = parse_stdout(&output);
    assert_eq!(result["currentlyActive"], 2);
    let states: Vec<_> = result["toasts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["state"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(states, vec!["active", "active", "inactive"]);
}

#[test]
fn auto_dismiss_burst_leaves_newest_active() {
    let config_dir = tempfile::tempdir().unwrap();
    write_config(
        config_dir.path(),
        r#"
[toastr]
max_opened = 1
auto_dismiss = true
"#,
    );

    let script = r#"
{"op":"info","message":"A"}
{"op":"tick"}
{"op":"info","message":"B"}
{"op":"info","message":"C"}
{"op":"tick"}
{"op":"tick"}
"#;
    let output = run_toastr(script, config_dir.path());
    assert!(output.status.success());

    let result = parse_stdout(&output);
    assert_eq!(result["currentlyActive"], 1);
    let toasts = result["toasts"].as_array().unwrap();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0]["message"], "C");
    assert_eq!(toasts[0]["state"], "active");
}

#[test]
fn newest_toast_is_rendered_on_top() {
    let config_dir = tempfile::tempdir().unwrap();

    let script = r#"
{"op":"info","message":"first"}
{"op":"info","message":"second"}
"#;
    let output = run_toastr(script, config_dir.path());
    let result = parse_stdout(&output);
    let pane = &result["panes"][0]["toasts"];
    assert_eq!(pane[0]["message"], "second");
    assert_eq!(pane[1]["message"], "first");
}

#[test]
fn duplicates_suppressed_when_configured() {
    let config_dir = tempfile::tempdir().unwrap();
    write_config(
        config_dir.path(),
        r#"
[toastr]
prevent_duplicates = true
"#,
    );

    let script = r#"
{"op":"error","message":"Connection lost"}
{"op":"error","message":"Connection lost"}
"#;
    let output = run_toastr(script, config_dir.path());
    let result = parse_stdout(&output);
    assert_eq!(result["outcomes"][1]["result"], "suppressed");
    assert_eq!(result["toasts"].as_array().unwrap().len(), 1);
}

#[test]
fn time_out_expires_toast() {
    let config_dir = tempfile::tempdir().unwrap();

    let script = r#"
{"op":"info","message":"short","options":{"time_out":100}}
{"op":"info","message":"sticky","options":{"time_out":0}}
{"op":"tick"}
{"op":"tick","advance_ms":100}
"#;
    let output = run_toastr(script, config_dir.path());
    let result = parse_stdout(&output);
    let toasts = result["toasts"].as_array().unwrap();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0]["message"], "sticky");
    assert_eq!(result["currentlyActive"], 1);
}

#[test]
fn invalid_step() {
    let config_dir = tempfile::tempdir().unwrap();

    let output = run_toastr("{\"op\":\"info\"", config_dir.path());
    assert!(output.status.success(), "should exit 0 even on invalid JSON");

    let result = parse_stdout(&output);
    assert_eq!(result["success"], false);
    assert!(result["error"]
        .as_str()
        .unwrap()
        .contains("Failed to parse step on line 1"));
    assert!(result.get("outcomes").is_none());
}

#[test]
fn show_command_prints_one_active_toast() {
    let config_dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_toastr"))
        .args(["show", "--severity", "warning", "--title", "Disk", "Almost full"])
        .env("XDG_CONFIG_HOME", config_dir.path())
        .output()
        .expect("Failed to run toastr");
    assert!(output.status.success());

    let result = parse_stdout(&output);
    assert_eq!(result["currentlyActive"], 1);
    assert_eq!(result["panes"][0]["toasts"][0]["toastType"], "toast-warning");
    assert_eq!(result["panes"][0]["toasts"][0]["message"], "Almost full");
}

#[test]
fn show_rejects_unknown_severity() {
    let config_dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_toastr"))
        .args(["show", "--severity", "fatal", "oops"])
        .env("XDG_CONFIG_HOME", config_dir.path())
        .output()
        .expect("Failed to run toastr");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid severity"));
}
