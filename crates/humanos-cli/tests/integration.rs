#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Monday morning, inside the default wake and hydration windows.
const MONDAY_7AM: &str = "2025-01-06T07:00";
const TUESDAY_7AM: &str = "2025-01-07T07:00";

/// Nothing listens on the discard port, so fetches fail fast.
const UNREACHABLE_URL: &str = "http://127.0.0.1:9/routines.json";

fn humanos(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("humanos").unwrap();
    cmd.current_dir(dir.path())
        .env("HUMANOS_ROOT", dir.path())
        .env("HUMANOS_NOW", MONDAY_7AM)
        .env_remove("RUST_LOG");
    cmd
}

/// Point the catalog at an unreachable URL so commands use the bundled routines.
fn offline(dir: &TempDir) {
    humanos(dir)
        .args(["settings", "set-url", UNREACHABLE_URL])
        .assert()
        .success();
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

const REMOTE_CATALOG: &str = r#"{
  "routines": [
    {
      "id": "remote_stretch",
      "name": "Remote Stretch",
      "tags": ["remote"],
      "trigger": {
        "type": "time_window",
        "start": "06:00",
        "end": "09:00",
        "preferred": "07:30",
        "days": ["Monday"]
      },
      "steps": [{ "text": "Reach up" }]
    }
  ]
}"#;

// ---------------------------------------------------------------------------
// humanos today / week
// ---------------------------------------------------------------------------

#[test]
fn today_falls_back_to_bundled_routines_when_offline() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday, 2025-01-06"))
        .stdout(predicate::str::contains("wake_flow"))
        .stdout(predicate::str::contains("workout_session"))
        .stdout(predicate::str::contains("sunday_shower").not());

    assert!(dir.path().join(".humanos/storage.yaml").exists());
}

#[test]
fn today_json_marks_active_routines() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    let value = json_stdout(humanos(&dir).args(["today", "--json"]));
    assert_eq!(value["weekday"], "Monday");
    let routines = value["routines"].as_array().unwrap();
    let wake = routines.iter().find(|r| r["id"] == "wake_flow").unwrap();
    assert_eq!(wake["status"], "not_started");
    assert_eq!(wake["active"], true);
    let evening = routines
        .iter()
        .find(|r| r["id"] == "evening_wind_down")
        .unwrap();
    assert_eq!(evening["active"], false);
    assert_eq!(evening["nextUp"], true);
}

#[test]
fn today_uses_remote_catalog() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/routines.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REMOTE_CATALOG)
        .expect(1)
        .create();

    let dir = TempDir::new().unwrap();
    let url = format!("{}/routines.json", server.url());
    humanos(&dir)
        .args(["settings", "set-url", &url])
        .assert()
        .success();

    humanos(&dir)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("remote_stretch"))
        .stdout(predicate::str::contains("wake_flow").not());

    // Same day: served from the cache without a second request.
    humanos(&dir)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("remote_stretch"));

    mock.assert();
}

#[test]
fn week_lists_every_day() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .arg("week")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mon (today)"))
        .stdout(predicate::str::contains("Sun"))
        .stdout(predicate::str::contains("Full Shower Ritual [sunday_shower]"));

    let value = json_stdout(humanos(&dir).args(["week", "--json"]));
    let days = value.as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["day"], "Monday");
    assert_eq!(days[0]["today"], true);
    assert_eq!(days[6]["day"], "Sunday");
}

#[test]
fn refresh_reports_loaded_count() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .arg("refresh")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 5 routine(s)"));
}

// ---------------------------------------------------------------------------
// humanos status
// ---------------------------------------------------------------------------

#[test]
fn status_set_then_get() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .args(["status", "set", "wake_flow", "completed"])
        .assert()
        .success();

    humanos(&dir)
        .args(["status", "get", "wake_flow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wake_flow: completed (2025-01-06)"));
}

#[test]
fn status_resets_on_a_new_day() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .args(["status", "set", "wake_flow", "completed"])
        .assert()
        .success();

    let value = json_stdout(
        humanos(&dir)
            .env("HUMANOS_NOW", TUESDAY_7AM)
            .args(["status", "get", "wake_flow", "--json"]),
    );
    assert_eq!(value["status"], "not_started");

    let value = json_stdout(humanos(&dir).env("HUMANOS_NOW", TUESDAY_7AM).args([
        "status",
        "get",
        "wake_flow",
        "--date",
        "2025-01-06",
        "--json",
    ]));
    assert_eq!(value["status"], "completed");
}

#[test]
fn status_set_rejects_unknown_routine() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .args(["status", "set", "no_such_routine", "completed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("routine not found: no_such_routine"));
}

#[test]
fn status_set_rejects_bad_status() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .args(["status", "set", "wake_flow", "done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid status 'done'"));
}

#[test]
fn status_clear_today_forgets_today() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .args(["status", "set", "wake_flow", "in_progress"])
        .assert()
        .success();
    humanos(&dir)
        .args(["status", "clear-today"])
        .assert()
        .success();
    humanos(&dir)
        .args(["status", "get", "wake_flow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not_started"));
}

#[test]
fn status_get_for_past_day_keeps_flat_statuses_on_today() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".humanos")).unwrap();
    std::fs::write(
        dir.path().join(".humanos/storage.yaml"),
        concat!(
            "humanos_json_url: 'http://127.0.0.1:9/routines.json'\n",
            "humanos_last_reset_date: '2025-01-06'\n",
            "humanos_routine_status: '{\"wake_flow\":\"completed\"}'\n",
        ),
    )
    .unwrap();

    humanos(&dir)
        .args(["status", "get", "wake_flow", "--date", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wake_flow: not_started (2025-01-01)"));

    humanos(&dir)
        .args(["status", "get", "wake_flow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wake_flow: completed (2025-01-06)"));
}

#[test]
fn status_clear_commands_print_json() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    let value = json_stdout(humanos(&dir).args(["status", "clear-today", "--json"]));
    assert_eq!(value["cleared"], "2025-01-06");

    let value = json_stdout(humanos(&dir).args(["status", "reset", "--json"]));
    assert_eq!(value["cleared"], "all");
}

// ---------------------------------------------------------------------------
// humanos run
// ---------------------------------------------------------------------------

#[test]
fn run_through_every_step_completes() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .args(["run", "wake_flow"])
        .write_stdin("\n\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 1 of 4"))
        .stdout(predicate::str::contains("Completed Morning Wake Flow"));

    humanos(&dir)
        .args(["status", "get", "wake_flow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));
}

#[test]
fn run_quit_after_first_step_is_in_progress() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    let value = json_stdout(
        humanos(&dir)
            .args(["run", "wake_flow", "--json"])
            .write_stdin("n\nq\n"),
    );
    assert_eq!(value["outcome"], "partial");
    assert_eq!(value["status"], "in_progress");
}

#[test]
fn run_quit_immediately_leaves_status_alone() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .args(["run", "wake_flow"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));

    humanos(&dir)
        .args(["status", "get", "wake_flow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not_started"));
}

#[test]
fn run_unknown_routine_fails() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .args(["run", "ghost"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("routine not found: ghost"));
}

// ---------------------------------------------------------------------------
// humanos settings / cache / catalog
// ---------------------------------------------------------------------------

#[test]
fn settings_show_default_url() {
    let dir = TempDir::new().unwrap();

    humanos(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(default)"))
        .stdout(predicate::str::contains("developer mode: off"));
}

#[test]
fn settings_rejects_non_http_url() {
    let dir = TempDir::new().unwrap();

    humanos(&dir)
        .args(["settings", "set-url", "ftp://example.com/routines.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid source url"));
}

#[test]
fn catalog_import_requires_developer_mode() {
    let dir = TempDir::new().unwrap();
    offline(&dir);
    let file = dir.path().join("catalog.json");
    std::fs::write(&file, REMOTE_CATALOG).unwrap();

    humanos(&dir)
        .args(["catalog", "import"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("developer mode is off"));

    humanos(&dir)
        .args(["settings", "developer", "on"])
        .assert()
        .success();

    humanos(&dir)
        .args(["catalog", "import"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 routine(s)"));

    humanos(&dir)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("remote_stretch"));

    humanos(&dir)
        .args(["catalog", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"remote_stretch\""));
}

#[test]
fn catalog_import_refuses_duplicate_ids() {
    let dir = TempDir::new().unwrap();
    offline(&dir);
    humanos(&dir)
        .args(["settings", "developer", "on"])
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_str(REMOTE_CATALOG).unwrap();
    let routine = value["routines"][0].clone();
    let file = dir.path().join("dupes.json");
    std::fs::write(
        &file,
        serde_json::to_string(&serde_json::json!([routine.clone(), routine])).unwrap(),
    )
    .unwrap();

    humanos(&dir)
        .args(["catalog", "import"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid catalog"));
}

#[test]
fn catalog_validate_bundled_is_clean() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    humanos(&dir)
        .args(["catalog", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog OK (5 routines)"));
}

#[test]
fn cache_clear_forces_refetch() {
    let dir = TempDir::new().unwrap();
    offline(&dir);
    humanos(&dir)
        .args(["settings", "developer", "on"])
        .assert()
        .success();
    let file = dir.path().join("catalog.json");
    std::fs::write(&file, REMOTE_CATALOG).unwrap();
    humanos(&dir)
        .args(["catalog", "import"])
        .arg(&file)
        .assert()
        .success();

    humanos(&dir).args(["cache", "clear"]).assert().success();

    // The imported catalog is gone; the unreachable source falls back to defaults.
    humanos(&dir)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("remote_stretch").not())
        .stdout(predicate::str::contains("wake_flow"));
}

#[test]
fn cache_clear_prints_json() {
    let dir = TempDir::new().unwrap();
    offline(&dir);

    let value = json_stdout(humanos(&dir).args(["cache", "clear", "--json"]));
    assert_eq!(value["cleared"], "routines");
}

#[test]
fn bad_now_exits_with_usage_error() {
    let dir = TempDir::new().unwrap();

    humanos(&dir)
        .env("HUMANOS_NOW", "yesterday")
        .arg("today")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid --now value"));
}
