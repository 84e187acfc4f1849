use assert_cmd::Command;
use predicates::prelude::*;

/// Runs the binary against `root`, with the user config directory moved
/// under `root/home` so a developer's own config cannot leak in.
fn picklist(root: &std::path::Path) -> Command {
    let home = root.join("home");
    let mut cmd = Command::cargo_bin("picklist").expect("binary exists");
    cmd.arg("--root")
        .arg(root)
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("PICKLIST_PICK_LIST_THRESHOLD")
        .env_remove("PICKLIST_SPLIT_ESCAPED_NEWLINES")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_displays_usage() {
    Command::cargo_bin("picklist")
        .expect("binary exists")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn status_without_session_asks_for_pick_list() {
    let temp = tempfile::tempdir().expect("tempdir");
    picklist(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan a pick-list first."));
}

#[test]
fn progress_survives_between_invocations() {
    let temp = tempfile::tempdir().expect("tempdir");

    picklist(temp.path())
        .args(["scan", r"SKU1 LOC1\nSKU2", "LOC1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK        line 1 picked"));

    assert!(temp.path().join(".picklist/session.json").exists());

    picklist(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("50% (1/2)").and(predicate::str::contains("SKU2")));

    picklist(temp.path())
        .arg("scan")
        .write_stdin("WRONG\nSKU2\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("MISMATCH")
                .and(predicate::str::contains("Pak de volgende pickbon.")),
        );
}

#[test]
fn reset_forgets_the_pick_list() {
    let temp = tempfile::tempdir().expect("tempdir");
    picklist(temp.path())
        .args(["load", "A\\nB"])
        .assert()
        .success();

    picklist(temp.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan a pick-list first."));
    assert!(!temp.path().join(".picklist/session.json").exists());
}

#[test]
fn undo_without_picks_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    picklist(temp.path()).args(["load", "A"]).assert().success();
    picklist(temp.path())
        .arg("undo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to undo"));
}

#[test]
fn workspace_config_changes_threshold() {
    let temp = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(temp.path().join(".picklist")).expect("config dir");
    std::fs::write(
        temp.path().join(".picklist/config.toml"),
        "[scan]\npick_list_threshold = 3\n",
    )
    .expect("write config");

    picklist(temp.path())
        .args(["scan", "ABCD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LOADED    pick-list with 1 line(s)"));
}

#[cfg(target_os = "linux")]
#[test]
fn global_config_is_read_from_isolated_home() {
    let temp = tempfile::tempdir().expect("tempdir");
    let global_dir = temp.path().join("home/.config/picklist");
    std::fs::create_dir_all(&global_dir).expect("global config dir");
    std::fs::write(
        global_dir.join("config.toml"),
        "[messages]\nno_pick_list = \"Scan eerst een pickbon.\"\n",
    )
    .expect("write global config");

    picklist(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan eerst een pickbon."));
}

#[test]
fn changed_split_setting_keeps_saved_list_shape() {
    let temp = tempfile::tempdir().expect("tempdir");
    picklist(temp.path())
        .args(["scan", r"SKU1\nSKU2\nSKU3 EXTRA", "SKU1"])
        .assert()
        .success();

    std::fs::create_dir_all(temp.path().join(".picklist")).expect("config dir");
    std::fs::write(
        temp.path().join(".picklist/config.toml"),
        "[scan]\nsplit_escaped_newlines = false\n",
    )
    .expect("write config");

    picklist(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("33% (1/3)").and(predicate::str::contains("SKU2")));
}
