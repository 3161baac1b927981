mod common;

use common::Project;

#[test]
fn first_run_stamps_every_file_and_writes_state() {
    let project = Project::new();
    project.write("src/App.cs", "class App {}\n");
    project.write("src/Util.cs", "static class Util {}\n");
    project.write("README.md", "# not tracked\n");

    let stdout = project.run_ok(&[]);
    assert!(stdout.contains("src/App.cs -> 1.0.0.0"));
    assert!(stdout.contains("processed 2, updated 2"));
    assert_eq!(project.read("src/App.cs"), "// Version: 1.0.0.0\nclass App {}\n");
    assert_eq!(project.read("README.md"), "# not tracked\n");

    let hashes: serde_json::Value =
        serde_json::from_str(&project.read("hashes.json")).expect("parse hashes.json");
    assert_eq!(hashes.as_object().map(|map| map.len()), Some(2));

    let history = project.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["oldVersion"], "none");
    assert_eq!(history[0]["newVersion"], "1.0.0.0");
    assert_eq!(history[0]["type"], "auto");

    let report = project.read("version_report.txt");
    assert!(report.contains("Files processed: 2\n"));
    assert!(report.contains("Files updated: 2\n"));
    assert!(report.contains("Average version: 1.0.0.0\n"));
}

#[test]
fn rerun_without_changes_updates_nothing() {
    let project = Project::new();
    project.write("a.cs", "class A {}\n");
    project.run_ok(&[]);

    let stdout = project.run_ok(&[]);
    assert!(stdout.contains("processed 1, updated 0, unchanged 1"));
    assert_eq!(project.history().len(), 1);
}

#[test]
fn increment_mode_and_maxima_drive_bumps() {
    let project = Project::new();
    project.write("a.cs", "// Version: 1.2.3.9\nclass A {}\n");
    project.run_ok(&["--increment", "build", "--max-build", "3"]);
    assert_eq!(project.read("a.cs"), "// Version: 1.3.0.0\nclass A {}\n");
}

#[test]
fn set_version_forces_clamped_manual_version() {
    let project = Project::new();
    project.write("a.cs", "class A {}\n");
    project.run_ok(&[]);

    project.run_ok(&["--set-version", "5.200.3.1"]);
    assert_eq!(project.read("a.cs"), "// Version: 5.99.3.1\nclass A {}\n");
    let history = project.history();
    let last = history.last().expect("history entry");
    assert_eq!(last["type"], "manual");
    assert_eq!(last["oldVersion"], "1.0.0.0");
}

#[test]
fn partial_override_on_target_only() {
    let project = Project::new();
    project.write("a.cs", "// Version: 2.4.6.8\nclass A {}\n");
    project.write("b.cs", "// Version: 2.4.6.8\nclass B {}\n");
    project.run_ok(&[]);

    project.run_ok(&["--target", "a.cs", "--set-minor", "7"]);
    assert_eq!(project.read("a.cs"), "// Version: 2.7.6.9\nclass A {}\n");
    assert_eq!(project.read("b.cs"), "// Version: 2.4.6.9\nclass B {}\n");
}

#[test]
fn ignore_file_excludes_matches() {
    let project = Project::new();
    project.write("custom.ignore", "# skip generated\n/regex:\\.g\\.cs$\n");
    project.write("Form.g.cs", "partial class Form {}\n");
    project.write("Form.cs", "partial class Form {}\n");

    let stdout = project.run_ok(&["--ignore-file", "custom.ignore"]);
    assert!(stdout.contains("ignored 1"));
    assert_eq!(project.read("Form.g.cs"), "partial class Form {}\n");
    assert_eq!(
        project.read("Form.cs"),
        "// Version: 1.0.0.0\npartial class Form {}\n"
    );
}

#[test]
fn configuration_errors_fail_before_touching_files() {
    let project = Project::new();
    project.write("a.cs", "class A {}\n");

    for args in [
        vec!["--extensions", "cs"],
        vec!["--set-version", "1.x"],
        vec!["--max-revision", "1000"],
        vec!["--set-version", "1.0", "--target", "a.cs"],
        vec!["--target-version", "1.0"],
    ] {
        let output = project.run(&args);
        assert!(!output.status.success(), "{args:?} should fail");
        assert_eq!(project.read("a.cs"), "class A {}\n");
        assert!(!project.path("hashes.json").exists());
    }
}

#[test]
fn strict_mode_fails_when_a_file_cannot_be_read() {
    let project = Project::new();
    std::fs::write(project.path("bad.cs"), [0xffu8, 0xfe, 0x00]).expect("write binary");
    project.write("good.cs", "class Good {}\n");

    let lenient = project.run(&["--dry-run"]);
    assert!(lenient.status.success());

    let strict = project.run(&["--strict"]);
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("could not be processed"));
    assert_eq!(project.read("good.cs"), "// Version: 1.0.0.0\nclass Good {}\n");
    assert!(project.read("version_report.txt").contains("bad.cs !! "));
}
