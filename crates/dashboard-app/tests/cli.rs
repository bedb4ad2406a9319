use assert_cmd::Command;
use dashboard_app::InstanceLock;
use dashboard_layout::{DashboardPaths, DashboardSettings};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::tempdir;

fn dashboard(paths: &DashboardPaths) -> Command {
    let mut cmd = Command::cargo_bin("dashboard").unwrap();
    cmd.env_remove("RUST_LOG").arg("--config-dir").arg(paths.root());
    cmd
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn first_launch_seeds_and_saves_layout() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());

    let shown = stdout(&mut dashboard(&paths));
    assert_eq!(shown, "notes_1\tnotes\t20,20\t240x160\n");

    let raw = std::fs::read_to_string(paths.layout_file()).unwrap();
    let layout: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        layout,
        serde_json::json!([{
            "instanceId": "notes_1",
            "pluginName": "notes",
            "x": 20,
            "y": 20,
            "width": 240,
            "height": 160
        }])
    );
    assert!(InstanceLock::try_acquire(&paths.lock_file()).unwrap().is_some());
}

#[test]
fn added_widgets_cascade_from_the_centre() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());

    let added = stdout(dashboard(&paths).args(["add", "notes", "notes"]));
    assert_eq!(
        added,
        "notes_2\tnotes\t520,280\t240x160\nnotes_3\tnotes\t550,310\t240x160\n"
    );

    stdout(dashboard(&paths).args(["remove", "notes_2"]));
    let shown = stdout(dashboard(&paths).arg("show"));
    assert_eq!(
        shown,
        "notes_1\tnotes\t20,20\t240x160\nnotes_3\tnotes\t550,310\t240x160\n"
    );
}

#[test]
fn settings_shape_the_canvas() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());
    stdout(dashboard(&paths).args(["move", "notes_1", "900", "600"]));

    let settings = DashboardSettings {
        canvas_width: 640,
        canvas_height: 480,
        ..DashboardSettings::default()
    };
    settings.save(&paths.settings_file()).unwrap();

    let shown = stdout(&mut dashboard(&paths));
    assert_eq!(shown, "notes_1\tnotes\t390,310\t240x160\n");
}

#[test]
fn second_instance_exits_with_failure() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());
    let _held = InstanceLock::try_acquire(&paths.lock_file()).unwrap().unwrap();

    dashboard(&paths).arg("show").assert().code(1).stdout("");
    assert!(!paths.layout_file().exists());
}

#[test]
fn unknown_instance_fails() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());
    dashboard(&paths).args(["remove", "clock_9"]).assert().failure();
}
