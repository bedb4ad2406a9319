use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use dashboard_canvas::{CanvasController, FrameEvent, LayoutState};
use dashboard_layout::{DashboardPaths, InstanceDataStore, LayoutRecord, LayoutStore};
use dashboard_plugin_host::{DylibLoader, LoadedWidget, PluginRegistry, WidgetDirectory};
use dashboard_widget_notes::NotesWidget;
use dashboard_widget_sdk::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::tempdir;

const CANVAS: Size = Size::new(1024, 768);

struct Tile {
    name: String,
    calls: Rc<RefCell<Vec<&'static str>>>,
}

struct Blank;

impl WidgetContent for Blank {
    fn render(&self, _size: Size) -> String {
        String::new()
    }
}

impl WidgetCapability for Tile {
    fn metadata(&self) -> WidgetMetadata {
        WidgetMetadata::new(self.name.clone(), Size::new(160, 120))
            .with_size_limits(Size::new(80, 60), Size::new(480, 360))
    }

    fn create_content(&self, _host: &HostSurface) -> Box<dyn WidgetContent> {
        self.calls.borrow_mut().push("create_content");
        Box::new(Blank)
    }

    fn serialize(&self) -> WidgetState {
        WidgetState::new()
    }

    fn deserialize(&self, _state: &WidgetState) {
        self.calls.borrow_mut().push("deserialize");
    }
}

fn directory(plugin_dir: &std::path::Path) -> WidgetDirectory {
    let mut registry = PluginRegistry::with_loader(Box::new(DylibLoader));
    registry.add_search_path(plugin_dir);
    WidgetDirectory::new(registry)
}

fn tile(name: &str) -> LoadedWidget {
    LoadedWidget::builtin(Box::new(Tile {
        name: name.into(),
        calls: Rc::default(),
    }))
}

fn read_layout(paths: &DashboardPaths) -> Value {
    let raw = fs::read_to_string(paths.layout_file()).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn empty_install_writes_empty_layout() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path().join("config"));
    let plugins = dir.path().join("plugins");
    fs::create_dir_all(&plugins).unwrap();

    let mut directory = directory(&plugins);
    let report = directory.load_plugins();
    assert!(report.widgets.is_empty());
    assert!(report.errors.is_empty());

    let mut canvas = CanvasController::with_paths(directory, &paths, CANVAS);
    let outcome = canvas.restore_layout();
    assert!(outcome.first_run);
    assert!(canvas.instances().is_empty());

    canvas.shutdown();
    assert_eq!(read_layout(&paths), json!([]));
}

#[test]
fn single_plugin_first_run() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());
    let mut directory = directory(&dir.path().join("plugins"));
    directory.register(tile("alpha"));

    let mut canvas = CanvasController::with_paths(directory, &paths, CANVAS);
    canvas.restore_layout();

    let alpha = canvas.instance("alpha_1").unwrap();
    assert_eq!(alpha.frame().position(), Point::new(20, 20));
    assert_eq!(
        read_layout(&paths),
        json!([{
            "instanceId": "alpha_1",
            "pluginName": "alpha",
            "x": 20,
            "y": 20,
            "width": 160,
            "height": 120
        }])
    );
}

#[test]
fn missing_plugin_record_survives_mutation() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());
    let mut seeded = LayoutStore::new();
    seeded.add("ghost", Point::new(300, 300), Size::new(200, 200));
    seeded.add("alpha", Point::new(40, 40), Size::new(160, 120));
    seeded.save_to_file(&paths.layout_file());

    let mut directory = directory(&dir.path().join("plugins"));
    directory.register(tile("alpha"));
    let mut canvas = CanvasController::with_paths(directory, &paths, CANVAS);
    canvas.restore_layout();

    assert_eq!(canvas.instances().len(), 1);
    assert_eq!(canvas.instances()[0].plugin_name(), "alpha");

    canvas.pointer_down("alpha_1", Point::new(100, 100));
    canvas.pointer_move("alpha_1", Point::new(110, 130));
    assert_eq!(
        canvas.pointer_up("alpha_1"),
        Some(FrameEvent::Moved(Point::new(50, 70)))
    );

    let mut reloaded = LayoutStore::new();
    reloaded.load_from_file(&paths.layout_file());
    assert_eq!(
        reloaded.get("ghost_1"),
        Some(&LayoutRecord::new(
            "ghost_1",
            "ghost",
            Point::new(300, 300),
            Size::new(200, 200)
        ))
    );
    assert_eq!(reloaded.get("alpha_1").unwrap().position, Point::new(50, 70));
}

#[test]
fn restored_state_is_seeded_before_content() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());
    let mut seeded = LayoutStore::new();
    seeded.add("alpha", Point::new(40, 40), Size::new(160, 120));
    seeded.save_to_file(&paths.layout_file());
    InstanceDataStore::new(paths.widget_data_dir())
        .save("alpha_1", json!({ "seed": 7 }).as_object().unwrap());

    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut directory = directory(&dir.path().join("plugins"));
    directory.register(LoadedWidget::builtin(Box::new(Tile {
        name: "alpha".into(),
        calls: Rc::clone(&calls),
    })));

    let mut canvas = CanvasController::with_paths(directory, &paths, CANVAS);
    canvas.restore_layout();
    assert_eq!(*calls.borrow(), vec!["deserialize", "create_content"]);
}

#[test]
fn notes_text_survives_restart() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());

    let notes = NotesWidget::default();
    let session = || {
        let mut directory = directory(&dir.path().join("plugins"));
        directory.register(LoadedWidget::builtin(Box::new(NotesWidget::default())));
        CanvasController::with_paths(directory, &paths, CANVAS)
    };

    let mut first = session();
    first.restore_layout();
    first.shutdown();
    assert!(InstanceDataStore::new(paths.widget_data_dir())
        .instance_ids()
        .is_empty());

    notes.set_text("water the plants");
    InstanceDataStore::new(paths.widget_data_dir()).save("notes_1", &notes.serialize());

    let mut second = session();
    second.restore_layout();
    let restored = second.instance("notes_1").unwrap();
    assert_eq!(restored.render(), "water the plants");
    second.shutdown();
    assert_eq!(
        InstanceDataStore::new(paths.widget_data_dir()).load("notes_1"),
        notes.serialize()
    );
}

#[test]
fn removing_highest_instance_frees_its_id() {
    let dir = tempdir().unwrap();
    let paths = DashboardPaths::new(dir.path());
    let mut directory = directory(&dir.path().join("plugins"));
    directory.register(tile("alpha"));
    let mut canvas = CanvasController::with_paths(directory, &paths, CANVAS);
    canvas.restore_layout();

    assert_eq!(canvas.add_widgets(&["alpha", "alpha"]), vec!["alpha_2", "alpha_3"]);
    assert!(canvas.remove_widget("alpha_3"));
    assert_eq!(canvas.add_widget("alpha").as_deref(), Some("alpha_3"));
    assert!(canvas.remove_widget("alpha_2"));
    assert_eq!(canvas.add_widget("alpha").as_deref(), Some("alpha_4"));
}

fn records() -> impl Strategy<Value = Vec<(u8, i32, i32, i32, i32)>> {
    prop::collection::vec(
        (0u8..3, -200i32..2000, -200i32..2000, 0i32..900, 0i32..900),
        0..12,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn restoring_from_file_never_persists(records in records()) {
        let dir = tempdir().unwrap();
        let paths = DashboardPaths::new(dir.path());
        let mut seeded = LayoutStore::new();
        for (plugin, x, y, w, h) in &records {
            let name = ["alpha", "beta", "ghost"][*plugin as usize];
            seeded.add(name, Point::new(*x, *y), Size::new(*w, *h));
        }
        seeded.save_to_file(&paths.layout_file());
        let before = fs::read(paths.layout_file()).unwrap();

        let mut directory = directory(&dir.path().join("plugins"));
        directory.register(tile("alpha"));
        directory.register(tile("beta"));
        let mut canvas = CanvasController::with_paths(directory, &paths, CANVAS);
        let outcome = canvas.restore_layout();

        prop_assert_eq!(canvas.state(), LayoutState::Ready);
        prop_assert_eq!(canvas.save_count(), 0);
        prop_assert_eq!(fs::read(paths.layout_file()).unwrap(), before);
        prop_assert_eq!(outcome.placed + outcome.orphaned.len(), records.len());

        for instance in canvas.instances() {
            let frame = instance.frame().geometry();
            prop_assert!(frame.left() >= 10 && frame.top() >= 10);
            prop_assert!(frame.right() <= CANVAS.width - 10);
            prop_assert!(frame.bottom() <= CANVAS.height - 10);
        }
    }
}
