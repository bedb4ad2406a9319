use std::path::{Path, PathBuf};

use dashboard_layout::{DashboardPaths, InstanceDataStore, LayoutStore};
use dashboard_plugin_host::{WidgetDirectory, WidgetRef};
use dashboard_widget_sdk::{HostSurface, Point, Size};
use tracing::{debug, info};

use crate::bounds::clamp_to_canvas;
use crate::frame::{CursorShape, FrameEvent, InteractionState, WidgetFrame};
use crate::instance::LiveInstance;

/// Offset of the first widget placed on a fresh canvas.
pub const CASCADE_START: i32 = 20;
/// Diagonal step between successively placed widgets.
pub const CASCADE_STEP: i32 = 30;

/// Whether canvas changes are mirrored into the stores yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// Restoring from disk: placements keep their persisted identity and
    /// nothing is written.
    NotReady,
    /// Every change is persisted immediately.
    Ready,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub first_run: bool,
    pub placed: usize,
    /// Records left on disk because their plugin is not available.
    pub orphaned: Vec<String>,
}

/// Owns the live widgets and is the only writer of the layout and instance
/// data stores.
pub struct CanvasController {
    // Live instances drop before the directory that may hold the last
    // handle on their plugin libraries.
    instances: Vec<LiveInstance>,
    directory: WidgetDirectory,
    layout: LayoutStore,
    data: InstanceDataStore,
    layout_file: PathBuf,
    canvas_size: Size,
    state: LayoutState,
    save_count: usize,
}

impl CanvasController {
    pub fn new(
        directory: WidgetDirectory,
        layout: LayoutStore,
        data: InstanceDataStore,
        layout_file: impl Into<PathBuf>,
        canvas_size: Size,
    ) -> Self {
        Self {
            instances: Vec::new(),
            directory,
            layout,
            data,
            layout_file: layout_file.into(),
            canvas_size,
            state: LayoutState::NotReady,
            save_count: 0,
        }
    }

    /// Controller persisting to the standard files under `paths`.
    pub fn with_paths(directory: WidgetDirectory, paths: &DashboardPaths, canvas_size: Size) -> Self {
        Self::new(
            directory,
            LayoutStore::new(),
            InstanceDataStore::new(paths.widget_data_dir()),
            paths.layout_file(),
            canvas_size,
        )
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn directory(&self) -> &WidgetDirectory {
        &self.directory
    }

    pub fn layout(&self) -> &LayoutStore {
        &self.layout
    }

    pub fn data(&self) -> &InstanceDataStore {
        &self.data
    }

    pub fn layout_file(&self) -> &Path {
        &self.layout_file
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Live widgets, bottom-most first.
    pub fn instances(&self) -> &[LiveInstance] {
        &self.instances
    }

    pub fn instance(&self, instance_id: &str) -> Option<&LiveInstance> {
        self.instances
            .iter()
            .find(|instance| instance.instance_id == instance_id)
    }

    /// Top-most widget under `point`.
    pub fn instance_at(&self, point: Point) -> Option<&LiveInstance> {
        self.instances
            .iter()
            .rev()
            .find(|instance| instance.frame.geometry().contains(point))
    }

    /// Number of layout saves performed this session.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    /// Bring back the previous session, or seed a first-run layout when no
    /// layout file exists. Only the first call has any effect.
    pub fn restore_layout(&mut self) -> RestoreOutcome {
        if self.state == LayoutState::Ready {
            debug!("layout already restored");
            return RestoreOutcome::default();
        }

        if !self.layout_file.exists() {
            return self.seed_first_run();
        }

        self.layout.load_from_file(&self.layout_file);
        let mut outcome = RestoreOutcome::default();
        for record in self.layout.all() {
            let Some(widget) = self.directory.find_by_name(&record.plugin_name).cloned() else {
                debug!(
                    instance = %record.instance_id,
                    plugin = %record.plugin_name,
                    "plugin not available, leaving record in place"
                );
                outcome.orphaned.push(record.instance_id);
                continue;
            };

            let state = self.data.load(&record.instance_id);
            if !state.is_empty() {
                widget.capability().deserialize(&state);
            }
            let index = self.place(widget, record.position);
            let instance = &mut self.instances[index];
            instance.instance_id = record.instance_id;
            instance.frame.resize(record.size);
            outcome.placed += 1;
        }
        self.state = LayoutState::Ready;
        self.clamp_instances();

        info!(
            placed = outcome.placed,
            orphaned = outcome.orphaned.len(),
            "layout restored"
        );
        outcome
    }

    fn seed_first_run(&mut self) -> RestoreOutcome {
        self.state = LayoutState::Ready;
        let widgets: Vec<WidgetRef> = self.directory.widgets().to_vec();
        let mut offset = CASCADE_START;
        for widget in &widgets {
            self.place(WidgetRef::clone(widget), Point::new(offset, offset));
            offset = offset.saturating_add(CASCADE_STEP);
        }
        info!(placed = widgets.len(), "no saved layout, placed every widget");
        RestoreOutcome {
            first_run: true,
            placed: widgets.len(),
            orphaned: Vec::new(),
        }
    }

    /// Place one widget of kind `name` near the canvas centre. Returns the new
    /// instance id, or `None` when no such widget is known. Widgets placed
    /// before the layout is restored have no id yet and also yield `None`.
    pub fn add_widget(&mut self, name: &str) -> Option<String> {
        self.add_widgets(&[name]).into_iter().next()
    }

    /// Place the named widgets around the canvas centre, each one offset
    /// diagonally from the previous. Unknown names are skipped.
    pub fn add_widgets(&mut self, names: &[&str]) -> Vec<String> {
        let mut ids = Vec::new();
        let mut offset = 0;
        for name in names {
            let Some(widget) = self.directory.find_by_name(name).cloned() else {
                debug!(name, "unknown widget");
                continue;
            };
            let size = widget.metadata().default_size;
            let center = Point::new(
                self.canvas_size.width.saturating_sub(size.width) / 2,
                self.canvas_size.height.saturating_sub(size.height) / 2,
            );
            let index = self.place(widget, center + Point::new(offset, offset));
            let id = &self.instances[index].instance_id;
            if !id.is_empty() {
                ids.push(id.clone());
            }
            offset = offset.saturating_add(CASCADE_STEP);
        }
        ids
    }

    /// Remove a live widget together with its layout record and stored data.
    pub fn remove_widget(&mut self, instance_id: &str) -> bool {
        let Some(index) = self.index_of(instance_id) else {
            return false;
        };
        self.instances.remove(index);
        self.layout.remove(instance_id);
        self.data.remove(instance_id);
        self.save_layout();
        true
    }

    /// The canvas changed size (window resize, screen change): keep every
    /// widget inside it and persist the adjusted positions.
    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas_size = size;
        self.clamp_instances();
        self.save_layout();
    }

    pub fn pointer_down(&mut self, instance_id: &str, pointer: Point) -> bool {
        let Some(index) = self.index_of(instance_id) else {
            return false;
        };
        // Raise the pressed widget above its siblings.
        let mut instance = self.instances.remove(index);
        instance.frame.pointer_down(pointer);
        self.instances.push(instance);
        true
    }

    /// Forward pointer motion. While no button is held this only updates the
    /// cursor, which is returned.
    pub fn pointer_move(&mut self, instance_id: &str, pointer: Point) -> Option<CursorShape> {
        let instance = self.instance_mut(instance_id)?;
        instance.frame.pointer_move(pointer);
        Some(instance.frame.cursor())
    }

    /// Cursor for a pointer hovering over `instance_id` with no button held.
    /// Mid-gesture the pointer is left alone.
    pub fn hover(&mut self, instance_id: &str, pointer: Point) -> Option<CursorShape> {
        let instance = self.instance_mut(instance_id)?;
        if instance.frame.state() == InteractionState::Idle {
            instance.frame.pointer_move(pointer);
        }
        Some(instance.frame.cursor())
    }

    /// Finish the gesture on `instance_id`. A committed move or resize is
    /// written to disk before this returns.
    pub fn pointer_up(&mut self, instance_id: &str) -> Option<FrameEvent> {
        let event = self.instance_mut(instance_id)?.frame.pointer_up()?;
        match event {
            FrameEvent::Moved(position) => self.layout.update_position(instance_id, position),
            FrameEvent::Resized { position, size } => {
                self.layout.update_position(instance_id, position);
                self.layout.update_size(instance_id, size);
            }
        }
        self.save_layout();
        Some(event)
    }

    /// Persist widget data and the full layout. Does nothing until the
    /// layout has been restored.
    pub fn save_layout(&mut self) {
        if self.state != LayoutState::Ready {
            return;
        }
        for instance in &self.instances {
            if instance.instance_id.is_empty() {
                continue;
            }
            let state = instance.widget.capability().serialize();
            if !state.is_empty() {
                self.data.save(&instance.instance_id, &state);
            }
        }
        self.layout.save_to_file(&self.layout_file);
        self.save_count += 1;
        debug!(instances = self.instances.len(), "layout persisted");
    }

    /// Final save when the dashboard closes.
    pub fn shutdown(&mut self) {
        self.save_layout();
    }

    /// Delete instance data files that no layout record refers to. Orphaned
    /// layout records keep their data. Returns the ids removed.
    pub fn prune_orphaned_data(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .data
            .instance_ids()
            .into_iter()
            .filter(|id| !self.layout.contains(id))
            .collect();
        for id in &stale {
            self.data.remove(id);
        }
        if !stale.is_empty() {
            info!(removed = stale.len(), "pruned widget data without a layout record");
        }
        stale
    }

    fn place(&mut self, widget: WidgetRef, position: Point) -> usize {
        let metadata = widget.metadata().clone();
        let host = HostSurface {
            canvas_size: self.canvas_size,
            initial_size: metadata.default_size,
        };
        let content = widget.capability().create_content(&host);
        let frame = WidgetFrame::new(
            position,
            metadata.default_size,
            metadata.min_size,
            metadata.max_size,
        );
        let mut instance = LiveInstance {
            instance_id: String::new(),
            content,
            frame,
            widget,
        };

        if self.state == LayoutState::Ready {
            instance.instance_id =
                self.layout
                    .add(&metadata.name, instance.frame.position(), instance.frame.size());
            debug!(instance = %instance.instance_id, "widget placed");
        }
        self.instances.push(instance);
        if self.state == LayoutState::Ready {
            self.save_layout();
        }
        self.instances.len() - 1
    }

    fn clamp_instances(&mut self) {
        for instance in &mut self.instances {
            let frame = &mut instance.frame;
            let clamped = clamp_to_canvas(frame.position(), frame.size(), self.canvas_size);
            if clamped != frame.position() {
                frame.move_to(clamped);
                self.layout.update_position(&instance.instance_id, clamped);
            }
        }
    }

    fn index_of(&self, instance_id: &str) -> Option<usize> {
        self.instances
            .iter()
            .position(|instance| instance.instance_id == instance_id)
    }

    fn instance_mut(&mut self, instance_id: &str) -> Option<&mut LiveInstance> {
        self.instances
            .iter_mut()
            .find(|instance| instance.instance_id == instance_id)
    }
}
