use std::io::Write;

use anyhow::{bail, Context, Result};
use dashboard_canvas::{CanvasController, LiveInstance, ResizeEdge};
use dashboard_layout::{DashboardPaths, DashboardSettings};
use dashboard_plugin_host::{HostError, LoadedWidget, PluginRegistry, WidgetDirectory};
use dashboard_widget_notes::NotesWidget;
use dashboard_widget_sdk::{Point, Rect, Size};
use tracing::{info, warn};

use crate::cli::{Cli, Command};

/// Widgets compiled into the host, registered ahead of any plugin.
pub fn builtin_widgets() -> Vec<LoadedWidget> {
    vec![LoadedWidget::builtin(Box::new(NotesWidget::default()))]
}

/// Execute `cli` against the state under `paths`, writing the report to `out`.
pub fn run<W: Write>(
    cli: &Cli,
    paths: &DashboardPaths,
    settings: &DashboardSettings,
    out: &mut W,
) -> Result<()> {
    let mut registry = PluginRegistry::new();
    for path in settings.plugin_paths.iter().chain(&cli.plugin_paths) {
        registry.add_search_path(path.clone());
    }
    let mut directory = WidgetDirectory::new(registry);
    for widget in builtin_widgets() {
        directory.register(widget);
    }
    let report = directory.load_plugins();
    info!(
        widgets = directory.widgets().len(),
        failures = report.errors.len(),
        "widget directory ready"
    );

    let canvas_size = Size::new(
        cli.canvas_width.unwrap_or(settings.canvas_width),
        cli.canvas_height.unwrap_or(settings.canvas_height),
    );
    let mut canvas = CanvasController::with_paths(directory, paths, canvas_size);

    let command = cli.command.clone().unwrap_or(Command::Show);
    let result = execute(&command, &mut canvas, &report.errors, out);
    canvas.shutdown();
    result
}

fn execute<W: Write>(
    command: &Command,
    canvas: &mut CanvasController,
    load_errors: &[HostError],
    out: &mut W,
) -> Result<()> {
    if *command == Command::Plugins {
        return list_plugins(canvas, load_errors, out);
    }

    let outcome = canvas.restore_layout();
    for id in &outcome.orphaned {
        warn!(instance = %id, "widget plugin unavailable, keeping its layout entry");
    }

    match command {
        Command::Plugins => {}
        Command::Show => {
            if canvas.instances().is_empty() {
                writeln!(out, "canvas is empty")?;
            }
            for instance in canvas.instances() {
                print_instance(instance, out)?;
            }
            for id in &outcome.orphaned {
                writeln!(out, "{id}\t(plugin unavailable)")?;
            }
        }
        Command::Add { names } => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let ids = canvas.add_widgets(&names);
            if ids.is_empty() {
                bail!("no widget named {}", names.join(", "));
            }
            if ids.len() < names.len() {
                warn!(requested = names.len(), added = ids.len(), "some widgets are unknown");
            }
            for id in &ids {
                if let Some(instance) = canvas.instance(id) {
                    print_instance(instance, out)?;
                }
            }
        }
        Command::Remove { instance_id } => {
            if !canvas.remove_widget(instance_id) {
                bail!("no widget instance {instance_id}");
            }
            writeln!(out, "removed {instance_id}")?;
        }
        Command::Move { instance_id, x, y } => {
            let geometry = geometry_of(canvas, instance_id)?;
            let grab = Point::new(
                geometry.left().saturating_add(geometry.size.width / 2),
                geometry.top().saturating_add(geometry.size.height / 2),
            );
            let delta = Point::new(*x, *y) - geometry.origin;
            drag(canvas, instance_id, grab, grab + delta)?;
            print_instance(lookup(canvas, instance_id)?, out)?;
        }
        Command::Resize {
            instance_id,
            edge,
            dx,
            dy,
        } => {
            let geometry = geometry_of(canvas, instance_id)?;
            let grab = edge_handle(geometry, (*edge).into());
            drag(canvas, instance_id, grab, grab + Point::new(*dx, *dy))?;
            print_instance(lookup(canvas, instance_id)?, out)?;
        }
        Command::PruneData => {
            let removed = canvas.prune_orphaned_data();
            if removed.is_empty() {
                writeln!(out, "no stale widget data")?;
            }
            for id in removed {
                writeln!(out, "pruned {id}")?;
            }
        }
    }
    Ok(())
}

fn list_plugins<W: Write>(
    canvas: &CanvasController,
    load_errors: &[HostError],
    out: &mut W,
) -> Result<()> {
    writeln!(out, "search paths:")?;
    for path in canvas.directory().registry().search_paths() {
        writeln!(out, "  {}", path.display())?;
    }
    writeln!(out, "widgets:")?;
    for widget in canvas.directory().widgets() {
        let metadata = widget.metadata();
        let source = widget
            .source()
            .map_or_else(|| "built-in".to_string(), |path| path.display().to_string());
        writeln!(
            out,
            "  {}\t{}x{}\t{}",
            metadata.name, metadata.default_size.width, metadata.default_size.height, source
        )?;
    }
    if !load_errors.is_empty() {
        writeln!(out, "failed:")?;
        for err in load_errors {
            writeln!(out, "  {err}")?;
        }
    }
    Ok(())
}

fn print_instance<W: Write>(instance: &LiveInstance, out: &mut W) -> Result<()> {
    let geometry = instance.frame().geometry();
    writeln!(
        out,
        "{}\t{}\t{},{}\t{}x{}",
        instance.instance_id(),
        instance.plugin_name(),
        geometry.origin.x,
        geometry.origin.y,
        geometry.size.width,
        geometry.size.height
    )?;
    let content = instance.render();
    for line in content.lines() {
        writeln!(out, "    {line}")?;
    }
    Ok(())
}

fn lookup<'a>(canvas: &'a CanvasController, instance_id: &str) -> Result<&'a LiveInstance> {
    canvas
        .instance(instance_id)
        .with_context(|| format!("no widget instance {instance_id}"))
}

fn geometry_of(canvas: &CanvasController, instance_id: &str) -> Result<Rect> {
    Ok(lookup(canvas, instance_id)?.frame().geometry())
}

/// Press at `from`, move to `to`, release.
fn drag(canvas: &mut CanvasController, instance_id: &str, from: Point, to: Point) -> Result<()> {
    if !canvas.pointer_down(instance_id, from) {
        bail!("no widget instance {instance_id}");
    }
    canvas.pointer_move(instance_id, to);
    canvas.pointer_up(instance_id);
    Ok(())
}

/// A canvas point inside the resize band for `edge`.
fn edge_handle(geometry: Rect, edge: ResizeEdge) -> Point {
    let x = if edge.moves_left() {
        geometry.left()
    } else if edge.moves_right() {
        geometry.right().saturating_sub(1)
    } else {
        geometry.left().saturating_add(geometry.size.width / 2)
    };
    let y = if edge.moves_top() {
        geometry.top()
    } else if edge.moves_bottom() {
        geometry.bottom().saturating_sub(1)
    } else {
        geometry.top().saturating_add(geometry.size.height / 2)
    };
    Point::new(x, y)
}
