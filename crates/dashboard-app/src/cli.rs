use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dashboard_canvas::ResizeEdge;

#[derive(Parser, Debug)]
#[command(name = "dashboard", author, version, about = "Widget dashboard host")]
pub struct Cli {
    /// Configuration root holding the layout, widget data and settings.
    #[arg(long, value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Additional directories to search for widget plugins.
    #[arg(long = "plugin-path", value_name = "DIR", global = true)]
    pub plugin_paths: Vec<PathBuf>,

    /// Override the canvas width from the settings file.
    #[arg(long, global = true)]
    pub canvas_width: Option<i32>,

    /// Override the canvas height from the settings file.
    #[arg(long, global = true)]
    pub canvas_height: Option<i32>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List plugin search paths, available widgets and load failures.
    Plugins,
    /// Restore the layout and print every placed widget.
    Show,
    /// Place new widgets near the middle of the canvas.
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove a placed widget and its stored data.
    Remove { instance_id: String },
    /// Drag a widget so its top-left corner lands on the given point.
    Move {
        instance_id: String,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Drag one edge or corner of a widget by the given offset.
    Resize {
        instance_id: String,
        #[arg(value_enum)]
        edge: EdgeArg,
        #[arg(allow_negative_numbers = true)]
        dx: i32,
        #[arg(allow_negative_numbers = true)]
        dy: i32,
    },
    /// Delete stored widget data that no layout record refers to.
    PruneData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EdgeArg {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl From<EdgeArg> for ResizeEdge {
    fn from(edge: EdgeArg) -> Self {
        match edge {
            EdgeArg::Left => ResizeEdge::Left,
            EdgeArg::Right => ResizeEdge::Right,
            EdgeArg::Top => ResizeEdge::Top,
            EdgeArg::Bottom => ResizeEdge::Bottom,
            EdgeArg::TopLeft => ResizeEdge::TopLeft,
            EdgeArg::TopRight => ResizeEdge::TopRight,
            EdgeArg::BottomLeft => ResizeEdge::BottomLeft,
            EdgeArg::BottomRight => ResizeEdge::BottomRight,
        }
    }
}
