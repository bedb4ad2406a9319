//! Headless dashboard host: command-line surface, single-instance guard and
//! the commands that drive a [`CanvasController`](dashboard_canvas::CanvasController).

mod cli;
mod commands;
mod lock;

pub use cli::{Cli, Command, EdgeArg};
pub use commands::{builtin_widgets, run};
pub use lock::InstanceLock;
