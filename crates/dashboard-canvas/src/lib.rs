//! The dashboard canvas: live widget instances, their frames and the
//! drag/resize interaction, and the controller that keeps the layout and
//! widget data stores in step with what is on screen.
//!
//! The controller only writes to disk once [`CanvasController::restore_layout`]
//! has run. Until then placements are treated as part of bringing back the
//! previous session and are not persisted.

mod bounds;
mod controller;
mod frame;
mod instance;

pub use bounds::{clamp_to_canvas, EDGE_PADDING};
pub use controller::{CanvasController, LayoutState, RestoreOutcome, CASCADE_START, CASCADE_STEP};
pub use frame::{
    CursorShape, FrameEvent, InteractionState, ResizeEdge, WidgetFrame, RESIZE_BORDER,
};
pub use instance::LiveInstance;
