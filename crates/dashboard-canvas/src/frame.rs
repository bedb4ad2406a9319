use dashboard_widget_sdk::{bound, Point, Rect, Size};

/// Width of the band along each frame edge that starts a resize.
pub const RESIZE_BORDER: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    None,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    /// Classify a frame-local point. Corners win over single edges.
    pub fn classify(local: Point, size: Size) -> Self {
        let left = local.x < RESIZE_BORDER;
        let right = local.x >= size.width.saturating_sub(RESIZE_BORDER);
        let top = local.y < RESIZE_BORDER;
        let bottom = local.y >= size.height.saturating_sub(RESIZE_BORDER);

        match (left, right, top, bottom) {
            (true, _, true, _) => ResizeEdge::TopLeft,
            (_, true, true, _) => ResizeEdge::TopRight,
            (true, _, _, true) => ResizeEdge::BottomLeft,
            (_, true, _, true) => ResizeEdge::BottomRight,
            (true, _, _, _) => ResizeEdge::Left,
            (_, true, _, _) => ResizeEdge::Right,
            (_, _, true, _) => ResizeEdge::Top,
            (_, _, _, true) => ResizeEdge::Bottom,
            _ => ResizeEdge::None,
        }
    }

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }

    pub fn cursor(self) -> CursorShape {
        match self {
            ResizeEdge::TopLeft | ResizeEdge::BottomRight => CursorShape::ResizeForwardDiagonal,
            ResizeEdge::TopRight | ResizeEdge::BottomLeft => CursorShape::ResizeBackwardDiagonal,
            ResizeEdge::Left | ResizeEdge::Right => CursorShape::ResizeHorizontal,
            ResizeEdge::Top | ResizeEdge::Bottom => CursorShape::ResizeVertical,
            ResizeEdge::None => CursorShape::Arrow,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CursorShape {
    #[default]
    Arrow,
    ResizeHorizontal,
    ResizeVertical,
    /// `\` diagonal: top-left and bottom-right corners.
    ResizeForwardDiagonal,
    /// `/` diagonal: top-right and bottom-left corners.
    ResizeBackwardDiagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Dragging {
        last_pointer: Point,
    },
    Resizing {
        edge: ResizeEdge,
        start_geometry: Rect,
        start_pointer: Point,
    },
}

/// Committed result of a gesture, emitted on pointer release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    Moved(Point),
    /// Left and top resizes also move the origin, so both are reported.
    Resized { position: Point, size: Size },
}

/// Geometry and pointer state of one widget on the canvas.
///
/// All pointer positions are in canvas coordinates; the frame works out
/// frame-local positions itself.
#[derive(Debug, Clone)]
pub struct WidgetFrame {
    geometry: Rect,
    min_size: Size,
    max_size: Size,
    state: InteractionState,
    cursor: CursorShape,
}

impl WidgetFrame {
    pub fn new(position: Point, size: Size, min_size: Size, max_size: Size) -> Self {
        Self {
            geometry: Rect::new(position, size.bounded(min_size, max_size)),
            min_size,
            max_size,
            state: InteractionState::Idle,
            cursor: CursorShape::Arrow,
        }
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn position(&self) -> Point {
        self.geometry.origin
    }

    pub fn size(&self) -> Size {
        self.geometry.size
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    pub fn move_to(&mut self, position: Point) {
        self.geometry.origin = position;
    }

    /// Resize keeping the origin; the size is held within the frame limits.
    pub fn resize(&mut self, size: Size) {
        self.geometry.size = size.bounded(self.min_size, self.max_size);
    }

    pub fn edge_at(&self, pointer: Point) -> ResizeEdge {
        ResizeEdge::classify(pointer - self.geometry.origin, self.geometry.size)
    }

    pub fn pointer_down(&mut self, pointer: Point) {
        self.state = match self.edge_at(pointer) {
            ResizeEdge::None => InteractionState::Dragging {
                last_pointer: pointer,
            },
            edge => InteractionState::Resizing {
                edge,
                start_geometry: self.geometry,
                start_pointer: pointer,
            },
        };
    }

    pub fn pointer_move(&mut self, pointer: Point) {
        match self.state {
            InteractionState::Idle => self.cursor = self.edge_at(pointer).cursor(),
            InteractionState::Dragging { last_pointer } => {
                self.geometry.origin += pointer - last_pointer;
                self.state = InteractionState::Dragging {
                    last_pointer: pointer,
                };
            }
            InteractionState::Resizing {
                edge,
                start_geometry,
                start_pointer,
            } => {
                self.geometry = self.resized(edge, start_geometry, pointer - start_pointer);
            }
        }
    }

    /// Release always commits; there is no way to abort a gesture.
    pub fn pointer_up(&mut self) -> Option<FrameEvent> {
        let event = match self.state {
            InteractionState::Idle => None,
            InteractionState::Dragging { .. } => Some(FrameEvent::Moved(self.position())),
            InteractionState::Resizing { .. } => Some(FrameEvent::Resized {
                position: self.position(),
                size: self.size(),
            }),
        };
        self.state = InteractionState::Idle;
        event
    }

    fn resized(&self, edge: ResizeEdge, start: Rect, delta: Point) -> Rect {
        let (mut left, mut top) = (start.left(), start.top());
        let (mut width, mut height) = (start.size.width, start.size.height);

        if edge.moves_left() {
            width = bound(
                self.min_size.width,
                start.size.width.saturating_sub(delta.x),
                self.max_size.width,
            );
            left = start.right().saturating_sub(width);
        }
        if edge.moves_right() {
            width = bound(
                self.min_size.width,
                start.size.width.saturating_add(delta.x),
                self.max_size.width,
            );
        }
        if edge.moves_top() {
            height = bound(
                self.min_size.height,
                start.size.height.saturating_sub(delta.y),
                self.max_size.height,
            );
            top = start.bottom().saturating_sub(height);
        }
        if edge.moves_bottom() {
            height = bound(
                self.min_size.height,
                start.size.height.saturating_add(delta.y),
                self.max_size.height,
            );
        }

        Rect::new(Point::new(left, top), Size::new(width, height))
    }
}
