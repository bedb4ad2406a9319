use dashboard_widget_sdk::{bound, Point, Size};

/// Minimum gap kept between a widget and the canvas border.
pub const EDGE_PADDING: i32 = 10;

/// Pull `position` back inside a canvas of `canvas` size so a widget of
/// `size` stays fully visible. When the widget is larger than the canvas
/// the top/left padding wins.
pub fn clamp_to_canvas(position: Point, size: Size, canvas: Size) -> Point {
    Point::new(
        bound(
            EDGE_PADDING,
            position.x,
            canvas
                .width
                .saturating_sub(size.width)
                .saturating_sub(EDGE_PADDING),
        ),
        bound(
            EDGE_PADDING,
            position.y,
            canvas
                .height
                .saturating_sub(size.height)
                .saturating_sub(EDGE_PADDING),
        ),
    )
}
