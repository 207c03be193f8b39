//! Canvas that keeps what was painted.

use crate::draw::DrawCommand;
use crate::widget::{Canvas, TextStyle};
use crate::{Color, Point, Rect};

/// Records every paint call as a [`DrawCommand`].
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in paint order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Whether nothing was painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text runs in paint order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands.iter().filter_map(DrawCommand::text).collect()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            bounds: rect,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_canvas_records_in_order() {
        let mut canvas = RecordingCanvas::new();
        assert!(canvas.is_empty());

        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        canvas.draw_text("Open", Point::new(1.0, 1.0), &TextStyle::default());
        canvas.draw_line(Point::ORIGIN, Point::new(5.0, 0.0), Color::BLACK, 1.0);

        assert_eq!(canvas.commands().len(), 3);
        assert_eq!(canvas.texts(), vec!["Open"]);
        assert_eq!(canvas.commands()[0].color(), Color::WHITE);
    }
}
