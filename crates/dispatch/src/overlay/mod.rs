//! Drawing detections onto a render target.

use {
    crate::DetectionResult,
    base::{Rect, Vec2},
};

mod canvas;
pub use canvas::*;

mod color;
pub use color::*;

pub const STROKE_WIDTH: u32 = 3;
pub const LABEL_HEIGHT: i32 = 30;
pub const FONT_SIZE: f32 = 18.0;
pub const TEXT_INSET: i32 = 5;

/// A 2-D surface the overlay is painted on.
pub trait RenderTarget: Send {
    fn size(&self) -> Vec2<usize>;

    /// Change the dimensions. Content is cleared only if the size changes.
    fn resize(&mut self, size: Vec2<usize>);

    fn clear(&mut self);

    fn stroke_rect(&mut self, rect: Rect<i32>, width: u32, color: Color);

    fn fill_rect(&mut self, rect: Rect<i32>, color: Color);

    /// Draw `text` with its top-left corner at `origin`.
    fn fill_text(&mut self, origin: Vec2<i32>, text: &str, px: f32, color: Color);
}

impl<T: RenderTarget + ?Sized> RenderTarget for Box<T> {
    fn size(&self) -> Vec2<usize> {
        (**self).size()
    }

    fn resize(&mut self, size: Vec2<usize>) {
        (**self).resize(size)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn stroke_rect(&mut self, rect: Rect<i32>, width: u32, color: Color) {
        (**self).stroke_rect(rect, width, color)
    }

    fn fill_rect(&mut self, rect: Rect<i32>, color: Color) {
        (**self).fill_rect(rect, color)
    }

    fn fill_text(&mut self, origin: Vec2<i32>, text: &str, px: f32, color: Color) {
        (**self).fill_text(origin, text, px, color)
    }
}

/// Caption shown above a box, e.g. `HTTP: Right`.
pub fn caption(label: &str, detection: &DetectionResult) -> String {
    match &detection.label {
        Some(kind) => format!("{label}: {kind}"),
        None => label.to_string(),
    }
}

/// Replace the target's content with `detection`.
///
/// Clears the target, then draws the box outline and a label strip directly
/// above it. The strip is pushed down to stay inside the target when the box
/// touches the top edge.
pub fn render(
    target: &mut dyn RenderTarget,
    detection: &DetectionResult,
    label: &str,
    color: Color,
) {
    target.clear();
    let Some(bbox) = detection.bounding_box.filter(|_| detection.is_drawable()) else {
        return;
    };

    target.stroke_rect(bbox, STROKE_WIDTH, color);

    let strip_y = bbox.y().saturating_sub(LABEL_HEIGHT).max(0);
    target.fill_rect(Rect::from_xywh(bbox.x(), strip_y, bbox.width(), LABEL_HEIGHT), color);

    let text_y = strip_y.saturating_add((LABEL_HEIGHT - FONT_SIZE as i32) / 2);
    target.fill_text(
        Vec2::new(bbox.x().saturating_add(TEXT_INSET), text_y),
        &caption(label, detection),
        FONT_SIZE,
        Color::BLACK,
    );
}
