use {
    super::{Color, RenderTarget},
    ab_glyph::{FontArc, PxScale},
    base::{Rect, Vec2},
    crates_image::{Rgba, RgbaImage},
    imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut},
    std::sync::{Arc, Mutex, MutexGuard},
};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

// Text starting further left or above than this cannot reach the target.
const TEXT_REACH: i32 = 1 << 16;

fn bounds_of(image: &RgbaImage) -> Vec2<i32> {
    Vec2::new(image.width() as usize, image.height() as usize).to_i32()
}

/// Outline of `rect` with every edge pulled to at most one pixel outside
/// `bounds`. Edges that lie outside stay outside.
fn outline(rect: Rect<i32>, bounds: Vec2<i32>) -> Option<imageproc::rect::Rect> {
    if rect.width() <= 0 || rect.height() <= 0 {
        return None;
    }
    let left = rect.x().clamp(-1, bounds.x);
    let top = rect.y().clamp(-1, bounds.y);
    let right = rect.x().saturating_add(rect.width() - 1).clamp(-1, bounds.x);
    let bottom = rect.y().saturating_add(rect.height() - 1).clamp(-1, bounds.y);
    Some(
        imageproc::rect::Rect::at(left, top)
            .of_size((right - left + 1) as u32, (bottom - top + 1) as u32),
    )
}

/// Transparent RGBA overlay layer.
///
/// Clones share the same pixels, so a viewer can hold one clone while a
/// channel draws through another. Text is only drawn when a font is set.
#[derive(Clone)]
pub struct OverlayCanvas {
    image: Arc<Mutex<RgbaImage>>,
    font: Option<FontArc>,
}

impl Default for OverlayCanvas {
    fn default() -> Self {
        Self::new(Vec2::zero())
    }
}

impl OverlayCanvas {
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            image: Arc::new(Mutex::new(RgbaImage::new(size.x as u32, size.y as u32))),
            font: None,
        }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    fn lock(&self) -> MutexGuard<'_, RgbaImage> {
        self.image.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the current pixels.
    pub fn snapshot(&self) -> RgbaImage {
        self.lock().clone()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.lock().get_pixel_checked(x, y).map(|p| p.0)
    }

    /// True when nothing is drawn.
    pub fn is_clear(&self) -> bool {
        self.lock().pixels().all(|p| p.0[3] == 0)
    }
}

impl RenderTarget for OverlayCanvas {
    fn size(&self) -> Vec2<usize> {
        let image = self.lock();
        Vec2::new(image.width() as usize, image.height() as usize)
    }

    fn resize(&mut self, size: Vec2<usize>) {
        let mut image = self.lock();
        if image.width() as usize != size.x || image.height() as usize != size.y {
            *image = RgbaImage::new(size.x as u32, size.y as u32);
        }
    }

    fn clear(&mut self) {
        for pixel in self.lock().pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    fn stroke_rect(&mut self, rect: Rect<i32>, width: u32, color: Color) {
        let mut image = self.lock();
        let bounds = bounds_of(&image);
        // centered on the edge, like a canvas stroke
        let width = width.clamp(1, 64) as i32;
        let first = -(width / 2);
        for offset in first..first + width {
            let ring = Rect::from_xywh(
                rect.x().saturating_sub(offset),
                rect.y().saturating_sub(offset),
                rect.width().saturating_add(2 * offset),
                rect.height().saturating_add(2 * offset),
            );
            if let Some(ring) = outline(ring, bounds) {
                draw_hollow_rect_mut(&mut *image, ring, color.to_rgba());
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect<i32>, color: Color) {
        let mut image = self.lock();
        if let Some(rect) = rect.clip(bounds_of(&image)) {
            let rect = imageproc::rect::Rect::at(rect.x(), rect.y())
                .of_size(rect.width() as u32, rect.height() as u32);
            draw_filled_rect_mut(&mut *image, rect, color.to_rgba());
        }
    }

    fn fill_text(&mut self, origin: Vec2<i32>, text: &str, px: f32, color: Color) {
        let Some(font) = &self.font else {
            return;
        };
        let mut image = self.lock();
        let bounds = bounds_of(&image);
        if origin.x >= bounds.x
            || origin.y >= bounds.y
            || origin.x < -TEXT_REACH
            || origin.y < -TEXT_REACH
        {
            return;
        }
        draw_text_mut(
            &mut *image,
            color.to_rgba(),
            origin.x,
            origin.y,
            PxScale::from(px),
            font,
            text,
        );
    }
}
