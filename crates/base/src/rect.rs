use crate::Vec2;

/// Axis-aligned rectangle given by its top-left origin and its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T: Default> Default for Rect<T> {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            size: Vec2::zero(),
        }
    }
}

impl<T> Rect<T> {
    pub fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl<T: Copy> Rect<T> {
    pub fn x(&self) -> T {
        self.origin.x
    }

    pub fn y(&self) -> T {
        self.origin.y
    }

    pub fn width(&self) -> T {
        self.size.x
    }

    pub fn height(&self) -> T {
        self.size.y
    }
}

impl<T: std::ops::Add<Output = T> + Copy> Rect<T> {
    pub fn min(&self) -> Vec2<T> {
        self.origin
    }

    pub fn max(&self) -> Vec2<T> {
        self.origin + self.size
    }
}

impl Rect<i32> {
    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    /// Clip to `0..bounds`, returning `None` when nothing is left.
    ///
    /// Edges saturate at the `i32` range instead of overflowing.
    pub fn clip(&self, bounds: Vec2<i32>) -> Option<Rect<i32>> {
        let x0 = self.origin.x.max(0);
        let y0 = self.origin.y.max(0);
        let x1 = self.origin.x.saturating_add(self.size.x).min(bounds.x);
        let y1 = self.origin.y.saturating_add(self.size.y).min(bounds.y);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::from_xywh(x0, y0, x1 - x0, y1 - y0))
    }
}
