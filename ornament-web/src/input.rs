use glam::Vec2;

/// Upper bound on the device pixel ratio used for the drawing buffer.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Pointer position in normalized device coordinates, fed by mouse and touch events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub ndc: Vec2,
}

impl Default for PointerState {
    /// Bottom-right corner, out of the way until the user moves.
    fn default() -> Self {
        Self {
            ndc: Vec2::new(1.0, -1.0),
        }
    }
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client coordinates to NDC: x grows right, y grows up.
    pub fn normalize(client_x: f64, client_y: f64, viewport: &Viewport) -> Vec2 {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        Vec2::new(
            (client_x / w * 2.0 - 1.0) as f32,
            (-(client_y / h) * 2.0 + 1.0) as f32,
        )
    }

    pub fn move_to(&mut self, client_x: f64, client_y: f64, viewport: &Viewport) {
        self.ndc = Self::normalize(client_x, client_y, viewport);
    }

    /// Finger lifted: park the pointer in the top-right corner.
    pub fn touch_end(&mut self) {
        self.ndc = Vec2::new(1.0, 1.0);
    }
}

/// Window size in CSS pixels plus the clamped device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            (self.width / self.height) as f32
        } else {
            1.0
        }
    }

    /// Drawing buffer size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: f64| (v * self.pixel_ratio).round().max(1.0) as u32;
        (scale(self.width), scale(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-6
    }

    #[test]
    fn test_initial_pointer_bottom_right() {
        assert_eq!(PointerState::new().ndc, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_normalize_corners_and_center() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        assert!(approx_eq(PointerState::normalize(0.0, 0.0, &viewport), Vec2::new(-1.0, 1.0)));
        assert!(approx_eq(PointerState::normalize(400.0, 300.0, &viewport), Vec2::ZERO));
        assert!(approx_eq(PointerState::normalize(800.0, 600.0, &viewport), Vec2::new(1.0, -1.0)));
    }

    #[test]
    fn test_touch_end_parks_top_right() {
        let viewport = Viewport::new(100.0, 100.0, 1.0);
        let mut pointer = PointerState::new();
        pointer.move_to(25.0, 75.0, &viewport);
        assert!(approx_eq(pointer.ndc, Vec2::new(-0.5, -0.5)));
        pointer.touch_end();
        assert_eq!(pointer.ndc, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_pixel_ratio_capped_at_two() {
        assert_eq!(Viewport::new(10.0, 10.0, 3.0).pixel_ratio, 2.0);
        assert_eq!(Viewport::new(10.0, 10.0, 1.5).pixel_ratio, 1.5);
        assert_eq!(Viewport::new(10.0, 10.0, 0.0).pixel_ratio, 1.0);
    }

    #[test]
    fn test_physical_size_and_aspect() {
        let viewport = Viewport::new(800.0, 400.0, 3.0);
        assert_eq!(viewport.physical_size(), (1600, 800));
        assert_eq!(viewport.aspect(), 2.0);
        assert_eq!(Viewport::new(800.0, 0.0, 1.0).aspect(), 1.0);
    }
}
