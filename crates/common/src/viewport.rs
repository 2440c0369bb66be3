use serde::{Deserialize, Serialize};

/// Size of the drawing surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or 1 when the surface has no height yet.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_wide_surface() {
        assert_eq!(Viewport::new(800, 400).aspect_ratio(), 2.0);
    }

    #[test]
    fn aspect_of_zero_height_is_one() {
        assert_eq!(Viewport::new(800, 0).aspect_ratio(), 1.0);
        assert!(Viewport::new(800, 0).is_empty());
    }
}
